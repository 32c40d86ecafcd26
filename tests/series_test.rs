use blockframe::error::ErrorKind;
use blockframe::{
    AxisIndex, BinaryOp, Block, DType, IlocKey, Index, IndexHierarchy, Label, LocKey, Series,
    Value,
};

fn labelled() -> Series {
    Series::from_items(vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)])
        .unwrap()
        .with_name("s")
}

fn is_nan(v: &Value) -> bool {
    matches!(v, Value::Float(f) if f.is_nan())
}

#[test]
fn test_series_creation() {
    let series = Series::from_values(vec![10, 20, 30]);

    assert_eq!(series.len(), 3);
    assert_eq!(series.dtype(), DType::Int64);
    assert!(series.index().is_trivial());
    assert_eq!(series.get(&Label::Int(1)), Some(Value::Int(20)));

    // Explicit index must match the value count
    let err = Series::new(
        Block::from_vec(vec![1.0, 2.0]),
        Some(AxisIndex::range(3)),
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    let wide = Block::from_columns(vec![vec![1i64], vec![2]]).unwrap();
    assert!(Series::new(wide, None, None).is_err());

    // Duplicate labels are rejected
    assert!(Series::from_items(vec![("a", 1), ("a", 2)]).is_err());
}

#[test]
fn test_series_from_element() {
    let index = AxisIndex::from_labels(vec!["x", "y"]).unwrap();
    let series = Series::from_element("z", index).unwrap();

    assert_eq!(series.dtype(), DType::Str);
    assert_eq!(
        series.to_pairs(),
        vec![
            (Label::from("x"), Value::Str("z".into())),
            (Label::from("y"), Value::Str("z".into())),
        ]
    );

    let empty = Series::from_element(7, AxisIndex::range(0)).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.dtype(), DType::Int64);
}

#[test]
fn test_scalar_operand_on_empty_series_keeps_type() {
    let empty = Series::new(Block::from_vec(Vec::<i64>::new()), None, None).unwrap();
    let sum = empty.binary_scalar(BinaryOp::Add, Value::Int(1), false).unwrap();
    assert!(sum.is_empty());
    assert_eq!(sum.dtype(), DType::Int64);

    let reversed = empty.binary_scalar(BinaryOp::Sub, 1, true).unwrap();
    assert_eq!(reversed.dtype(), DType::Int64);
}

#[test]
fn test_series_selection() {
    let series = labelled();

    // Single positions collapse to an element
    assert_eq!(series.iloc(1usize).unwrap().into_element().unwrap(), Value::Int(2));
    assert_eq!(series.loc("c").unwrap().into_element().unwrap(), Value::Int(3));

    let sub = series.loc(LocKey::slice("b", "c")).unwrap().into_series().unwrap();
    assert_eq!(sub.to_values(), vec![Value::Int(2), Value::Int(3)]);
    assert_eq!(sub.name(), Some(&Label::from("s")));

    let sub = series.iloc(vec![3usize, 0]).unwrap().into_series().unwrap();
    assert_eq!(
        sub.index().labels(),
        vec![Label::from("d"), Label::from("a")]
    );

    let masked = series
        .loc(LocKey::Mask(vec![true, false, false, true]))
        .unwrap()
        .into_series()
        .unwrap();
    assert_eq!(masked.len(), 2);

    assert!(series.loc("z").is_err());
    assert!(series.iloc(9usize).is_err());
    assert!(series.iloc(1usize).unwrap().into_series().is_err());
}

#[test]
fn test_head_and_tail() {
    let series = labelled();

    assert_eq!(series.head(2).unwrap().to_values(), vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(series.tail(1).unwrap().to_values(), vec![Value::Int(4)]);
    assert_eq!(series.head(10).unwrap().len(), 4);
}

#[test]
fn test_selection_shares_values() {
    let series = labelled();
    let all = series.iloc(IlocKey::All).unwrap().into_series().unwrap();
    assert!(all.values().shares_buffer(series.values()));

    let renamed = series.rename(None);
    assert!(renamed.values().shares_buffer(series.values()));
    assert_eq!(series.name(), Some(&Label::from("s")));
}

#[test]
fn test_alignment_on_union_of_labels() {
    let a = Series::from_items(vec![("x", 1), ("y", 2)]).unwrap();
    let b = Series::from_items(vec![("y", 10), ("z", 20)]).unwrap();

    let sum = (&a + &b).unwrap();
    assert_eq!(sum.dtype(), DType::Float64);
    assert_eq!(
        sum.index().labels(),
        vec![Label::from("x"), Label::from("y"), Label::from("z")]
    );
    let values = sum.to_values();
    assert!(is_nan(&values[0]));
    assert_eq!(values[1], Value::Float(12.0));
    assert!(is_nan(&values[2]));
}

#[test]
fn test_arithmetic_promotion() {
    let ints = Series::from_values(vec![1, 2, 3]);
    let floats = Series::from_values(vec![0.5, 0.5, 0.5]);
    let bools = Series::from_values(vec![true, false, true]);

    assert_eq!((&ints + &floats).unwrap().dtype(), DType::Float64);
    assert_eq!((&ints + &bools).unwrap().dtype(), DType::Int64);
    assert_eq!((&ints / &ints).unwrap().dtype(), DType::Float64);

    let doubled = (&ints * Value::Int(2)).unwrap();
    assert_eq!(doubled.to_values(), vec![Value::Int(2), Value::Int(4), Value::Int(6)]);

    let reversed = ints.binary_scalar(BinaryOp::Sub, 10, true).unwrap();
    assert_eq!(reversed.to_values(), vec![Value::Int(9), Value::Int(8), Value::Int(7)]);

    let words = Series::from_values(vec!["a", "b", "c"]);
    assert_eq!((&ints + &words).unwrap_err().kind(), ErrorKind::Type);
}

#[test]
fn test_unlabelled_operand_length_must_match() {
    let ints = Series::from_values(vec![1, 2, 3]);

    let out = ints
        .binary_values(BinaryOp::Add, &[Value::Int(1), Value::Int(1), Value::Int(1)])
        .unwrap();
    assert_eq!(out.to_values()[2], Value::Int(4));

    let err = ints.binary_values(BinaryOp::Add, &[Value::Int(1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_comparison_and_logic() {
    let ints = Series::from_values(vec![1, 2, 3]);

    let mask = ints.binary_scalar(BinaryOp::Gt, 1, false).unwrap();
    assert_eq!(mask.dtype(), DType::Bool);
    assert_eq!(
        mask.to_values(),
        vec![Value::Bool(false), Value::Bool(true), Value::Bool(true)]
    );

    let inverted = (!&mask).unwrap();
    assert_eq!(inverted.to_values()[0], Value::Bool(true));

    let both = (&mask & &inverted).unwrap();
    assert!(both.to_values().iter().all(|v| *v == Value::Bool(false)));

    let negated = (-&ints).unwrap();
    assert_eq!(negated.to_values()[1], Value::Int(-2));
}

#[test]
fn test_reductions() {
    let series = Series::from_values(vec![Value::Float(1.0), Value::Float(f64::NAN), Value::Float(3.0)]);

    // Missing values are skipped
    assert_eq!(series.sum().unwrap(), Value::Float(4.0));
    assert_eq!(series.max().unwrap(), Value::Float(3.0));
    assert_eq!(series.min().unwrap(), Value::Float(1.0));

    let cumulative = series.cumsum().unwrap().to_values();
    assert_eq!(cumulative[0], Value::Float(1.0));
    assert!(is_nan(&cumulative[1]));
    assert_eq!(cumulative[2], Value::Float(4.0));

    let ints = Series::from_values(vec![2, 3, 4]);
    assert_eq!(ints.prod().unwrap(), Value::Int(24));
    assert_eq!(
        ints.cumprod().unwrap().to_values(),
        vec![Value::Int(2), Value::Int(6), Value::Int(24)]
    );
    assert_eq!(ints.all().unwrap(), Value::Bool(true));
    assert_eq!(Series::from_values(vec![0, 0]).any().unwrap(), Value::Bool(false));
}

#[test]
fn test_reindex() {
    let series = labelled();
    let target = AxisIndex::from_labels(vec!["d", "a", "q"]).unwrap();

    let reindexed = series.reindex(target.clone(), None).unwrap();
    assert_eq!(reindexed.dtype(), DType::Float64);
    assert_eq!(reindexed.to_values()[0], Value::Float(4.0));
    assert!(is_nan(&reindexed.to_values()[2]));

    let filled = series.reindex(target, Some(&Value::Int(0))).unwrap();
    assert_eq!(filled.dtype(), DType::Int64);
    assert_eq!(filled.to_values(), vec![Value::Int(4), Value::Int(1), Value::Int(0)]);

    // Same labels keep the same values
    let same = series.reindex(series.index().clone(), None).unwrap();
    assert!(same.values().shares_buffer(series.values()));
}

#[test]
fn test_missing_values() {
    let words = Series::from_values(vec![Value::Str("a".into()), Value::None]);
    assert_eq!(words.dtype(), DType::Object);
    assert_eq!(
        words.isna().to_values(),
        vec![Value::Bool(false), Value::Bool(true)]
    );
    let filled = words.fillna("b").unwrap();
    assert_eq!(filled.to_values()[1], Value::Str("b".into()));
}

#[test]
fn test_levels() {
    let series = labelled();
    let nested = series.add_level("outer").unwrap();

    assert_eq!(nested.index().depth(), 2);
    assert_eq!(nested.get(&Label::from(("outer", "b"))), Some(Value::Int(2)));

    let flat = nested.drop_level(1).unwrap();
    assert_eq!(flat.index().labels(), series.index().labels());
    assert!(series.drop_level(1).is_err());

    let hierarchy = IndexHierarchy::from_product(vec![vec!["p", "q"], vec!["x", "y"]]).unwrap();
    let series = Series::from_values(vec![1, 2, 3, 4]).with_index(hierarchy).unwrap();
    let sub = series.loc("q").unwrap().into_series().unwrap();
    assert_eq!(sub.to_values(), vec![Value::Int(3), Value::Int(4)]);
}

#[test]
fn test_apply() {
    let series = labelled();

    let squared = series
        .apply(|v| Ok(Value::Int(v.as_i64().unwrap_or(0).pow(2))))
        .unwrap();
    assert_eq!(squared.get(&Label::from("c")), Some(Value::Int(9)));

    // Errors raised by the function propagate
    let err = series
        .apply(|v| match v {
            Value::Int(3) => Err(blockframe::Error::InvalidOperation("three".into())),
            other => Ok(other.clone()),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn test_grouping() {
    let series = Series::from_values(vec!["x", "y", "x", "z", "y"]);
    let groups = series.iter_group_items().unwrap();

    let keys: Vec<Value> = groups.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(
        keys,
        vec![Value::Str("x".into()), Value::Str("y".into()), Value::Str("z".into())]
    );
    assert_eq!(
        groups[0].1.index().labels(),
        vec![Label::Int(0), Label::Int(2)]
    );
    assert_eq!(series.iter_group().unwrap().len(), 3);
}

#[test]
fn test_assign() {
    let series = labelled();

    let updated = series.assign("b", Value::Int(20)).unwrap();
    assert_eq!(updated.get(&Label::from("b")), Some(Value::Int(20)));
    assert_eq!(series.get(&Label::from("b")), Some(Value::Int(2)));

    let updated = series
        .assign(LocKey::list(vec!["a", "d"]), vec![Value::Float(0.5), Value::Float(1.5)])
        .unwrap();
    assert_eq!(updated.dtype(), DType::Float64);
    assert_eq!(updated.get(&Label::from("d")), Some(Value::Float(1.5)));

    // Series values align by label; unmatched labels keep their value
    let patch = Series::from_items(vec![("c", 30), ("zz", 99)]).unwrap();
    let updated = series.assign(LocKey::All, patch).unwrap();
    assert_eq!(
        updated.to_values(),
        vec![Value::Int(1), Value::Int(2), Value::Int(30), Value::Int(4)]
    );

    let err = series
        .assign(LocKey::All, vec![Value::Int(1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    let updated = series.assign_iloc(0usize, Value::Str("first".into())).unwrap();
    assert_eq!(updated.dtype(), DType::Object);
}

#[test]
fn test_from_concat() {
    let a = Series::from_items(vec![("a", 1), ("b", 2)]).unwrap();
    let b = Series::from_items(vec![("c", 0.5)]).unwrap();

    let joined = Series::from_concat(&[a.clone(), b], None, Some(Label::from("j"))).unwrap();
    assert_eq!(joined.dtype(), DType::Float64);
    assert_eq!(
        joined.index().labels(),
        vec![Label::from("a"), Label::from("b"), Label::from("c")]
    );
    assert_eq!(joined.name(), Some(&Label::from("j")));

    let err = Series::from_concat(&[a.clone(), a.clone()], None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);

    let relabelled = Series::from_concat(
        &[a.clone(), a],
        Some(AxisIndex::Simple(Index::from_range(4))),
        None,
    )
    .unwrap();
    assert_eq!(relabelled.len(), 4);
}
