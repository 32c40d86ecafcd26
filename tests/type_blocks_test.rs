use blockframe::error::ErrorKind;
use blockframe::type_blocks::Extracted;
use blockframe::{
    AssignGrid, Block, BlockStore, DType, GrowableBlockSet, IlocKey, Reduction, TypedBlockSet,
    Value,
};

/// int64 pair, float64, bool, str
fn mixed() -> TypedBlockSet {
    TypedBlockSet::from_blocks(vec![
        Block::from_columns(vec![vec![1i64, 2, 3], vec![4, 5, 6]]).unwrap(),
        Block::from_vec(vec![0.5, 1.5, 2.5]),
        Block::from_vec(vec![true, false, true]),
        Block::from_vec(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
    ])
    .unwrap()
}

#[test]
fn test_shape_and_dtypes() {
    let set = mixed();

    assert_eq!(set.shape(), (3, 5));
    assert_eq!(set.block_count(), 4);
    assert_eq!(
        set.dtypes(),
        vec![
            DType::Int64,
            DType::Int64,
            DType::Float64,
            DType::Bool,
            DType::Str
        ]
    );
    assert_eq!(set.value(2, 1).unwrap(), Value::Int(6));
    assert_eq!(set.row(0).unwrap()[4], Value::Str("a".into()));
    assert!(set.value(3, 0).is_err());
}

#[test]
fn test_rows_must_agree() {
    let err = TypedBlockSet::from_blocks(vec![
        Block::from_vec(vec![1i64, 2]),
        Block::from_vec(vec![1i64, 2, 3]),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    let empty = TypedBlockSet::from_blocks(Vec::new()).unwrap();
    assert_eq!(empty.shape(), (0, 0));
}

#[test]
fn test_extract_collapses_axes() {
    let set = mixed();

    // Both axes collapse to an element
    match set.extract(&IlocKey::Position(1), &IlocKey::Position(2)).unwrap() {
        Extracted::Element(v) => assert_eq!(v, Value::Float(1.5)),
        other => panic!("expected an element, got {:?}", other),
    }

    // One column comes back one-dimensional
    match set.extract(&IlocKey::All, &IlocKey::Position(1)).unwrap() {
        Extracted::Array(column) => {
            assert_eq!(column.ndim(), 1);
            assert_eq!(column.values(), vec![Value::Int(4), Value::Int(5), Value::Int(6)]);
        }
        other => panic!("expected an array, got {:?}", other),
    }

    // One row resolves the column types
    match set.extract(&IlocKey::Position(0), &IlocKey::Slice(0..3)).unwrap() {
        Extracted::Array(row) => {
            assert_eq!(row.dtype(), DType::Float64);
            assert_eq!(row.rows(), 3);
        }
        other => panic!("expected an array, got {:?}", other),
    }
    match set.extract(&IlocKey::Position(0), &IlocKey::List(vec![0, 3])).unwrap() {
        Extracted::Array(row) => assert_eq!(row.dtype(), DType::Object),
        other => panic!("expected an array, got {:?}", other),
    }

    match set.extract(&IlocKey::Slice(0..2), &IlocKey::Slice(1..3)).unwrap() {
        Extracted::Blocks(sub) => assert_eq!(sub.shape(), (2, 2)),
        other => panic!("expected blocks, got {:?}", other),
    }

    assert!(set.extract(&IlocKey::Position(5), &IlocKey::All).is_err());
}

#[test]
fn test_column_selection_shares_buffers() {
    let set = mixed();
    let source = &set.blocks()[0];

    let column = set.column(1).unwrap();
    assert!(column.shares_buffer(source));

    // Full-row selections slice existing blocks
    let sub = set.select_columns(&[0, 1, 2]);
    assert_eq!(sub.block_count(), 2);
    assert!(sub.blocks()[0].shares_buffer(source));
    assert!(sub.blocks()[1].shares_buffer(&set.blocks()[1]));

    match set.extract(&IlocKey::All, &IlocKey::Position(0)).unwrap() {
        Extracted::Array(column) => assert!(column.shares_buffer(source)),
        other => panic!("expected an array, got {:?}", other),
    }

    // Row subsets copy
    let rows = set.take_rows(&[2, 0]);
    assert!(!rows.blocks()[0].shares_buffer(source));
    assert_eq!(rows.value(0, 0).unwrap(), Value::Int(3));
}

#[test]
fn test_consolidate_merges_adjacent_types() {
    let set = TypedBlockSet::from_blocks(vec![
        Block::from_vec(vec![1i64, 2]),
        Block::from_vec(vec![3i64, 4]),
        Block::from_vec(vec![1.0, 2.0]),
        Block::from_vec(vec![5i64, 6]),
    ])
    .unwrap();

    let merged = set.consolidate().unwrap();
    assert_eq!(merged.block_count(), 3);
    assert_eq!(merged.shape(), set.shape());
    assert_eq!(merged.dtypes(), set.dtypes());
    assert_eq!(merged.value(1, 1).unwrap(), Value::Int(4));

    // Source is unchanged
    assert_eq!(set.block_count(), 4);
}

#[test]
fn test_from_columns_groups_runs() {
    let set = TypedBlockSet::from_columns(
        vec![
            Block::from_vec(vec![1i64, 2]),
            Block::from_vec(vec![3i64, 4]),
            Block::from_vec(vec![true, false]),
        ],
        2,
    )
    .unwrap();
    assert_eq!(set.block_count(), 2);
    assert_eq!(set.blocks()[0].ndim(), 2);

    assert!(TypedBlockSet::from_columns(vec![Block::from_vec(vec![1i64])], 2).is_err());
}

#[test]
fn test_concat() {
    let a = TypedBlockSet::from_blocks(vec![Block::from_vec(vec![1i64, 2])]).unwrap();
    let b = TypedBlockSet::from_blocks(vec![Block::from_vec(vec![0.5, 1.5])]).unwrap();

    let side = TypedBlockSet::concat_columns(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(side.shape(), (2, 2));
    assert!(side.blocks()[0].shares_buffer(&a.blocks()[0]));

    // Stacking promotes mismatched column types
    let stacked = TypedBlockSet::concat_rows(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(stacked.shape(), (4, 1));
    assert_eq!(stacked.dtypes(), vec![DType::Float64]);
    assert_eq!(stacked.value(1, 0).unwrap(), Value::Float(2.0));

    let same = TypedBlockSet::concat_rows(&[a.clone(), a.clone()]).unwrap();
    assert_eq!(same.dtypes(), vec![DType::Int64]);

    let short = TypedBlockSet::from_blocks(vec![Block::from_vec(vec![1i64])]).unwrap();
    assert!(TypedBlockSet::concat_columns(&[a.clone(), short]).is_err());
    assert!(TypedBlockSet::concat_rows(&[a, side]).is_err());
}

#[test]
fn test_assign_rebuilds_only_touched_columns() {
    let set = mixed();

    let updated = set
        .assign(&[0], &[2], &AssignGrid::Element(Value::Float(9.0)))
        .unwrap();
    assert_eq!(updated.value(0, 2).unwrap(), Value::Float(9.0));
    assert_eq!(set.value(0, 2).unwrap(), Value::Float(0.5));
    assert!(updated.blocks()[0].shares_buffer(&set.blocks()[0]));

    // Writing text into an integer column promotes it
    let updated = set
        .assign(&[1], &[0], &AssignGrid::Element(Value::Str("x".into())))
        .unwrap();
    assert_eq!(updated.dtype(0).unwrap(), DType::Object);
    assert_eq!(updated.dtype(1).unwrap(), DType::Int64);

    let grid = AssignGrid::Rows(vec![vec![Value::Int(10), Value::Int(20)]]);
    let updated = set.assign(&[2], &[0, 1], &grid).unwrap();
    let row = updated.row(2).unwrap();
    assert_eq!(row[..2], [Value::Int(10), Value::Int(20)]);

    let bad = AssignGrid::Rows(vec![vec![Value::Int(1)]]);
    assert!(set.assign(&[0], &[0, 1], &bad).is_err());
    assert!(set.assign(&[7], &[0], &AssignGrid::Element(Value::Int(1))).is_err());
}

#[test]
fn test_reindex_fill() {
    let set = TypedBlockSet::from_blocks(vec![
        Block::from_vec(vec![1i64, 2]),
        Block::from_vec(vec!["a".to_string(), "b".to_string()]),
    ])
    .unwrap();

    let filled = set.take_rows_filled(&[Some(1), None], None).unwrap();
    assert_eq!(filled.dtypes(), vec![DType::Float64, DType::Object]);
    assert!(matches!(filled.value(1, 0).unwrap(), Value::Float(v) if v.is_nan()));
    assert_eq!(filled.value(1, 1).unwrap(), Value::None);

    let filled = set
        .take_rows_filled(&[None, Some(0)], Some(&Value::Int(0)))
        .unwrap();
    assert_eq!(filled.dtypes()[0], DType::Int64);
    assert_eq!(filled.value(0, 0).unwrap(), Value::Int(0));

    let identity = set.take_rows_filled(&[Some(0), Some(1)], None).unwrap();
    assert!(identity.blocks()[0].shares_buffer(&set.blocks()[0]));

    let columns = set.take_columns_filled(&[Some(1), None], None).unwrap();
    assert_eq!(columns.shape(), (2, 2));
    assert_eq!(columns.dtypes(), vec![DType::Str, DType::Float64]);
}

#[test]
fn test_reduce_along_axes() {
    let set = TypedBlockSet::from_blocks(vec![
        Block::from_columns(vec![vec![1i64, 2, 3], vec![4, 5, 6]]).unwrap(),
    ])
    .unwrap();

    assert_eq!(
        set.reduce(0, Reduction::Sum).unwrap(),
        vec![Value::Int(6), Value::Int(15)]
    );
    assert_eq!(
        set.reduce(1, Reduction::Max).unwrap(),
        vec![Value::Int(4), Value::Int(5), Value::Int(6)]
    );
    assert!(set.reduce(2, Reduction::Sum).is_err());
}

#[test]
fn test_growable_block_set() {
    let mut growable = GrowableBlockSet::new(2);
    growable.append_column(Block::from_vec(vec![1i64, 2])).unwrap();

    let frozen = growable.snapshot();
    growable.append_column(Block::from_vec(vec![0.5, 1.5])).unwrap();

    // Earlier snapshots keep their shape
    assert_eq!(frozen.shape(), (2, 1));
    assert_eq!(BlockStore::shape(&growable), (2, 2));
    assert!(growable.blocks()[0].shares_buffer(&frozen.blocks()[0]));

    assert!(growable.append_column(Block::from_vec(vec![1i64])).is_err());
    let wide = Block::from_columns(vec![vec![1i64, 2], vec![3, 4]]).unwrap();
    assert!(growable.append_column(wide.clone()).is_err());
    growable.append_block(wide).unwrap();

    let set = growable.freeze();
    assert_eq!(set.shape(), (2, 4));
    assert_eq!(set.value(1, 3).unwrap(), Value::Int(4));
}
