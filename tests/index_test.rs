use blockframe::error::ErrorKind;
use blockframe::{GrowableIndex, IlocKey, Index, IndexTrait, Label, LocKey};

#[test]
fn test_range_index_creation() {
    // Auto-generated labels
    let index = Index::from_range(5);

    assert_eq!(index.len(), 5);
    assert!(index.is_trivial());
    assert_eq!(index.label_at(0), Some(&Label::Int(0)));
    assert_eq!(index.label_at(5), None);
    assert_eq!(index.position(&Label::Int(4)), Some(4));
}

#[test]
fn test_string_index_creation() {
    let index = Index::new(vec!["apple", "banana", "cherry"]).unwrap();

    assert_eq!(index.len(), 3);
    assert!(!index.is_trivial());
    assert_eq!(index.position(&Label::from("banana")), Some(1));
    assert_eq!(index.position(&Label::from("orange")), None);
    assert!(index.contains(&Label::from("cherry")));
}

#[test]
fn test_duplicate_index_values() {
    // Duplicates are a key collision
    let err = Index::new(vec![1, 2, 3, 2, 4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Key);
}

#[test]
fn test_empty_index() {
    let index = Index::empty();
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
}

#[test]
fn test_loc_to_iloc() {
    let index = Index::new(vec!["a", "b", "c", "d"]).unwrap();

    // Scalar label
    assert_eq!(index.loc_to_iloc(&LocKey::label("c")).unwrap(), IlocKey::Position(2));

    // Label slices include the stop label
    assert_eq!(index.loc_to_iloc(&LocKey::slice("b", "c")).unwrap(), IlocKey::Slice(1..3));
    assert_eq!(index.loc_to_iloc(&LocKey::slice_from("c")).unwrap(), IlocKey::Slice(2..4));
    assert_eq!(index.loc_to_iloc(&LocKey::slice_to("a")).unwrap(), IlocKey::Slice(0..1));

    // Lists keep the requested order
    assert_eq!(
        index.loc_to_iloc(&LocKey::list(vec!["d", "a"])).unwrap(),
        IlocKey::List(vec![3, 0])
    );

    // Any missing label fails the whole list
    let err = index.loc_to_iloc(&LocKey::list(vec!["a", "z"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Key);

    // Masks must match the length
    assert!(index.loc_to_iloc(&LocKey::Mask(vec![true, false])).is_err());
}

#[test]
fn test_select_and_rename() {
    let index = Index::with_name(vec!["a", "b", "c"], Some(Label::from("letters"))).unwrap();
    let selected = index.select(&IlocKey::List(vec![2, 0])).unwrap();

    assert_eq!(selected.labels(), &[Label::from("c"), Label::from("a")]);
    assert_eq!(selected.name(), Some(&Label::from("letters")));

    let renamed = index.rename(None);
    assert_eq!(renamed.name(), None);
    assert_eq!(index.name(), Some(&Label::from("letters")));
}

#[test]
fn test_union_and_intersection_keep_first_seen_order() {
    let a = Index::new(vec!["x", "y"]).unwrap();
    let b = Index::new(vec!["z", "y"]).unwrap();

    let union = a.union(&b);
    assert_eq!(
        union.labels(),
        &[Label::from("x"), Label::from("y"), Label::from("z")]
    );

    let intersection = a.intersection(&b);
    assert_eq!(intersection.labels(), &[Label::from("y")]);
}

#[test]
fn test_relabel() {
    let index = Index::new(vec![1, 2, 3]).unwrap();
    let shifted = index
        .relabel(|l| match l {
            Label::Int(v) => Label::Int(v * 10),
            other => other.clone(),
        })
        .unwrap();
    assert_eq!(shifted.position(&Label::Int(30)), Some(2));

    // Collapsing labels onto each other is rejected
    assert!(index.relabel(|_| Label::Int(0)).is_err());
}

#[test]
fn test_add_level() {
    let index = Index::new(vec!["a", "b"]).unwrap();
    let hierarchy = index.add_level("outer").unwrap();

    assert_eq!(hierarchy.depth(), 2);
    assert_eq!(hierarchy.label_at(1), Some(Label::from(("outer", "b"))));
}

#[test]
fn test_growable_index() {
    let mut index = GrowableIndex::new();
    index.append("a").unwrap();
    index.extend(vec!["b", "c"]).unwrap();

    // Existing positions never move
    assert_eq!(index.position(&Label::from("a")), Some(0));
    assert_eq!(index.len(), 3);
    assert!(index.append("b").is_err());

    let frozen = index.to_index();
    index.append("d").unwrap();
    assert_eq!(frozen.len(), 3);
    assert_eq!(index.len(), 4);
    assert_eq!(IndexTrait::depth(&index), 1);
}
