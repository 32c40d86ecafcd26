use blockframe::error::ErrorKind;
use blockframe::{
    AxisIndex, GrowableIndexHierarchy, HLoc, IlocKey, IndexHierarchy, Label, LabelTree, LocKey,
};

fn roman_tree() -> IndexHierarchy {
    let tree = LabelTree::branches(vec![
        (
            "I",
            LabelTree::branches(vec![
                ("A", LabelTree::leaves(vec![1, 2])),
                ("B", LabelTree::leaves(vec![1, 2, 3])),
                ("C", LabelTree::leaves(vec![2, 3])),
            ]),
        ),
        (
            "II",
            LabelTree::branches(vec![
                ("A", LabelTree::leaves(vec![1, 2, 3])),
                ("B", LabelTree::leaves(vec![1])),
            ]),
        ),
    ]);
    IndexHierarchy::from_tree(&tree).unwrap()
}

fn dated_product() -> IndexHierarchy {
    IndexHierarchy::from_product(vec![
        vec!["A", "B", "C"],
        vec!["2018-01-01", "2018-01-02", "2018-01-03", "2018-01-04"],
        vec!["x", "y"],
    ])
    .unwrap()
}

fn hloc(parts: Vec<LocKey>) -> LocKey {
    LocKey::HLoc(HLoc::new(parts))
}

#[test]
fn test_tree_construction() {
    let index = roman_tree();

    assert_eq!(index.len(), 11);
    assert_eq!(index.depth(), 3);
    assert_eq!(index.label_at(0), Some(Label::from(("I", "A", 1))));
    assert_eq!(index.label_at(10), Some(Label::from(("II", "B", 1))));
    assert_eq!(index.position(&Label::from(("I", "C", 3))), Some(6));
    assert_eq!(index.position(&Label::from(("I", "C"))), None);
}

#[test]
fn test_full_depth_labels_resolve_to_positions() {
    let index = roman_tree();

    let key = hloc(vec![LocKey::label("I"), LocKey::label("B"), LocKey::label(1)]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::Position(2));

    let key = hloc(vec![LocKey::label("I"), LocKey::label("B"), LocKey::label(3)]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::Position(4));

    // A tuple label addresses every depth
    let key = LocKey::label(("II", "A", 3));
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::Position(9));
}

#[test]
fn test_leading_labels_resolve_to_slices() {
    let index = roman_tree();

    let key = hloc(vec![LocKey::label("II"), LocKey::label("A")]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::Slice(7..10));

    let key = LocKey::label(("I", "C"));
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::Slice(5..7));

    // A plain label addresses the outermost depth
    assert_eq!(
        index.loc_to_iloc(&LocKey::label("II")).unwrap(),
        IlocKey::Slice(7..11)
    );
}

#[test]
fn test_lists_and_wildcards_resolve_to_lists() {
    let index = roman_tree();

    let key = hloc(vec![LocKey::label("I"), LocKey::list(vec!["A", "C"])]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::List(vec![0, 1, 5, 6]));

    let key = hloc(vec![LocKey::All, LocKey::label("A"), LocKey::All]);
    assert_eq!(
        index.loc_to_iloc(&key).unwrap(),
        IlocKey::List(vec![0, 1, 7, 8, 9])
    );

    // Branches without the label are skipped once the search fans out
    let key = hloc(vec![LocKey::All, LocKey::label("C"), LocKey::label(3)]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::List(vec![6]));

    let key = hloc(vec![LocKey::All, LocKey::All, LocKey::label(3)]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::List(vec![4, 6, 9]));

    let key = hloc(vec![LocKey::All, LocKey::All, LocKey::label(1)]);
    assert_eq!(
        index.loc_to_iloc(&key).unwrap(),
        IlocKey::List(vec![0, 2, 7, 10])
    );
}

#[test]
fn test_unmatched_labels_fail() {
    let index = roman_tree();

    let key = hloc(vec![LocKey::label("I"), LocKey::label("Z")]);
    assert_eq!(index.loc_to_iloc(&key).unwrap_err().kind(), ErrorKind::Key);

    assert_eq!(
        index.loc_to_iloc(&LocKey::label("III")).unwrap_err().kind(),
        ErrorKind::Key
    );

    // Every requested label must match in at least one branch
    let key = hloc(vec![LocKey::All, LocKey::label("Z")]);
    assert_eq!(index.loc_to_iloc(&key).unwrap_err().kind(), ErrorKind::Key);

    // Too many parts
    let key = hloc(vec![
        LocKey::label("I"),
        LocKey::label("A"),
        LocKey::label(1),
        LocKey::label(1),
    ]);
    assert!(index.loc_to_iloc(&key).is_err());
}

#[test]
fn test_product_selection() {
    let index = dated_product();
    assert_eq!(index.len(), 24);

    let key = hloc(vec![
        LocKey::list(vec!["A", "B", "C"]),
        LocKey::list(vec!["2018-01-01", "2018-01-02", "2018-01-03", "2018-01-04"]),
        LocKey::list(vec!["x", "y"]),
    ]);
    assert_eq!(
        index.loc_to_iloc(&key).unwrap(),
        IlocKey::List((0..24).collect())
    );

    let key = hloc(vec![
        LocKey::label("B"),
        LocKey::slice_from("2018-01-03"),
        LocKey::label("y"),
    ]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::List(vec![13, 15]));

    let key = hloc(vec![LocKey::list(vec!["B", "C"]), LocKey::label("2018-01-03")]);
    assert_eq!(
        index.loc_to_iloc(&key).unwrap(),
        IlocKey::List(vec![12, 13, 20, 21])
    );

    let key = hloc(vec![LocKey::list(vec!["A", "C"]), LocKey::All, LocKey::label("y")]);
    assert_eq!(
        index.loc_to_iloc(&key).unwrap(),
        IlocKey::List(vec![1, 3, 5, 7, 17, 19, 21, 23])
    );
}

#[test]
fn test_from_labels() {
    let index = IndexHierarchy::from_labels(vec![
        ("I", "A"),
        ("I", "B"),
        ("II", "B"),
        ("III", "B"),
        ("III", "A"),
    ])
    .unwrap();

    assert_eq!(index.position(&Label::from(("II", "B"))), Some(2));
    assert_eq!(index.position(&Label::from(("III", "A"))), Some(4));
    assert_eq!(
        index.level_labels(0).unwrap(),
        vec![
            Label::from("I"),
            Label::from("I"),
            Label::from("II"),
            Label::from("III"),
            Label::from("III"),
        ]
    );
    assert!(index.level_labels(2).is_err());
}

#[test]
fn test_ungrouped_labels_are_malformed() {
    let err = IndexHierarchy::from_labels(vec![("I", "A"), ("II", "A"), ("I", "B")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);

    let err = IndexHierarchy::from_labels(vec![("I", "A"), ("I", "A")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Key);
}

#[test]
fn test_label_slices_and_lists() {
    let index = roman_tree();

    // From the first position of the start label through the last of the stop
    let key = LocKey::slice(("I", "B"), ("II", "A"));
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::Slice(2..10));

    let key = LocKey::list(vec![Label::from(("II", "B", 1)), Label::from(("I", "A"))]);
    assert_eq!(index.loc_to_iloc(&key).unwrap(), IlocKey::List(vec![10, 0, 1]));
}

#[test]
fn test_select_union_and_intersection() {
    let a = IndexHierarchy::from_labels(vec![("a", 1), ("b", 1)]).unwrap();
    let b = IndexHierarchy::from_labels(vec![("a", 2), ("b", 1)]).unwrap();

    // Union regroups by prefix
    let union = a.union(&b).unwrap();
    assert_eq!(
        union.labels(),
        vec![
            Label::from(("a", 1)),
            Label::from(("a", 2)),
            Label::from(("b", 1)),
        ]
    );

    let intersection = a.intersection(&b).unwrap();
    assert_eq!(intersection.labels(), vec![Label::from(("b", 1))]);

    let selected = union.select(&IlocKey::List(vec![2, 0])).unwrap();
    assert_eq!(selected.label_at(0), Some(Label::from(("b", 1))));

    let deeper = IndexHierarchy::from_labels(vec![("a", 1, "x")]).unwrap();
    assert!(a.union(&deeper).is_err());
}

#[test]
fn test_add_and_drop_level() {
    let index = IndexHierarchy::from_labels(vec![("a", 1), ("b", 2)]).unwrap();

    let deeper = index.add_level("top").unwrap();
    assert_eq!(deeper.depth(), 3);
    assert_eq!(deeper.position(&Label::from(("top", "b", 2))), Some(1));

    match index.drop_level(1).unwrap() {
        AxisIndex::Simple(flat) => assert_eq!(flat.labels(), &[Label::Int(1), Label::Int(2)]),
        other => panic!("expected a flat index, got {:?}", other),
    }
    match index.drop_level(-1).unwrap() {
        AxisIndex::Simple(flat) => {
            assert_eq!(flat.labels(), &[Label::from("a"), Label::from("b")])
        }
        other => panic!("expected a flat index, got {:?}", other),
    }
    assert_eq!(deeper.drop_level(1).unwrap().depth(), 2);

    assert_eq!(index.drop_level(2).unwrap_err().kind(), ErrorKind::Runtime);

    // Dropping a level that leaves duplicates is rejected
    let product = IndexHierarchy::from_product(vec![vec!["a", "b"], vec!["x", "y"]]).unwrap();
    assert_eq!(product.drop_level(1).unwrap_err().kind(), ErrorKind::Key);

    // Unique after dropping, but a key now repeats across former branches
    let spread = IndexHierarchy::from_labels(vec![("I", "A", 1), ("I", "B", 1), ("II", "A", 2)]).unwrap();
    assert_eq!(spread.drop_level(1).unwrap_err().kind(), ErrorKind::Key);
    assert_eq!(spread.drop_level(-1).unwrap().len(), 3);
}

#[test]
fn test_leaf_depths() {
    let index = roman_tree();
    let depths: Vec<usize> = index.levels().depths().collect();
    assert_eq!(depths, vec![3; 5]);

    let flat = IndexHierarchy::from_labels(vec![("a", 1), ("b", 2)]).unwrap();
    assert!(flat.levels().depths().all(|d| d == 2));

    // Leaves at different depths do not form a hierarchy
    let uneven = LabelTree::branches(vec![
        ("I", LabelTree::leaves(vec![1, 2])),
        ("II", LabelTree::branches(vec![("A", LabelTree::leaves(vec![1]))])),
    ]);
    assert_eq!(IndexHierarchy::from_tree(&uneven).unwrap_err().kind(), ErrorKind::Runtime);
}

#[test]
fn test_duplicates_rejected_at_every_depth() {
    let err = IndexHierarchy::from_labels(vec![("I", "A", 1), ("I", "A", 2), ("I", "A", 1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Key);

    let err = IndexHierarchy::from_labels(vec![
        Label::from(vec![Label::from("I"), Label::from("A"), Label::Int(1), Label::from("x")]),
        Label::from(vec![Label::from("I"), Label::from("A"), Label::Int(1), Label::from("x")]),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Key);

    let tree = LabelTree::branches(vec![(
        "I",
        LabelTree::branches(vec![("A", LabelTree::leaves(vec![1, 2, 1]))]),
    )]);
    assert_eq!(IndexHierarchy::from_tree(&tree).unwrap_err().kind(), ErrorKind::Key);

    let tree = LabelTree::branches(vec![
        ("I", LabelTree::branches(vec![("A", LabelTree::leaves(vec![1]))])),
        ("I", LabelTree::branches(vec![("B", LabelTree::leaves(vec![1]))])),
    ]);
    assert_eq!(IndexHierarchy::from_tree(&tree).unwrap_err().kind(), ErrorKind::Key);
}

#[test]
fn test_axis_index_infer_and_concat() {
    let inferred = AxisIndex::infer(vec![Label::from(("a", 1)), Label::from(("a", 2))]).unwrap();
    assert!(matches!(inferred, AxisIndex::Hierarchy(_)));

    // Ungrouped tuples stay flat
    let inferred = AxisIndex::infer(vec![
        Label::from(("a", 1)),
        Label::from(("b", 1)),
        Label::from(("a", 2)),
    ])
    .unwrap();
    assert!(matches!(inferred, AxisIndex::Simple(_)));

    let inferred = AxisIndex::infer(vec![Label::from("x"), Label::from("y")]).unwrap();
    assert_eq!(inferred.depth(), 1);

    // Auto-generated labels concatenate to a fresh range
    let a = AxisIndex::range(2);
    let b = AxisIndex::range(3);
    let joined = AxisIndex::concat(&[&a, &b]).unwrap();
    assert_eq!(joined.len(), 5);
    assert!(joined.is_trivial());

    let x = AxisIndex::from_labels(vec!["p", "q"]).unwrap();
    let y = AxisIndex::from_labels(vec!["r"]).unwrap();
    let joined = AxisIndex::concat(&[&x, &y]).unwrap();
    assert_eq!(
        joined.labels(),
        vec![Label::from("p"), Label::from("q"), Label::from("r")]
    );

    // Colliding labels cannot be concatenated
    let err = AxisIndex::concat(&[&x, &x]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn test_growable_hierarchy() {
    let mut index = GrowableIndexHierarchy::new(2);
    index.append(("I", "A")).unwrap();
    index.append(("I", "B")).unwrap();
    index.append(("II", "A")).unwrap();

    assert_eq!(index.len(), 3);
    assert_eq!(index.position(&Label::from(("I", "B"))), Some(1));

    let frozen = index.to_hierarchy();

    // Growing an earlier branch would move existing positions
    assert_eq!(index.append(("I", "C")).unwrap_err().kind(), ErrorKind::Runtime);
    assert_eq!(index.append(("II", "A")).unwrap_err().kind(), ErrorKind::Key);
    assert!(index.append(("III", "A", 1)).is_err());

    index.extend(vec![("II", "B"), ("III", "A")]).unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(frozen.len(), 3);
    assert_eq!(
        index
            .to_hierarchy()
            .loc_to_iloc(&LocKey::label("II"))
            .unwrap(),
        IlocKey::Slice(2..4)
    );
}
