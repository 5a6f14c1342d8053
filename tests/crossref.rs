use kira_annotation_summary::crossref::CrossReferenceIndex;

#[test]
fn builds_many_to_many_index() {
    let text = "ko:K00001\tpath:map00010\nko:K00001\tpath:ko00010\nko:K00001\tpath:map00071\nko:K00002\tpath:map00010\n";
    let index = CrossReferenceIndex::parse(text);
    assert_eq!(index.token_count(), 2);
    assert_eq!(index.edge_count(), 3);

    let leaves: Vec<&str> = index
        .leaves("K00001")
        .unwrap()
        .iter()
        .map(|leaf| leaf.as_str())
        .collect();
    assert_eq!(leaves, vec!["00010", "00071"]);
    assert_eq!(index.leaves("K00002").unwrap().len(), 1);
}

#[test]
fn malformed_lines_are_skipped() {
    let text = "\nko:K00001 path:map00010\nko:K00003\tpath:mapXXXXX\nko:K00004\tpath:rn00010\nko:K00005\tpath:map001\n\tpath:map00010\nko:K00006\tpath:map00500\n";
    let index = CrossReferenceIndex::parse(text);
    assert_eq!(index.token_count(), 1);
    assert!(index.leaves("K00001").is_none());
    assert!(index.leaves("K00006").is_some());
}

#[test]
fn unprefixed_columns_are_accepted() {
    let index = CrossReferenceIndex::parse("K00001\tmap00010\n");
    assert_eq!(
        index.leaves("K00001").unwrap().iter().next().unwrap().as_str(),
        "00010"
    );
}

#[test]
fn padded_leaf_id_is_skipped() {
    let index = CrossReferenceIndex::parse("ko:K00001\tpath:map 00010\nko:K00002\tpath:ko0001 0\n");
    assert!(index.is_empty());
}
