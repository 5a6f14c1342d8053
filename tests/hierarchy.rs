use std::collections::HashMap;

use kira_annotation_summary::domain::MapId;
use kira_annotation_summary::hierarchy::Hierarchy;

const BR08901: &str = "+C\tMap number
#<h2><a href=\"/kegg/kegg2.html\"><img src=\"/Fig/bget/kegg3.gif\" align=\"middle\" border=0></a>&nbsp; KEGG Pathway Maps</h2>
!
A<b>Metabolism</b>
B  Global and overview maps
C    01100  Metabolic pathways
C    01110  Biosynthesis of secondary metabolites
B  Carbohydrate metabolism
C    00010  Glycolysis / Gluconeogenesis

C    00020  Citrate cycle (TCA cycle)
A<b>Genetic Information Processing</b>
B  Translation
C    03010  Ribosome
!
#<hr>
";

fn id(value: &str) -> MapId {
    value.parse().unwrap()
}

#[test]
fn parses_brite_document() {
    let hierarchy = Hierarchy::parse(BR08901);
    assert_eq!(hierarchy.leaf_count(), 5);
    assert_eq!(hierarchy.mid(&id("00020")), Some("Carbohydrate metabolism"));
    assert_eq!(hierarchy.top(&id("00020")), Some("Metabolism"));
    assert_eq!(hierarchy.top(&id("03010")), Some("Genetic Information Processing"));
    assert_eq!(hierarchy.top_of_mid("Translation"), Some("Genetic Information Processing"));
}

#[test]
fn leaf_before_context_is_skipped() {
    let text = "C    00010  Glycolysis\nA Metabolism\nC    00020  Citrate cycle\nB  Carbohydrate metabolism\nC    00030  Pentose phosphate pathway\n";
    let hierarchy = Hierarchy::parse(text);
    assert!(hierarchy.mid(&id("00010")).is_none());
    assert!(hierarchy.mid(&id("00020")).is_none());
    assert_eq!(hierarchy.mid(&id("00030")), Some("Carbohydrate metabolism"));
    assert_eq!(hierarchy.leaf_count(), 1);
}

#[test]
fn every_leaf_has_one_mid_and_top() {
    let hierarchy = Hierarchy::parse(BR08901);
    for leaf in hierarchy.leaf_to_mid().keys() {
        assert!(hierarchy.leaf_to_top().contains_key(leaf));
    }
    assert_eq!(hierarchy.leaf_to_mid().len(), hierarchy.leaf_to_top().len());
}

#[test]
fn conflicting_mid_keeps_first_top() {
    let text = "A Metabolism\nB  Shared\nC    00010  One\nA Cellular Processes\nB  Shared\nC    04110  Two\n";
    let hierarchy = Hierarchy::parse(text);
    assert_eq!(hierarchy.top_of_mid("Shared"), Some("Metabolism"));
    assert_eq!(hierarchy.top(&id("04110")), Some("Cellular Processes"));
}

#[test]
fn document_without_leaves_is_empty() {
    let hierarchy = Hierarchy::parse("A Metabolism\nB  Carbohydrate metabolism\n\n");
    assert!(hierarchy.is_empty());
    assert!(Hierarchy::parse("").is_empty());
}

#[test]
fn new_top_keeps_current_mid() {
    let text = "A Metabolism\nB  Carbohydrate metabolism\nA Cellular Processes\nC    00010  Glycolysis\n";
    let hierarchy = Hierarchy::parse(text);
    assert_eq!(hierarchy.mid(&id("00010")), Some("Carbohydrate metabolism"));
    assert_eq!(hierarchy.top(&id("00010")), Some("Cellular Processes"));
    assert_eq!(hierarchy.top_of_mid("Carbohydrate metabolism"), Some("Cellular Processes"));
}

#[test]
fn repeated_leaf_keeps_last_record() {
    let text = "A Metabolism\nB  Carbohydrate metabolism\nC    00010  Glycolysis\nA Environmental Information Processing\nB  Signal transduction\nC    00010  Glycolysis again\n";
    let hierarchy = Hierarchy::parse(text);
    assert_eq!(hierarchy.leaf_count(), 1);
    assert_eq!(hierarchy.mid(&id("00010")), Some("Signal transduction"));
    assert_eq!(hierarchy.top(&id("00010")), Some("Environmental Information Processing"));
}

#[test]
fn from_maps_derives_mid_to_top() {
    let leaf_to_mid = HashMap::from([
        (id("00010"), "Carbohydrate metabolism".to_string()),
        (id("00020"), "Carbohydrate metabolism".to_string()),
        (id("03010"), "Translation".to_string()),
    ]);
    let leaf_to_top = HashMap::from([
        (id("00010"), "Metabolism".to_string()),
        (id("00020"), "Cellular Processes".to_string()),
    ]);
    let hierarchy = Hierarchy::from_maps(leaf_to_mid, leaf_to_top);
    assert_eq!(hierarchy.leaf_count(), 3);
    assert_eq!(hierarchy.top_of_mid("Carbohydrate metabolism"), Some("Metabolism"));
    assert_eq!(hierarchy.top_of_mid("Translation"), None);
}
