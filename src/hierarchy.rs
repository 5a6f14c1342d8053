//! Parser for line-tagged BRITE hierarchy documents such as `br:br08901`.
//!
//! ```text
//! A<b>Metabolism</b>
//! B  Carbohydrate metabolism
//! C    00010  Glycolysis / Gluconeogenesis
//! ```

use std::collections::HashMap;

use crate::domain::MapId;

const TOP_TAG: char = 'A';
const MID_TAG: char = 'B';
const LEAF_TAG: char = 'C';

/// Leaf → mid and leaf → top category mappings, plus the derived mid → top index.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    leaf_to_mid: HashMap<MapId, String>,
    leaf_to_top: HashMap<MapId, String>,
    mid_to_top: HashMap<String, String>,
}

impl Hierarchy {
    pub fn parse(text: &str) -> Self {
        let mut parser = HierarchyParser::default();
        for line in text.lines() {
            parser.feed(line);
        }
        parser.finish()
    }

    /// Builds a hierarchy from leaf-level mappings. Mid → top is derived in
    /// leaf id order; a mid listed under several tops keeps the first.
    pub fn from_maps(
        leaf_to_mid: HashMap<MapId, String>,
        leaf_to_top: HashMap<MapId, String>,
    ) -> Self {
        let mut leaves: Vec<&MapId> = leaf_to_mid.keys().collect();
        leaves.sort();
        let mut mid_to_top = HashMap::new();
        for leaf in leaves {
            if let (Some(mid), Some(top)) = (leaf_to_mid.get(leaf), leaf_to_top.get(leaf)) {
                link_mid(&mut mid_to_top, mid, top);
            }
        }
        Self {
            leaf_to_mid,
            leaf_to_top,
            mid_to_top,
        }
    }

    pub fn mid(&self, leaf: &MapId) -> Option<&str> {
        self.leaf_to_mid.get(leaf).map(String::as_str)
    }

    pub fn top(&self, leaf: &MapId) -> Option<&str> {
        self.leaf_to_top.get(leaf).map(String::as_str)
    }

    pub fn top_of_mid(&self, mid: &str) -> Option<&str> {
        self.mid_to_top.get(mid).map(String::as_str)
    }

    pub fn leaf_to_mid(&self) -> &HashMap<MapId, String> {
        &self.leaf_to_mid
    }

    pub fn leaf_to_top(&self) -> &HashMap<MapId, String> {
        &self.leaf_to_top
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_to_mid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_to_mid.is_empty()
    }
}

/// Single-pass state machine over hierarchy lines.
#[derive(Debug, Default)]
pub struct HierarchyParser {
    current_top: Option<String>,
    current_mid: Option<String>,
    hierarchy: Hierarchy,
    skipped_leaves: usize,
}

impl HierarchyParser {
    pub fn feed(&mut self, line: &str) {
        let mut chars = line.chars();
        let Some(tag) = chars.next() else {
            return;
        };
        let rest = chars.as_str();
        match tag {
            TOP_TAG => {
                self.current_top = non_empty(category_name(rest));
            }
            MID_TAG => {
                self.current_mid = non_empty(category_name(rest));
            }
            LEAF_TAG => self.leaf(rest),
            _ => {}
        }
    }

    pub fn finish(self) -> Hierarchy {
        if self.skipped_leaves > 0 {
            tracing::debug!(
                skipped = self.skipped_leaves,
                "skipped hierarchy leaf lines without id or context"
            );
        }
        self.hierarchy
    }

    fn leaf(&mut self, rest: &str) {
        let Some(id) = rest
            .split_whitespace()
            .next()
            .and_then(|first| first.parse::<MapId>().ok())
        else {
            self.skipped_leaves += 1;
            return;
        };
        let (Some(top), Some(mid)) = (&self.current_top, &self.current_mid) else {
            self.skipped_leaves += 1;
            return;
        };

        if self.hierarchy.leaf_to_mid.contains_key(&id) {
            tracing::debug!(leaf = %id, "duplicate hierarchy leaf, keeping last");
        }

        link_mid(&mut self.hierarchy.mid_to_top, mid, top);
        self.hierarchy.leaf_to_mid.insert(id.clone(), mid.clone());
        self.hierarchy.leaf_to_top.insert(id, top.clone());
    }
}

fn link_mid(mid_to_top: &mut HashMap<String, String>, mid: &str, top: &str) {
    match mid_to_top.get(mid) {
        Some(existing) if existing != top => {
            tracing::warn!(
                mid = %mid,
                kept = %existing,
                ignored = %top,
                "category listed under more than one top level, keeping first"
            );
        }
        Some(_) => {}
        None => {
            mid_to_top.insert(mid.to_string(), top.to_string());
        }
    }
}

fn category_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => name.push(ch),
            _ => {}
        }
    }
    name.trim().to_string()
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> MapId {
        value.parse().unwrap()
    }

    #[test]
    fn strips_markup_from_names() {
        assert_eq!(category_name("<b>Metabolism</b>"), "Metabolism");
        assert_eq!(category_name("  Carbohydrate metabolism"), "Carbohydrate metabolism");
    }

    #[test]
    fn mid_context_survives_new_top() {
        let text = "A Metabolism\nB  Glycolysis\nA Genetic Information Processing\nC    03010  Ribosome\n";
        let hierarchy = Hierarchy::parse(text);
        assert_eq!(hierarchy.mid(&id("03010")), Some("Glycolysis"));
        assert_eq!(hierarchy.top(&id("03010")), Some("Genetic Information Processing"));
    }

    #[test]
    fn ignores_non_numeric_leaf() {
        let text = "A Metabolism\nB  Global\nC    Map  number\nC    01100  Metabolic pathways\n";
        let hierarchy = Hierarchy::parse(text);
        assert_eq!(hierarchy.leaf_count(), 1);
        assert_eq!(hierarchy.top(&id("01100")), Some("Metabolism"));
    }
}
