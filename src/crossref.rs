//! Token → pathway map index built from the KEGG `link/pathway/ko` feed.
//!
//! ```text
//! ko:K00001	path:map00010
//! ko:K00001	path:ko00010
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::domain::MapId;

const TOKEN_NAMESPACE: &str = "ko:";
const LEAF_NAMESPACE: &str = "path:";

/// Where the numeric map id sits inside a namespaced pathway key.
#[derive(Debug, Clone, Copy)]
pub struct LeafIdRule {
    pub prefix: &'static str,
    pub id_len: usize,
}

impl LeafIdRule {
    fn extract<'a>(&self, key: &'a str) -> Option<&'a str> {
        let rest = key.strip_prefix(self.prefix)?;
        let digits = rest.get(..self.id_len)?;
        digits
            .bytes()
            .all(|byte| byte.is_ascii_digit())
            .then_some(digits)
    }
}

pub const LEAF_ID_RULES: &[LeafIdRule] = &[
    LeafIdRule {
        prefix: "map",
        id_len: 5,
    },
    LeafIdRule {
        prefix: "ko",
        id_len: 5,
    },
];

#[derive(Debug, Clone, Default)]
pub struct CrossReferenceIndex {
    edges: HashMap<String, BTreeSet<MapId>>,
}

impl CrossReferenceIndex {
    pub fn parse(text: &str) -> Self {
        let mut index = Self::default();
        let mut skipped = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_edge(line) {
                Some((token, leaf)) => {
                    index.edges.entry(token.to_string()).or_default().insert(leaf);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "skipped malformed relation lines");
        }
        index
    }

    pub fn leaves(&self, token: &str) -> Option<&BTreeSet<MapId>> {
        self.edges.get(token)
    }

    pub fn token_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Parses one `ko:Kxxxxx<TAB>path:mapxxxxx` line.
pub fn parse_edge(line: &str) -> Option<(&str, MapId)> {
    let (left, right) = line.split_once('\t')?;
    let left = left.trim();
    let token = left.strip_prefix(TOKEN_NAMESPACE).unwrap_or(left).trim();
    if token.is_empty() {
        return None;
    }
    let right = right.trim();
    let key = right.strip_prefix(LEAF_NAMESPACE).unwrap_or(right).trim();
    let leaf = extract_leaf_id(key)?;
    Some((token, leaf))
}

pub fn extract_leaf_id(key: &str) -> Option<MapId> {
    LEAF_ID_RULES
        .iter()
        .find(|rule| key.starts_with(rule.prefix))
        .and_then(|rule| rule.extract(key))
        .and_then(|digits| digits.parse().ok())
}
