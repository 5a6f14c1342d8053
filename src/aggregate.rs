use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::crossref::CrossReferenceIndex;
use crate::domain::{CategoryRow, CategorySummary, RawCell, SummaryKind, Token};
use crate::error::AnnotationError;
use crate::hierarchy::Hierarchy;
use crate::tokenizer::Tokenizer;

/// Top-level bucket for categories the hierarchy gives no parent for.
pub const UNCLASSIFIED_TOP: &str = "Other";

/// Valid tokens per entity. Rows sharing an identifier are merged, and
/// entities without any valid token are left out.
#[derive(Debug, Clone, Default)]
pub struct EntityTokens {
    entities: BTreeMap<String, BTreeSet<Token>>,
}

impl EntityTokens {
    pub fn from_cells<'a, I>(tokenizer: &Tokenizer, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a RawCell>,
    {
        let mut entities = Self::default();
        for cell in cells {
            let tokens = tokenizer.tokenize(cell.value.as_deref());
            entities.insert(&cell.entity, tokens);
        }
        entities
    }

    pub fn insert(&mut self, entity: &str, tokens: impl IntoIterator<Item = Token>) {
        let mut tokens = tokens.into_iter().peekable();
        if tokens.peek().is_none() {
            return;
        }
        self.entities
            .entry(entity.to_string())
            .or_default()
            .extend(tokens);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Token>)> {
        self.entities
            .iter()
            .map(|(entity, tokens)| (entity.as_str(), tokens))
    }
}

/// Entity counts per category with default-zero lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: BTreeMap<String, usize>,
}

impl CategoryCounts {
    pub fn increment(&mut self, category: &str) {
        *self.counts.entry(category.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

pub struct AggregationEngine<'a> {
    hierarchy: &'a Hierarchy,
    crossref: &'a CrossReferenceIndex,
    top_n: usize,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(hierarchy: &'a Hierarchy, crossref: &'a CrossReferenceIndex, top_n: usize) -> Self {
        Self {
            hierarchy,
            crossref,
            top_n,
        }
    }

    /// Mid categories reachable from any of the tokens.
    pub fn membership<'t>(&self, tokens: impl IntoIterator<Item = &'t Token>) -> BTreeSet<&'a str> {
        let mut mids = BTreeSet::new();
        for token in tokens {
            let Some(leaves) = self.crossref.leaves(token.as_str()) else {
                continue;
            };
            for leaf in leaves {
                if let Some(mid) = self.hierarchy.mid(leaf) {
                    mids.insert(mid);
                }
            }
        }
        mids
    }

    pub fn count(&self, entities: &EntityTokens) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for (_, tokens) in entities.iter() {
            for mid in self.membership(tokens) {
                counts.increment(mid);
            }
        }
        counts
    }

    pub fn aggregate(&self, entities: &EntityTokens) -> Result<CategorySummary, AnnotationError> {
        if entities.is_empty() {
            return Err(AnnotationError::NoValidAnnotations {
                kind: SummaryKind::Kegg.to_string(),
            });
        }

        let counts = self.count(entities);
        if counts.is_empty() {
            return Err(AnnotationError::NoCategoriesResolved {
                kind: SummaryKind::Kegg.to_string(),
            });
        }

        let total = entities.len();
        let rows = counts
            .iter()
            .map(|(mid, count)| CategoryRow {
                top: self
                    .hierarchy
                    .top_of_mid(mid)
                    .unwrap_or(UNCLASSIFIED_TOP)
                    .to_string(),
                mid: mid.to_string(),
                count,
                percentage: percentage(count, total),
            })
            .collect();
        let unmapped_tokens = self.unmapped_tokens(entities);
        if unmapped_tokens > 0 {
            tracing::debug!(unmapped_tokens, "tokens without a pathway link");
        }

        Ok(CategorySummary {
            kind: SummaryKind::Kegg,
            total,
            resolved_categories: counts.len(),
            unmapped_tokens,
            rows: rank_rows(rows, self.top_n),
        })
    }

    fn unmapped_tokens(&self, entities: &EntityTokens) -> usize {
        entities
            .iter()
            .flat_map(|(_, tokens)| tokens.iter())
            .filter(|token| self.crossref.leaves(token.as_str()).is_none())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * count as f64 / total as f64
}

/// Sorts by percentage descending (then count, then name) and keeps `top_n` rows.
pub fn rank_rows(mut rows: Vec<CategoryRow>, top_n: usize) -> Vec<CategoryRow> {
    rows.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.mid.cmp(&b.mid))
    });
    rows.truncate(top_n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenizerConfig;

    const HIERARCHY: &str = "A Metabolism\nB  Carbohydrate metabolism\nC    00010  Glycolysis\nC    00020  Citrate cycle\nB  Energy metabolism\nC    00190  Oxidative phosphorylation\n";
    const LINKS: &str = "ko:K00001\tpath:map00010\nko:K00002\tpath:map00020\nko:K00003\tpath:map00190\n";

    fn entities(cells: &[(&str, &str)]) -> EntityTokens {
        let tokenizer = Tokenizer::new(TokenizerConfig::default());
        let cells: Vec<RawCell> = cells
            .iter()
            .map(|(entity, value)| RawCell::new(*entity, Some(*value)))
            .collect();
        EntityTokens::from_cells(&tokenizer, &cells)
    }

    #[test]
    fn rows_sharing_identifier_are_one_entity() {
        let entities = entities(&[("g1", "K00001"), ("g1", "K00003"), ("g2", "-")]);
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn counts_default_to_zero() {
        let hierarchy = Hierarchy::parse(HIERARCHY);
        let crossref = CrossReferenceIndex::parse(LINKS);
        let engine = AggregationEngine::new(&hierarchy, &crossref, 10);
        let counts = engine.count(&entities(&[("g1", "K00001,K00002")]));
        assert_eq!(counts.get("Carbohydrate metabolism"), 1);
        assert_eq!(counts.get("Energy metabolism"), 0);
    }

    #[test]
    fn truncates_to_top_n() {
        let hierarchy = Hierarchy::parse(HIERARCHY);
        let crossref = CrossReferenceIndex::parse(LINKS);
        let engine = AggregationEngine::new(&hierarchy, &crossref, 1);
        let summary = engine
            .aggregate(&entities(&[("g1", "K00001"), ("g2", "K00003"), ("g3", "K00002")]))
            .unwrap();
        assert_eq!(summary.resolved_categories, 2);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].mid, "Carbohydrate metabolism");
        assert_eq!(summary.rows[0].count, 2);
    }
}
