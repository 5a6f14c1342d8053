//! Gene Ontology term lookup from OBO documents and per-domain term counts.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::aggregate::percentage;
use crate::domain::{CategoryRow, CategorySummary, RawCell, SummaryKind};
use crate::error::AnnotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoNamespace {
    BiologicalProcess,
    CellularComponent,
    MolecularFunction,
}

impl GoNamespace {
    pub const ALL: [GoNamespace; 3] = [
        GoNamespace::BiologicalProcess,
        GoNamespace::CellularComponent,
        GoNamespace::MolecularFunction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GoNamespace::BiologicalProcess => "Biological Process",
            GoNamespace::CellularComponent => "Cellular Component",
            GoNamespace::MolecularFunction => "Molecular Function",
        }
    }
}

impl fmt::Display for GoNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoNamespace::BiologicalProcess => write!(f, "biological_process"),
            GoNamespace::CellularComponent => write!(f, "cellular_component"),
            GoNamespace::MolecularFunction => write!(f, "molecular_function"),
        }
    }
}

impl FromStr for GoNamespace {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "biological_process" => Ok(GoNamespace::BiologicalProcess),
            "cellular_component" => Ok(GoNamespace::CellularComponent),
            "molecular_function" => Ok(GoNamespace::MolecularFunction),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoTerm {
    pub id: String,
    pub name: String,
    pub namespace: GoNamespace,
}

#[derive(Debug, Clone, Default)]
pub struct GoDag {
    terms: HashMap<String, GoTerm>,
    aliases: HashMap<String, String>,
    version: Option<String>,
}

impl GoDag {
    /// Reads `[Term]` stanzas. Obsolete terms and terms without a known
    /// namespace are left out; `alt_id` entries resolve to their primary term.
    pub fn parse(text: &str) -> Self {
        let mut dag = Self::default();
        let mut stanza: Option<TermStanza> = None;
        let mut in_header = true;

        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_header = false;
                if let Some(done) = stanza.take() {
                    dag.add(done);
                }
                if line == "[Term]" {
                    stanza = Some(TermStanza::default());
                }
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if in_header {
                if key == "data-version" {
                    dag.version = Some(value.to_string());
                }
                continue;
            }
            if let Some(current) = stanza.as_mut() {
                current.set(key, value);
            }
        }
        if let Some(done) = stanza.take() {
            dag.add(done);
        }
        dag
    }

    fn add(&mut self, stanza: TermStanza) {
        let TermStanza {
            id: Some(id),
            name: Some(name),
            namespace: Some(namespace),
            alt_ids,
            obsolete: false,
        } = stanza
        else {
            return;
        };
        for alt in alt_ids {
            self.aliases.insert(alt, id.clone());
        }
        self.terms.insert(
            id.clone(),
            GoTerm {
                id,
                name,
                namespace,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&GoTerm> {
        self.terms.get(id).or_else(|| {
            self.aliases
                .get(id)
                .and_then(|primary| self.terms.get(primary))
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[derive(Debug, Default)]
struct TermStanza {
    id: Option<String>,
    name: Option<String>,
    namespace: Option<GoNamespace>,
    alt_ids: Vec<String>,
    obsolete: bool,
}

impl TermStanza {
    fn set(&mut self, key: &str, value: &str) {
        match key {
            "id" => self.id = Some(value.to_string()),
            "name" => self.name = Some(value.to_string()),
            "namespace" => self.namespace = value.parse().ok(),
            "alt_id" => self.alt_ids.push(value.to_string()),
            "is_obsolete" => self.obsolete = value == "true",
            _ => {}
        }
    }
}

/// Counts GO term names per namespace and keeps the `top_n` most common of each.
///
/// Percentages are relative to the sum of all reported counts, so the three
/// domains share one scale.
pub fn summarize<'a, I>(
    cells: I,
    dag: &GoDag,
    absent_sentinel: &str,
    top_n: usize,
) -> Result<CategorySummary, AnnotationError>
where
    I: IntoIterator<Item = &'a RawCell>,
{
    let mut counts: BTreeMap<GoNamespace, BTreeMap<&str, usize>> = BTreeMap::new();
    let mut seen_ids = 0usize;
    let mut unknown = 0usize;

    for cell in cells {
        let Some(value) = cell.value.as_deref().map(str::trim) else {
            continue;
        };
        if value.is_empty() || value == absent_sentinel {
            continue;
        }
        for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            seen_ids += 1;
            match dag.get(id) {
                Some(term) => {
                    *counts
                        .entry(term.namespace)
                        .or_default()
                        .entry(term.name.as_str())
                        .or_insert(0) += 1;
                }
                None => unknown += 1,
            }
        }
    }

    if seen_ids == 0 {
        return Err(AnnotationError::NoValidAnnotations {
            kind: SummaryKind::Go.to_string(),
        });
    }
    if counts.is_empty() {
        return Err(AnnotationError::NoCategoriesResolved {
            kind: SummaryKind::Go.to_string(),
        });
    }

    let resolved_categories = counts.values().map(BTreeMap::len).sum();
    let mut selected = Vec::new();
    for namespace in GoNamespace::ALL {
        let Some(terms) = counts.get(&namespace) else {
            continue;
        };
        let mut terms: Vec<(&str, usize)> = terms.iter().map(|(name, n)| (*name, *n)).collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(top_n);
        selected.extend(terms.into_iter().map(|(name, n)| (namespace, name, n)));
    }

    let total: usize = selected.iter().map(|(_, _, n)| n).sum();
    let rows = selected
        .into_iter()
        .map(|(namespace, name, count)| CategoryRow {
            top: namespace.label().to_string(),
            mid: name.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    Ok(CategorySummary {
        kind: SummaryKind::Go,
        total,
        resolved_categories,
        unmapped_tokens: unknown,
        rows,
    })
}
