use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Kegg,
    Cog,
    Go,
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryKind::Kegg => write!(f, "KEGG"),
            SummaryKind::Cog => write!(f, "COG"),
            SummaryKind::Go => write!(f, "GO"),
        }
    }
}

/// A validated annotation code, e.g. the KEGG orthology id `K00001`.
///
/// Only [`crate::tokenizer::Tokenizer`] produces tokens, so every value has
/// passed the configured validation pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leaf category of the pathway hierarchy: a numeric pathway map id such as `00010`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(String);

impl MapId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MapId {
    type Err = AnnotationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let is_valid = !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit());
        if !is_valid {
            return Err(AnnotationError::InvalidMapId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// One row of the input table: an entity identifier and its raw annotation cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub entity: String,
    pub value: Option<String>,
}

impl RawCell {
    pub fn new(entity: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            entity: entity.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Output record handed to rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub top: String,
    pub mid: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub kind: SummaryKind,
    /// Denominator of `percentage`.
    pub total: usize,
    /// Categories with a nonzero count, before top-N truncation.
    pub resolved_categories: usize,
    pub unmapped_tokens: usize,
    pub rows: Vec<CategoryRow>,
}

impl CategorySummary {
    /// Rows ordered by ascending percentage, the order horizontal bar charts draw in.
    pub fn ascending_rows(&self) -> Vec<CategoryRow> {
        let mut rows = self.rows.clone();
        rows.reverse();
        rows
    }
}
