use crate::config::TokenizerConfig;
use crate::domain::Token;

/// Cleans raw annotation cells into validated tokens.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Returns the cell with the absent sentinel and surrounding whitespace
    /// removed, or `None` when nothing is left.
    pub fn normalize<'a>(&self, cell: Option<&'a str>) -> Option<&'a str> {
        let trimmed = cell?.trim();
        if trimmed.is_empty() || trimmed == self.config.absent_sentinel {
            return None;
        }
        Some(trimmed)
    }

    /// Splits a cell on any configured separator, dropping empty pieces.
    /// Without separators the whole cell is one piece.
    pub fn split(&self, cell: &str) -> Vec<String> {
        let Some(first) = self.config.separators.first() else {
            return vec![cell.trim().to_string()];
        };
        self.unify_separators(cell, first)
            .split(first.as_str())
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn tokenize(&self, cell: Option<&str>) -> Vec<Token> {
        let Some(cell) = self.normalize(cell) else {
            return Vec::new();
        };
        self.split(cell)
            .iter()
            .map(|piece| self.strip_prefix(piece))
            .filter(|piece| self.config.pattern.is_match(piece))
            .map(Token::new)
            .collect()
    }

    fn unify_separators(&self, cell: &str, target: &str) -> String {
        let mut unified = cell.to_string();
        for separator in self.config.separators.iter().skip(1) {
            unified = unified.replace(separator.as_str(), target);
        }
        unified
    }

    fn strip_prefix<'a>(&self, piece: &'a str) -> &'a str {
        self.config
            .strip_prefixes
            .iter()
            .find_map(|prefix| piece.strip_prefix(prefix.as_str()))
            .map(str::trim)
            .unwrap_or(piece)
    }
}
