//! eggNOG-mapper annotation tables (`*.emapper.annotations`, tab separated).

use camino::Utf8Path;

use crate::domain::RawCell;
use crate::error::AnnotationError;
use crate::fs_util;

#[derive(Debug, Clone)]
pub struct AnnotationTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// How a requested column name is matched against the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMatch {
    Exact,
    Contains,
}

impl AnnotationTable {
    pub fn load(path: &Utf8Path) -> Result<Self, AnnotationError> {
        let text = fs_util::read_text(path)?;
        Self::parse(&text).ok_or_else(|| AnnotationError::EmptyTable(path.to_string()))
    }

    /// Parses tab-separated text. `##` lines are comments; the first other line
    /// is the header, with a leading `#` dropped (`#query` → `query`).
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text
            .lines()
            .filter(|line| !line.starts_with("##") && !line.trim().is_empty());
        let header = lines.next()?;
        let columns = split_row(header.strip_prefix('#').unwrap_or(header))
            .into_iter()
            .map(|name| name.trim().to_string())
            .collect();
        let rows = lines.map(split_row).collect();
        Some(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str, matching: ColumnMatch) -> Result<usize, AnnotationError> {
        self.columns
            .iter()
            .position(|column| match matching {
                ColumnMatch::Exact => column == name,
                ColumnMatch::Contains => column.contains(name),
            })
            .ok_or_else(|| AnnotationError::MissingRequiredColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    /// Entity column index, falling back to the first column when `name` is absent.
    pub fn entity_index(&self, name: &str) -> usize {
        match self.column_index(name, ColumnMatch::Exact) {
            Ok(index) => index,
            Err(_) => {
                tracing::debug!(
                    column = name,
                    fallback = self.columns.first().map(String::as_str).unwrap_or_default(),
                    "entity column not found, using first column"
                );
                0
            }
        }
    }

    /// (entity, raw cell) pairs for the given columns. Short rows yield absent cells.
    pub fn cells(&self, entity_index: usize, value_index: usize) -> Vec<RawCell> {
        self.rows
            .iter()
            .map(|row| RawCell {
                entity: row.get(entity_index).cloned().unwrap_or_default(),
                value: row.get(value_index).cloned(),
            })
            .collect()
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TABLE: &str = "## emapper-2.1.12\n#query\tseed_ortholog\tCOG_category\tGOs\tKEGG_ko\ngene1\tx\tC\t-\tko:K00001\ngene2\tx\tS\n## 2 queries scanned\n";

    #[test]
    fn strips_comment_lines_and_header_hash() {
        let table = AnnotationTable::parse(TABLE).unwrap();
        assert_eq!(table.columns()[0], "query");
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn short_rows_give_absent_cells() {
        let table = AnnotationTable::parse(TABLE).unwrap();
        let kegg = table.column_index("KEGG_ko", ColumnMatch::Exact).unwrap();
        let cells = table.cells(0, kegg);
        assert_eq!(cells[0].value.as_deref(), Some("ko:K00001"));
        assert_eq!(cells[1].value, None);
    }

    #[test]
    fn missing_column_lists_available() {
        let table = AnnotationTable::parse(TABLE).unwrap();
        let err = table.column_index("KEGG_Pathway", ColumnMatch::Exact).unwrap_err();
        assert_matches!(
            err,
            AnnotationError::MissingRequiredColumn { ref available, .. } if available.len() == 5
        );
    }

    #[test]
    fn entity_column_falls_back_to_first() {
        let table = AnnotationTable::parse(TABLE).unwrap();
        assert_eq!(table.entity_index("gene_id"), 0);
        assert_eq!(table.entity_index("seed_ortholog"), 1);
    }
}
