//! COG functional category letters grouped under their four macro categories.

use std::collections::BTreeMap;

use crate::aggregate::{percentage, rank_rows};
use crate::domain::{CategoryRow, CategorySummary, RawCell, SummaryKind};
use crate::error::AnnotationError;

pub const COG_GROUPS: &[(&str, &str)] = &[
    ("POORLY CHARACTERIZED", "S"),
    ("METABOLISM", "FIQHCPEG"),
    ("INFORMATION STORAGE AND PROCESSING", "JLKA"),
    ("CELLULAR PROCESSES AND SIGNALING", "DUNVOMT"),
];

pub fn macro_category(letter: char) -> Option<&'static str> {
    COG_GROUPS
        .iter()
        .find(|(_, letters)| letters.contains(letter))
        .map(|(group, _)| *group)
}

/// Counts every uppercase letter occurrence in each non-absent cell.
pub fn count_letters<'a, I>(cells: I, absent_sentinel: &str) -> BTreeMap<char, usize>
where
    I: IntoIterator<Item = &'a RawCell>,
{
    let mut counts = BTreeMap::new();
    for cell in cells {
        let Some(value) = cell.value.as_deref().map(str::trim) else {
            continue;
        };
        if value.is_empty() || value == absent_sentinel {
            continue;
        }
        for letter in value.chars().map(|ch| ch.to_ascii_uppercase()) {
            if letter.is_ascii_uppercase() {
                *counts.entry(letter).or_insert(0) += 1;
            }
        }
    }
    counts
}

pub fn summarize<'a, I>(cells: I, absent_sentinel: &str) -> Result<CategorySummary, AnnotationError>
where
    I: IntoIterator<Item = &'a RawCell>,
{
    let counts = count_letters(cells, absent_sentinel);
    if counts.is_empty() {
        return Err(AnnotationError::NoValidAnnotations {
            kind: SummaryKind::Cog.to_string(),
        });
    }

    let grouped: Vec<(char, &str, usize)> = counts
        .iter()
        .filter_map(|(letter, count)| macro_category(*letter).map(|group| (*letter, group, *count)))
        .collect();
    let ungrouped: usize = counts
        .iter()
        .filter(|(letter, _)| macro_category(**letter).is_none())
        .map(|(_, count)| *count)
        .sum();
    if grouped.is_empty() {
        return Err(AnnotationError::NoCategoriesResolved {
            kind: SummaryKind::Cog.to_string(),
        });
    }

    let total: usize = grouped.iter().map(|(_, _, count)| count).sum();
    let rows: Vec<CategoryRow> = grouped
        .into_iter()
        .map(|(letter, group, count)| CategoryRow {
            top: group.to_string(),
            mid: letter.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    let resolved_categories = rows.len();

    Ok(CategorySummary {
        kind: SummaryKind::Cog,
        total,
        resolved_categories,
        unmapped_tokens: ungrouped,
        rows: rank_rows(rows, resolved_categories),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<RawCell> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| RawCell::new(format!("g{i}"), Some(*value)))
            .collect()
    }

    #[test]
    fn multi_letter_cells_count_each_letter() {
        let counts = count_letters(&cells(&["KL", "K", "-", ""]), "-");
        assert_eq!(counts.get(&'K'), Some(&2));
        assert_eq!(counts.get(&'L'), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn letters_are_grouped() {
        assert_eq!(macro_category('S'), Some("POORLY CHARACTERIZED"));
        assert_eq!(macro_category('G'), Some("METABOLISM"));
        assert_eq!(macro_category('Z'), None);
    }

    #[test]
    fn ungrouped_letters_are_not_in_rows() {
        let summary = summarize(&cells(&["Z", "C", "C", "J"]), "-").unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.unmapped_tokens, 1);
        assert_eq!(summary.rows[0].mid, "C");
        assert_eq!(summary.rows[0].top, "METABOLISM");
        assert!((summary.rows[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    }
}
