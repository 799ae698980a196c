//! Free-text opinion extraction.

use tracing::debug;

use crate::error::Result;
use crate::input::SurveyTable;

/// Join every usable opinion in the filtered rows with single spaces.
///
/// Values are trimmed; missing and blank values are skipped. Returns an
/// empty string when nothing is usable, which callers treat as "skip the
/// word cloud". The corpus is rebuilt on every call.
pub fn extract_corpus(filtered: &SurveyTable, opinion_field: &str) -> Result<String> {
    let index = filtered.require_column(opinion_field)?;

    let corpus = (0..filtered.row_count())
        .filter_map(|row| filtered.label(row, index))
        .collect::<Vec<_>>()
        .join(" ");

    debug!(chars = corpus.chars().count(), "extracted opinion corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurveyError;

    fn table(opinions: &[&str]) -> SurveyTable {
        SurveyTable::new(
            vec!["의견".to_string()],
            opinions.iter().map(|o| vec![o.to_string()]).collect(),
        )
    }

    #[test]
    fn test_joins_trimmed_values() {
        let t = table(&["  수업에 도움이 됨 ", "", "NA", "정확하지 않을 때가 있음"]);
        let corpus = extract_corpus(&t, "의견").unwrap();
        assert_eq!(corpus, "수업에 도움이 됨 정확하지 않을 때가 있음");
    }

    #[test]
    fn test_no_usable_values_is_empty_string() {
        let t = table(&["", "   ", "null"]);
        assert_eq!(extract_corpus(&t, "의견").unwrap(), "");
        assert_eq!(extract_corpus(&table(&[]), "의견").unwrap(), "");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let t = table(&["좋아요", " 편리함 "]);
        let first = extract_corpus(&t, "의견").unwrap();
        let second = extract_corpus(&t, "의견").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_opinion_field_is_schema_error() {
        let t = table(&["좋아요"]);
        assert!(matches!(
            extract_corpus(&t, "comment"),
            Err(SurveyError::Schema { .. })
        ));
    }
}
