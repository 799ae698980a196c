//! Respondent filter: keep only rows that answered the usage question affirmatively.

use tracing::debug;

use crate::error::Result;
use crate::input::SurveyTable;

/// Keep rows whose `usage_field` equals `affirmative`, preserving order.
///
/// The cell must equal the sentinel exactly; `" 예"` is not `"예"`. An empty
/// result is a valid table with zero rows; downstream steps report it as "no data".
pub fn filter_affirmative(
    table: &SurveyTable,
    usage_field: &str,
    affirmative: &str,
) -> Result<SurveyTable> {
    let index = table.require_column(usage_field)?;

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| row.get(index).is_some_and(|v| v == affirmative))
        .cloned()
        .collect();

    debug!(
        kept = rows.len(),
        total = table.row_count(),
        field = usage_field,
        "filtered respondents"
    );

    Ok(table.derive(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurveyError;

    fn table(flags: &[&str]) -> SurveyTable {
        SurveyTable::new(
            vec!["사용 여부".to_string(), "id".to_string()],
            flags
                .iter()
                .enumerate()
                .map(|(i, f)| vec![f.to_string(), i.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_keeps_affirmative_rows_in_order() {
        let t = table(&["예", "아니오", "예", "예"]);
        let filtered = filter_affirmative(&t, "사용 여부", "예").unwrap();

        let ids: Vec<&str> = filtered.column_values(1).collect();
        assert_eq!(ids, vec!["0", "2", "3"]);
        assert_eq!(filtered.headers, t.headers);
    }

    #[test]
    fn test_padded_flags_are_not_affirmative() {
        let t = table(&["예", " 예", "예 ", "\t예"]);
        let filtered = filter_affirmative(&t, "사용 여부", "예").unwrap();

        let ids: Vec<&str> = filtered.column_values(1).collect();
        assert_eq!(ids, vec!["0"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let t = table(&["아니오", "아니오"]);
        let filtered = filter_affirmative(&t, "사용 여부", "예").unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_missing_usage_field_is_schema_error() {
        let t = table(&["예"]);
        let err = filter_affirmative(&t, "used", "yes").unwrap_err();
        assert!(matches!(err, SurveyError::Schema { ref field } if field == "used"));
    }

    #[test]
    fn test_source_table_untouched() {
        let t = table(&["예", "아니오"]);
        let before = t.clone();
        let _ = filter_affirmative(&t, "사용 여부", "예").unwrap();
        assert_eq!(t, before);
    }
}
