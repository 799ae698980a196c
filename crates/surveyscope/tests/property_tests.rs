//! Property-based tests for the survey pipeline.
//!
//! These tests generate random survey tables and check that filtering,
//! aggregation and chart selection keep their invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p surveyscope --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p surveyscope --test property_tests
//! ```

use proptest::prelude::*;

use surveyscope::aggregate::{category_counts, mean_by_category, pivot_mean};
use surveyscope::{
    ChartKind, ChartSelector, Parser, SurveyFields, SurveyTable, WordFrequencies,
    extract_corpus, filter_affirmative,
};

const HEADERS: [&str; 7] = [
    "사용 여부",
    "사용자 유형",
    "감정",
    "사용 빈도",
    "유용성 점수",
    "신뢰도 점수",
    "의견",
];

// =============================================================================
// Test Strategies
// =============================================================================

/// Usage answers, including near misses of the sentinel.
fn usage_flag() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just("예".to_string()),
        1 => Just(" 예 ".to_string()),
        2 => Just("아니오".to_string()),
        1 => Just(String::new()),
        1 => "[a-z]{1,4}",
    ]
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("학생".to_string()),
        Just("교사".to_string()),
        Just("학부모".to_string()),
        Just(String::new()),
    ]
}

fn emotion() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("기쁨".to_string()),
        Just("불안".to_string()),
        Just("무관심".to_string()),
    ]
}

/// Scores: mostly numbers, sometimes blank or free text.
fn score() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => (1u8..=5).prop_map(|n| n.to_string()),
        1 => Just(String::new()),
        1 => Just("모름".to_string()),
    ]
}

fn opinion() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z ]{0,30}",
        "[가-힣 ]{0,20}",
    ]
}

fn survey_row() -> impl Strategy<Value = Vec<String>> {
    (
        usage_flag(),
        category(),
        emotion(),
        prop_oneof![Just("매일".to_string()), Just("가끔".to_string())],
        score(),
        score(),
        opinion(),
    )
        .prop_map(|(u, c, e, f, s1, s2, o)| vec![u, c, e, f, s1, s2, o])
}

fn survey_table() -> impl Strategy<Value = SurveyTable> {
    prop::collection::vec(survey_row(), 0..40).prop_map(|rows| {
        SurveyTable::new(HEADERS.iter().map(|h| h.to_string()).collect(), rows)
    })
}

/// Generate completely random bytes (edge cases)
fn random_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..400)
}

// =============================================================================
// Filter Properties
// =============================================================================

mod filter_tests {
    use super::*;

    proptest! {
        /// The filter keeps an ordered subset of rows, all affirmative.
        #[test]
        fn filter_is_ordered_subset(table in survey_table()) {
            let filtered = filter_affirmative(&table, "사용 여부", "예").unwrap();

            prop_assert!(filtered.row_count() <= table.row_count());
            prop_assert_eq!(&filtered.headers, &table.headers);
            for row in &filtered.rows {
                prop_assert_eq!(row[0].as_str(), "예");
            }

            let expected: Vec<&Vec<String>> = table
                .rows
                .iter()
                .filter(|r| r[0] == "예")
                .collect();
            let actual: Vec<&Vec<String>> = filtered.rows.iter().collect();
            prop_assert_eq!(actual, expected);
        }

        /// Filtering twice changes nothing.
        #[test]
        fn filter_is_idempotent(table in survey_table()) {
            let once = filter_affirmative(&table, "사용 여부", "예").unwrap();
            let twice = filter_affirmative(&once, "사용 여부", "예").unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}

// =============================================================================
// Aggregation Properties
// =============================================================================

mod aggregation_tests {
    use super::*;

    proptest! {
        /// Every mean lies within the range of its category's scores, and no
        /// category appears without a numeric score.
        #[test]
        fn means_are_bounded(table in survey_table()) {
            let means = mean_by_category(&table, "사용자 유형", "유용성 점수").unwrap();

            for (label, mean) in means.iter() {
                let scores: Vec<f64> = table
                    .rows
                    .iter()
                    .filter(|r| r[1].trim() == label)
                    .filter_map(|r| r[4].trim().parse::<f64>().ok())
                    .collect();
                prop_assert!(!scores.is_empty());
                let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(mean >= min - 1e-9 && mean <= max + 1e-9);
            }
        }

        /// Category counts add up to the rows with a label.
        #[test]
        fn counts_cover_labelled_rows(table in survey_table()) {
            let counts = category_counts(&table, "감정").unwrap();
            let total: f64 = counts.iter().map(|(_, n)| n).sum();
            prop_assert_eq!(total as usize, table.row_count());
        }

        /// Pivot cells agree with the transposed pivot.
        #[test]
        fn pivot_transpose_agrees(table in survey_table()) {
            let pivot = pivot_mean(&table, "사용자 유형", "감정", "유용성 점수").unwrap();
            let flipped = pivot_mean(&table, "감정", "사용자 유형", "유용성 점수").unwrap();

            prop_assert_eq!(pivot.transpose(), flipped.clone());
            for row in &pivot.rows {
                for column in &pivot.columns {
                    prop_assert_eq!(pivot.get(row, column), flipped.get(column, row));
                }
            }
        }

        /// Aggregation never mutates its input.
        #[test]
        fn aggregation_leaves_table_untouched(table in survey_table()) {
            let before = table.clone();
            let _ = mean_by_category(&table, "사용자 유형", "신뢰도 점수").unwrap();
            let _ = pivot_mean(&table, "사용자 유형", "감정", "신뢰도 점수").unwrap();
            prop_assert_eq!(table, before);
        }
    }
}

// =============================================================================
// Chart Selection Properties
// =============================================================================

mod chart_tests {
    use super::*;

    proptest! {
        /// Every chart kind selects without error, and reports no data exactly
        /// when the filtered table is empty.
        #[test]
        fn every_kind_selects(table in survey_table()) {
            let fields = SurveyFields::default();
            let filtered = filter_affirmative(&table, &fields.usage_flag, &fields.affirmative).unwrap();
            let selector = ChartSelector::new(&fields);

            for kind in ChartKind::ALL {
                let outcome = selector.select(kind, &filtered, "유용성 점수").unwrap();
                prop_assert_eq!(outcome.is_no_data(), filtered.is_empty());
            }
        }

        /// Selection is deterministic.
        #[test]
        fn selection_is_deterministic(table in survey_table()) {
            let fields = SurveyFields::default();
            let selector = ChartSelector::new(&fields);
            for kind in ChartKind::ALL {
                let a = selector.select(kind, &table, "신뢰도 점수").unwrap();
                let b = selector.select(kind, &table, "신뢰도 점수").unwrap();
                prop_assert_eq!(a, b);
            }
        }
    }
}

// =============================================================================
// Opinion Properties
// =============================================================================

mod opinion_tests {
    use super::*;

    proptest! {
        /// The corpus has no leading or trailing whitespace and contains every
        /// usable opinion.
        #[test]
        fn corpus_contains_opinions(table in survey_table()) {
            let corpus = extract_corpus(&table, "의견").unwrap();
            prop_assert_eq!(corpus.trim(), corpus.as_str());
            for row in &table.rows {
                let opinion = row[6].trim();
                if !SurveyTable::is_null_value(opinion) {
                    prop_assert!(corpus.contains(opinion));
                }
            }
        }

        /// Word frequencies are sorted, bounded and normalized.
        #[test]
        fn frequencies_are_sorted(corpus in "[a-z가-힣 ]{0,200}", max in 1usize..50) {
            let freq = WordFrequencies::from_corpus(&corpus, max);
            prop_assert!(freq.words.len() <= max);
            for pair in freq.words.windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
            }
            if let Some(top) = freq.words.first() {
                prop_assert!((top.weight - 1.0).abs() < 1e-9);
            }
            for w in &freq.words {
                prop_assert!(w.weight > 0.0 && w.weight <= 1.0);
            }
        }
    }
}

// =============================================================================
// Parser Robustness
// =============================================================================

mod parser_tests {
    use super::*;

    proptest! {
        /// The parser never panics, whatever it is given.
        #[test]
        fn parser_never_panics(bytes in random_bytes()) {
            let _ = Parser::new().parse_upload("upload.csv", &bytes);
        }
    }
}
