//! Fuzz target for survey uploads.
//!
//! Any byte string must either load or fail with an error, and a loaded
//! table must survive the filter and every chart kind without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use surveyscope::{ChartKind, ChartSelector, Parser, SurveyFields, filter_affirmative};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok((table, _)) = Parser::new().parse_upload("fuzz.csv", data) else {
        return;
    };

    let fields = SurveyFields::default();
    let Ok(filtered) = filter_affirmative(&table, &fields.usage_flag, &fields.affirmative) else {
        return;
    };

    let selector = ChartSelector::new(&fields);
    for kind in ChartKind::ALL {
        let _ = selector.select(kind, &filtered, "유용성 점수");
    }
});
