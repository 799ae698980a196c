//! Fuzz target for word-frequency extraction on arbitrary text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use surveyscope::WordFrequencies;

fuzz_target!(|text: &str| {
    let freq = WordFrequencies::from_corpus(text, 200);
    assert!(freq.words.len() <= 200);
    if let Some(first) = freq.words.first() {
        assert_eq!(first.weight, 1.0);
    }
});
