//! Opinion text: corpus extraction and word frequencies for the word cloud.

mod corpus;
mod frequency;

pub use corpus::extract_corpus;
pub use frequency::{WordCloudConfig, WordCloudRequest, WordFrequencies, WordWeight};
