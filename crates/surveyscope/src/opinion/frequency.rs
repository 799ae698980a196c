//! Word frequencies for the word-cloud collaborator.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Word tokens: a word character followed by word characters or apostrophes.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w[\w']+").unwrap());

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
        "is", "it", "it's", "its", "itself", "just", "me", "more", "most", "my", "myself",
        "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "ought", "our",
        "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so", "some",
        "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
        "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
        "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
        "whom", "why", "with", "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Rendering configuration passed to the word-cloud collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudConfig {
    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Background color name.
    #[serde(default = "default_background")]
    pub background: String,
    /// Named color map for words.
    #[serde(default = "default_colormap")]
    pub colormap: Option<String>,
    /// Largest font size in pixels.
    #[serde(default = "default_max_font_size")]
    pub max_font_size: Option<u32>,
    /// Maximum number of words kept.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    /// Font file with Hangul glyphs; filled in from font resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            colormap: default_colormap(),
            max_font_size: default_max_font_size(),
            max_words: default_max_words(),
            font_path: None,
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    400
}

fn default_background() -> String {
    "white".to_string()
}

fn default_colormap() -> Option<String> {
    Some("Set2".to_string())
}

fn default_max_font_size() -> Option<u32> {
    Some(60)
}

fn default_max_words() -> usize {
    200
}

/// One word of the cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordWeight {
    /// Display form (the most frequent casing).
    pub word: String,
    /// Occurrences in the corpus.
    pub count: usize,
    /// Count relative to the most frequent word (0, 1].
    pub weight: f64,
}

/// Word frequencies of an opinion corpus, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordFrequencies {
    pub words: Vec<WordWeight>,
}

impl WordFrequencies {
    /// Count words in a corpus.
    ///
    /// Tokens are case-folded, with the most frequent surface form kept
    /// for display. English stopwords and single characters are dropped.
    pub fn from_corpus(corpus: &str, max_words: usize) -> Self {
        // folded form → (surface form → count)
        let mut forms: IndexMap<String, HashMap<&str, usize>> = IndexMap::new();
        for token in TOKEN.find_iter(corpus).map(|m| m.as_str()) {
            let folded = token.to_lowercase();
            if STOPWORDS.contains(folded.as_str()) {
                continue;
            }
            *forms.entry(folded).or_default().entry(token).or_insert(0) += 1;
        }

        let mut words: Vec<(String, usize)> = forms
            .into_values()
            .map(|surfaces| {
                let total = surfaces.values().sum();
                let display = surfaces
                    .into_iter()
                    .max_by(|(a_word, a_count), (b_word, b_count)| {
                        a_count.cmp(b_count).then_with(|| b_word.cmp(a_word))
                    })
                    .map(|(word, _)| word.to_string())
                    .unwrap_or_default();
                (display, total)
            })
            .collect();

        words.sort_by(|(a_word, a_count), (b_word, b_count)| {
            b_count.cmp(a_count).then_with(|| a_word.cmp(b_word))
        });
        words.truncate(max_words);

        let max = words.first().map(|(_, c)| *c).unwrap_or(0);
        let words = words
            .into_iter()
            .map(|(word, count)| WordWeight {
                word,
                count,
                weight: count as f64 / max as f64,
            })
            .collect();

        Self { words }
    }

    /// Whether there is anything to draw.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Count for a word (display form).
    pub fn count(&self, word: &str) -> Option<usize> {
        self.words.iter().find(|w| w.word == word).map(|w| w.count)
    }
}

/// Everything the word-cloud collaborator needs to draw one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudRequest {
    pub words: WordFrequencies,
    pub config: WordCloudConfig,
}

impl WordCloudRequest {
    /// Build a request from a corpus; `None` when the corpus has no words.
    pub fn from_corpus(corpus: &str, config: &WordCloudConfig) -> Option<Self> {
        let words = WordFrequencies::from_corpus(corpus, config.max_words);
        (!words.is_empty()).then(|| Self {
            words,
            config: config.clone(),
        })
    }
}
