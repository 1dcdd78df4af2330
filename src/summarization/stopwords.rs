/*!
 * Stopword set for frequency scoring.
 *
 * Built once per process for the configured language and shared read-only
 * between concurrent summarization calls.
 */

use log::warn;
use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// Set of lowercase function words excluded from scoring
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: FxHashSet<String>,
    language: String,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordSet {
    /// Load the stopword list for a language code or English name
    ///
    /// Unknown languages fall back to English.
    pub fn new(language: &str) -> Self {
        let lang = match language.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => LANGUAGE::English,
            "de" | "deu" | "german" => LANGUAGE::German,
            "fr" | "fra" | "french" => LANGUAGE::French,
            "es" | "spa" | "spanish" => LANGUAGE::Spanish,
            "it" | "ita" | "italian" => LANGUAGE::Italian,
            "pt" | "por" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "nld" | "dutch" => LANGUAGE::Dutch,
            "ru" | "rus" | "russian" => LANGUAGE::Russian,
            "sv" | "swe" | "swedish" => LANGUAGE::Swedish,
            "da" | "dan" | "danish" => LANGUAGE::Danish,
            "fi" | "fin" | "finnish" => LANGUAGE::Finnish,
            "tr" | "tur" | "turkish" => LANGUAGE::Turkish,
            "pl" | "pol" | "polish" => LANGUAGE::Polish,
            other => {
                warn!("No stopword list for language '{}', using English", other);
                LANGUAGE::English
            }
        };

        Self {
            words: get(lang).iter().map(|w| w.to_lowercase()).collect(),
            language: language.trim().to_lowercase(),
        }
    }

    /// Build a set from a custom word list
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_lowercase()).collect(),
            language: "custom".to_string(),
        }
    }

    /// A set that filters nothing
    pub fn empty() -> Self {
        Self {
            words: FxHashSet::default(),
            language: "none".to_string(),
        }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        word.chars().any(char::is_uppercase) && self.words.contains(&word.to_lowercase())
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
