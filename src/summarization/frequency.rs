/*!
 * Normalized term frequencies over a whole document.
 */

use rustc_hash::FxHashMap;

use super::stopwords::StopwordSet;

/// Token weights in [0.0, 1.0], the most frequent token weighing exactly 1.0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    weights: FxHashMap<String, f64>,
}

impl FrequencyTable {
    /// Weight of a token, 0.0 when it is not in the table
    pub fn weight(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// An empty table means the document has no scorable content
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Count non-stopword alphabetic tokens and normalize by the maximum count
pub fn build_frequency_table<S: AsRef<str>>(tokens: &[S], stopwords: &StopwordSet) -> FrequencyTable {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();

    for token in tokens {
        let token = token.as_ref();
        if token.is_empty() || !token.chars().all(char::is_alphabetic) || stopwords.contains(token) {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let Some(max_count) = counts.values().copied().max() else {
        return FrequencyTable::default();
    };

    let weights = counts
        .into_iter()
        .map(|(token, count)| (token.to_string(), count as f64 / max_count as f64))
        .collect();

    FrequencyTable { weights }
}
