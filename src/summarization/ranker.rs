/*!
 * Sentence scoring against a document frequency table.
 */

use rustc_hash::FxHashMap;

use super::frequency::FrequencyTable;
use super::tokenizer::Sentence;

/// Scores keyed by original sentence index
///
/// Sentences that scored zero are absent, so they can never win a ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentenceScores {
    scores: FxHashMap<usize, f64>,
}

impl SentenceScores {
    pub fn get(&self, index: usize) -> Option<f64> {
        self.scores.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// `(index, score)` pairs, highest score first, ties by ascending index
    pub fn ranked(&self) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.scores.iter().map(|(i, s)| (*i, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

/// Sum the weight of every token of every sentence
pub fn score_sentences(sentences: &[Sentence], table: &FrequencyTable) -> SentenceScores {
    let mut scores = FxHashMap::default();

    for sentence in sentences {
        let score: f64 = sentence.words().iter().map(|word| table.weight(word)).sum();
        if score > 0.0 {
            scores.insert(sentence.index, score);
        }
    }

    SentenceScores { scores }
}
