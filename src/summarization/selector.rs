/*!
 * Selection of ranked sentences for summaries and key points.
 *
 * Summaries are put back into document order for readability; key points
 * stay in rank order. Both fall back to leading sentences when nothing
 * could be scored.
 */

use super::ranker::SentenceScores;
use super::tokenizer::{normalize_whitespace, Sentence};

/// Number of sentences to keep for a ratio, never less than one
pub fn target_count(total_sentences: usize, ratio: f64) -> usize {
    ((total_sentences as f64 * ratio).floor() as usize).max(1)
}

/// Pick the best sentences for a summary, in document order
pub fn select_for_summary<'a>(
    sentences: &'a [Sentence],
    scores: &SentenceScores,
    ratio: f64,
) -> Vec<&'a Sentence> {
    if scores.is_empty() {
        return sentences.first().into_iter().collect();
    }

    let count = target_count(sentences.len(), ratio);
    let mut picked: Vec<usize> = scores
        .ranked()
        .into_iter()
        .take(count)
        .map(|(index, _)| index)
        .collect();
    picked.sort_unstable();

    picked.into_iter().filter_map(|index| sentences.get(index)).collect()
}

/// Pick the `num_points` best sentences, most important first
pub fn select_for_key_points<'a>(
    sentences: &'a [Sentence],
    scores: &SentenceScores,
    num_points: usize,
) -> Vec<&'a Sentence> {
    if scores.is_empty() {
        return sentences.iter().take(num_points).collect();
    }

    scores
        .ranked()
        .into_iter()
        .take(num_points)
        .filter_map(|(index, _)| sentences.get(index))
        .collect()
}

/// Join selected sentences with a single space, collapsing whitespace inside each
pub fn join_sentences(selected: &[&Sentence]) -> String {
    selected
        .iter()
        .map(|sentence| normalize_whitespace(&sentence.text))
        .collect::<Vec<_>>()
        .join(" ")
}
