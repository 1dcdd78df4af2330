/*!
 * Pluggable summarization strategies.
 */

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::anyhow;
use log::debug;

use super::frequency::{build_frequency_table, FrequencyTable};
use super::ranker::{score_sentences, SentenceScores};
use super::selector::{join_sentences, select_for_key_points, select_for_summary};
use super::stopwords::StopwordSet;
use super::tokenizer::{split_sentences, tokenize_words, Sentence};
use crate::errors::{SummaryError, SummaryStage};

/// An extractive summarization algorithm
///
/// Implementations receive input that has already been validated by
/// [`SummaryGenerator`](super::SummaryGenerator): non-blank text and a
/// ratio within [0.0, 1.0].
pub trait SummarizationStrategy: Send + Sync + Debug {
    /// Summarize `text`, keeping roughly `ratio` of its sentences
    fn summarize(&self, text: &str, ratio: f64) -> Result<String, SummaryError>;

    /// The `num_points` most important sentences, most important first
    ///
    /// Strategies without a ranking return the leading sentences. Key points
    /// are verbatim slices of `text`.
    fn key_points(&self, text: &str, num_points: usize) -> Result<Vec<String>, SummaryError> {
        Ok(split_sentences(text)
            .into_iter()
            .take(num_points)
            .map(|sentence| sentence.text)
            .collect())
    }

    /// Short identifier used in logs
    fn name(&self) -> &str {
        "custom"
    }
}

/// A scored document
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Sentences with spans into the analyzed text
    pub sentences: Vec<Sentence>,

    /// Term weights over the whole document
    pub frequencies: FrequencyTable,

    /// Non-zero sentence scores
    pub scores: SentenceScores,
}

/// Term-frequency sentence ranking
#[derive(Debug, Clone)]
pub struct FrequencyStrategy {
    stopwords: Arc<StopwordSet>,
}

impl Default for FrequencyStrategy {
    fn default() -> Self {
        Self::new(Arc::new(StopwordSet::default()))
    }
}

impl FrequencyStrategy {
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Split and score a document
    ///
    /// An empty frequency table is not an error; the selector falls back to
    /// leading sentences in that case.
    pub fn analyze(&self, text: &str) -> Result<Analysis, SummaryError> {
        let sentences = split_sentences(text);
        debug!("Tokenized document into {} sentences", sentences.len());

        if sentences.is_empty() && !text.trim().is_empty() {
            return Err(SummaryError::failed(
                SummaryStage::Tokenizing,
                anyhow!("no sentences found in {} bytes of text", text.len()),
            ));
        }

        let frequencies = build_frequency_table(&tokenize_words(text), &self.stopwords);
        let scores = score_sentences(&sentences, &frequencies);
        debug!(
            "Scored {} of {} sentences using {} distinct terms",
            scores.len(),
            sentences.len(),
            frequencies.len()
        );

        Ok(Analysis {
            sentences,
            frequencies,
            scores,
        })
    }
}

impl SummarizationStrategy for FrequencyStrategy {
    fn summarize(&self, text: &str, ratio: f64) -> Result<String, SummaryError> {
        let analysis = self.analyze(text)?;
        let selected = select_for_summary(&analysis.sentences, &analysis.scores, ratio);
        debug!("Selected {} sentences for summary", selected.len());
        Ok(join_sentences(&selected))
    }

    fn key_points(&self, text: &str, num_points: usize) -> Result<Vec<String>, SummaryError> {
        let analysis = self.analyze(text)?;
        Ok(select_for_key_points(&analysis.sentences, &analysis.scores, num_points)
            .into_iter()
            .map(|sentence| sentence.text.clone())
            .collect())
    }

    fn name(&self) -> &str {
        "frequency"
    }
}
