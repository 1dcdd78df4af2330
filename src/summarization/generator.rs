/*!
 * Summary generator facade.
 *
 * Validates caller input, maps length presets to ratios and delegates the
 * actual work to a [`SummarizationStrategy`].
 */

use std::sync::Arc;

use anyhow::anyhow;
use log::{debug, error, info};

use super::stopwords::StopwordSet;
use super::strategy::{FrequencyStrategy, SummarizationStrategy};
use crate::app_config::{LengthPreset, SummaryConfig};
use crate::errors::{SummaryError, SummaryStage};

/// Entry point for summaries and key points
///
/// Cheap to clone; clones share the strategy and its stopword set.
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    strategy: Arc<dyn SummarizationStrategy>,
    config: SummaryConfig,
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::new(&SummaryConfig::default())
    }
}

impl SummaryGenerator {
    /// Create a generator using the frequency strategy
    pub fn new(config: &SummaryConfig) -> Self {
        let stopwords = Arc::new(StopwordSet::new(&config.stopword_language));
        debug!(
            "Loaded {} stopwords for '{}'",
            stopwords.len(),
            stopwords.language()
        );
        Self::with_strategy(Arc::new(FrequencyStrategy::new(stopwords)), config)
    }

    /// Create a generator around a custom strategy
    pub fn with_strategy(strategy: Arc<dyn SummarizationStrategy>, config: &SummaryConfig) -> Self {
        Self {
            strategy,
            config: config.clone(),
        }
    }

    pub fn strategy(&self) -> &dyn SummarizationStrategy {
        self.strategy.as_ref()
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Summarize `text`, keeping `max(1, floor(sentences * ratio))` sentences
    pub fn generate_summary(&self, text: &str, ratio: f64) -> Result<String, SummaryError> {
        validate_text(text)?;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(SummaryError::InvalidRatio(ratio));
        }

        info!(
            "Generating summary with ratio: {} ({} strategy)",
            ratio,
            self.strategy.name()
        );

        let summary = self
            .strategy
            .summarize(text, ratio)
            .and_then(|summary| {
                if summary.is_empty() {
                    Err(SummaryError::failed(
                        SummaryStage::Selecting,
                        anyhow!("strategy returned an empty summary"),
                    ))
                } else {
                    Ok(summary)
                }
            })
            .inspect_err(|e| error!("Error during summarization: {}", e))?;

        info!("Summary generated. Length: {} characters", summary.len());
        Ok(summary)
    }

    /// Summarize using a named preset: "short", "medium" or "long"
    pub fn generate_summary_with_length(&self, text: &str, length: &str) -> Result<String, SummaryError> {
        let preset: LengthPreset = length.parse()?;
        self.generate_summary_with_preset(text, preset)
    }

    pub fn generate_summary_with_preset(&self, text: &str, preset: LengthPreset) -> Result<String, SummaryError> {
        self.generate_summary(text, self.config.ratio_for(preset))
    }

    /// Summarize with the configured default length
    pub fn generate_default_summary(&self, text: &str) -> Result<String, SummaryError> {
        self.generate_summary_with_preset(text, self.config.default_length)
    }

    /// The `num_points` most important sentences, most important first
    pub fn extract_key_points(&self, text: &str, num_points: usize) -> Result<Vec<String>, SummaryError> {
        validate_text(text)?;
        if num_points == 0 {
            return Ok(Vec::new());
        }

        info!("Extracting {} key points", num_points);
        let points = self
            .strategy
            .key_points(text, num_points)
            .inspect_err(|e| error!("Error extracting key points: {}", e))?;
        debug!("Extracted {} key points", points.len());
        Ok(points)
    }
}

fn validate_text(text: &str) -> Result<(), SummaryError> {
    if text.trim().is_empty() {
        return Err(SummaryError::EmptyInput);
    }
    Ok(())
}
