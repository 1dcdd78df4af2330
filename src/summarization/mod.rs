/*!
 * Extractive summarization engine.
 *
 * Deterministic, unsupervised sentence ranking:
 * - `tokenizer`: sentence splitting and word tokenization
 * - `stopwords`: per-language stopword set
 * - `frequency`: normalized term frequencies over the document
 * - `ranker`: sentence scores from term weights
 * - `selector`: summary and key point selection
 * - `strategy`: the `SummarizationStrategy` seam and the frequency strategy
 * - `generator`: validating facade used by the controller and tool server
 *
 * Everything here is synchronous and free of I/O. The only shared state is
 * the read-only stopword set.
 */

pub mod frequency;
pub mod generator;
pub mod ranker;
pub mod selector;
pub mod stopwords;
pub mod strategy;
pub mod tokenizer;

pub use frequency::{build_frequency_table, FrequencyTable};
pub use generator::SummaryGenerator;
pub use ranker::{score_sentences, SentenceScores};
pub use selector::{join_sentences, select_for_key_points, select_for_summary, target_count};
pub use stopwords::StopwordSet;
pub use strategy::{Analysis, FrequencyStrategy, SummarizationStrategy};
pub use tokenizer::{normalize_whitespace, split_sentences, tokenize_words, Sentence};
