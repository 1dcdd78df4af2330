/*!
 * Sentence and word tokenization.
 *
 * Sentences keep their original index and byte span so selections can be
 * put back into document order after ranking.
 */

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "vs", "etc", "e.g", "i.e", "u.s", "u.k", "approx",
    "inc", "ltd", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

/// Abbreviations that are also ordinary words; only "No. 5" style uses count
const NUMBERING_ABBREVIATIONS: &[&str] = &["no", "fig", "vol", "pp"];

/// A sentence of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Position in the document (0-based, contiguous)
    pub index: usize,

    /// Trimmed sentence text
    pub text: String,

    /// Byte offset of the first character in the source text
    pub start: usize,

    /// Byte offset one past the last character in the source text
    pub end: usize,
}

impl Sentence {
    /// Words of this sentence, see [`tokenize_words`]
    pub fn words(&self) -> Vec<String> {
        tokenize_words(&self.text)
    }
}

/// Collapse every whitespace run to a single space and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentences on terminal punctuation (`.`, `!`, `?`)
///
/// A terminator only ends a sentence when followed by whitespace or the end
/// of the input, so decimals and dotted identifiers stay intact. A lone period
/// after a known abbreviation or an uppercase initial ("J. Smith") does not
/// end a sentence. Trailing text without a terminator becomes the last sentence.
///
/// Boundaries only depend on whether a character is whitespace, not on which
/// whitespace it is, so splitting raw and normalized text gives the same
/// sentences.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !is_terminator(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
            j += 1;
        }

        let at_break = j == chars.len() || chars[j].1.is_whitespace();
        let lone_period = c == '.' && !chars[i + 1..j].iter().any(|(_, ch)| is_terminator(*ch));

        let end = chars.get(j).map(|(p, _)| *p).unwrap_or(text.len());
        if at_break && !(lone_period && is_abbreviation(&text[..pos], &text[end..])) {
            push_sentence(&mut sentences, text, start, end);
            start = end;
        }

        i = j;
    }

    if start < text.len() {
        push_sentence(&mut sentences, text, start, text.len());
    }

    sentences
}

/// Lowercase maximal alphabetic runs; digits and symbols act as separators
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect()
}

fn push_sentence(sentences: &mut Vec<Sentence>, text: &str, start: usize, end: usize) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }

    let offset = start + (slice.len() - slice.trim_start().len());
    sentences.push(Sentence {
        index: sentences.len(),
        text: trimmed.to_string(),
        start: offset,
        end: offset + trimmed.len(),
    });
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}')
}

// `head` is the text before the period, `tail` the text after the break
fn is_abbreviation(head: &str, tail: &str) -> bool {
    let word_start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphabetic() || *c == '.')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(head.len());

    let word = &head[word_start..];
    if word.is_empty() {
        return false;
    }
    if is_initials(word) {
        return true;
    }

    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }

    NUMBERING_ABBREVIATIONS.contains(&lower.as_str())
        && tail.trim_start().starts_with(|c: char| c.is_ascii_digit())
}

// "J" or "J.R": uppercase letters standing alone between periods
fn is_initials(word: &str) -> bool {
    word.split('.').all(|part| {
        let mut chars = part.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
    })
}
