//! Input loading and tokenization.

use std::fs;
use std::path::Path;

use encoding_rs::UTF_8;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;
use whatlang::{detect, Lang};

use crate::error::{DetectorError, Result};

const DETECT_PREFIX_CHARS: usize = 4096; // max characters fed to language detection

// Trailing English clitics, straight or curly apostrophe
static CLITIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)(n['’]t|['’](?:s|re|ve|ll|d|m))$").expect("clitic pattern is valid")
});

/// Turns raw text into an ordered sequence of tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Name used in log output.
    fn name(&self) -> &'static str;
}

/// Word tokenizer built on Unicode word boundaries.
///
/// Words and punctuation marks become separate tokens, whitespace is dropped,
/// and English clitics are split from their host word (`don't` -> `do`, `n't`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for segment in text.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            match CLITIC_REGEX.captures(segment) {
                Some(caps) => {
                    tokens.push(caps[1].to_string());
                    tokens.push(caps[2].to_string());
                }
                None => tokens.push(segment.to_string()),
            }
        }
        tokens
    }

    fn name(&self) -> &'static str {
        "unicode-words"
    }
}

/// Read a UTF-8 text file, dropping a BOM and replacing malformed sequences.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DetectorError::io(path, e))?;
    let (text, had_errors) = UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        warn!(path = %path.display(), "input contains malformed UTF-8, replaced with U+FFFD");
    }
    Ok(text.into_owned())
}

/// Tokenized input text, created once per session.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub tokens: Vec<String>,
    /// Language of the text, when detection was reliable
    pub language: Option<Lang>,
}

impl Corpus {
    pub fn load(path: &Path, tokenizer: &dyn Tokenizer) -> Result<Self> {
        let text = read_text(path)?;
        let corpus = Self::from_text(&text, tokenizer);
        info!(
            path = %path.display(),
            tokens = corpus.tokens.len(),
            tokenizer = tokenizer.name(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    pub fn from_text(text: &str, tokenizer: &dyn Tokenizer) -> Self {
        let prefix: String = text.chars().take(DETECT_PREFIX_CHARS).collect();
        let language = detect(&prefix).and_then(|info| {
            debug!(lang = ?info.lang(), confidence = info.confidence(), "language detection");
            info.is_reliable().then_some(info.lang())
        });
        Self {
            tokens: tokenizer.tokenize(text),
            language,
        }
    }

    /// One-line description shown when the session starts.
    pub fn summary(&self) -> String {
        match self.language {
            Some(lang) => format!("Loaded {} tokens ({})", self.tokens.len(), lang.eng_name()),
            None => format!("Loaded {} tokens", self.tokens.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tokens(text: &str) -> Vec<String> {
        WordTokenizer.tokenize(text)
    }

    #[test]
    fn test_punctuation_is_split_from_words() {
        assert_eq!(
            tokens("The dog ran. The dog barked."),
            vec!["The", "dog", "ran", ".", "The", "dog", "barked", "."]
        );
    }

    #[test]
    fn test_whitespace_is_dropped() {
        assert_eq!(tokens("  call\n\tme   Ishmael \r\n"), vec!["call", "me", "Ishmael"]);
        assert!(tokens(" \n\t ").is_empty());
    }

    #[test]
    fn test_clitics_are_split() {
        assert_eq!(tokens("don't"), vec!["do", "n't"]);
        assert_eq!(tokens("it's"), vec!["it", "'s"]);
        assert_eq!(tokens("we’ll"), vec!["we", "’ll"]);
        assert_eq!(tokens("Ahab's leg"), vec!["Ahab", "'s", "leg"]);
    }

    #[test]
    fn test_plain_apostrophe_word_untouched() {
        assert_eq!(tokens("o'clock"), vec!["o'clock"]);
    }

    #[test]
    fn test_read_text_strips_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFhello world").unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "hello world");
    }

    #[test]
    fn test_read_text_replaces_malformed_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xFF ok").unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "caf\u{FFFD} ok");
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_text(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, DetectorError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_summary_reports_reliable_language() {
        let text = "It is a truth universally acknowledged, that a single man in possession \
                    of a good fortune, must be in want of a wife. However little known the \
                    feelings or views of such a man may be on his first entering a neighbourhood, \
                    this truth is so well fixed in the minds of the surrounding families.";
        let corpus = Corpus::from_text(text, &WordTokenizer);
        assert_eq!(corpus.language, Some(Lang::Eng));
        assert!(corpus.summary().ends_with("(English)"));
    }

    #[test]
    fn test_summary_without_language() {
        let corpus = Corpus {
            tokens: vec!["a".into(), "b".into()],
            language: None,
        };
        assert_eq!(corpus.summary(), "Loaded 2 tokens");
    }
}
