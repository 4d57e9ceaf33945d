use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParseError;
use crate::scene_parser::SceneParser;
use crate::script_types::Language;

// @module: Text normalization and language detection

// @const: CJK Unified Ideographs presence test
static CJK_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{4e00}-\x{9fff}]").unwrap());

/// Check whether a string contains any CJK Unified Ideograph
pub fn contains_cjk(text: &str) -> bool {
    CJK_CHAR.is_match(text)
}

// @struct: Single normalized script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    // @field: 1-based index over kept lines
    pub number: usize,

    // @field: Raw text with trailing whitespace removed
    pub raw: String,

    // @field: Fully trimmed text, used for classification
    pub text: String,
}

/// Text preprocessor for raw script input.
///
/// Normalizes line endings, strips control characters, discards blank lines
/// and classifies the document language. Language detection is a pure
/// function of the original text, evaluated once per document, never per
/// scene.
#[derive(Debug, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    /// Create a new preprocessor
    pub fn new() -> Self {
        TextPreprocessor
    }

    /// Normalize raw text into numbered lines and classify the language
    pub fn preprocess(&self, text: &str) -> Result<(Vec<ScriptLine>, Language), ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let language = Self::detect_language(text);

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines: Vec<ScriptLine> = Vec::new();

        for raw in normalized.split('\n') {
            // Control characters (other than the separators already consumed)
            // carry no content; a line made only of them is dropped.
            let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
            let trimmed = cleaned.trim();
            if trimmed.is_empty() {
                continue;
            }

            lines.push(ScriptLine {
                number: lines.len() + 1,
                raw: cleaned.trim_end().to_string(),
                text: trimmed.to_string(),
            });
        }

        if lines.is_empty() {
            return Err(ParseError::NoContent);
        }

        debug!(
            "Preprocessed {} line(s), detected language: {}",
            lines.len(),
            language
        );

        Ok((lines, language))
    }

    /// Classify the whole document as Chinese, English or mixed.
    ///
    /// A document is judged Chinese when it contains any CJK Unified
    /// Ideograph, and judged to contain English scene headers when any line
    /// matches the English header patterns. Both signals together mean mixed.
    pub fn detect_language(text: &str) -> Language {
        let has_cjk = contains_cjk(text);
        let has_english_header = text
            .lines()
            .any(|line| SceneParser::is_english_scene_header(line.trim()));

        match (has_cjk, has_english_header) {
            (true, true) => Language::Mixed,
            (true, false) => Language::Chinese,
            _ => Language::English,
        }
    }
}
