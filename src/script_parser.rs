/*!
 * Script parsing orchestrator.
 *
 * Sequences the pipeline stages into one pass: validate and normalize the
 * raw text, segment scenes, classify lines, optionally resolve character
 * aliases, then assemble the final aggregate. The parser holds no state
 * between calls beyond the pre-compiled pattern tables, so a single
 * instance is safe to share across threads and tasks.
 */

use log::debug;

use crate::character_parser::CharacterParser;
use crate::errors::ParseError;
use crate::preprocessor::TextPreprocessor;
use crate::scene_parser::SceneParser;
use crate::script_types::{ParsedScript, ScriptMetadata};

/// Per-call parsing options
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Whether to run alias clustering over the character list (default on)
    pub detect_aliases: bool,

    /// Source filename recorded in the output metadata
    pub filename: Option<String>,

    /// Episode number recorded in the output metadata
    pub episode_number: Option<u32>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            detect_aliases: true,
            filename: None,
            episode_number: None,
        }
    }
}

/// Main script parser orchestrating all pipeline stages
#[derive(Debug, Default)]
pub struct ScriptParser {
    preprocessor: TextPreprocessor,
    scene_parser: SceneParser,
    character_parser: CharacterParser,
}

impl ScriptParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        ScriptParser {
            preprocessor: TextPreprocessor::new(),
            scene_parser: SceneParser::new(),
            character_parser: CharacterParser::new(),
        }
    }

    /// Parse raw script text into the structured aggregate.
    ///
    /// Fails with [`ParseError::EmptyInput`] for empty or whitespace-only
    /// input and [`ParseError::NoContent`] when normalization yields no
    /// usable lines. Everything else parses: unrecognized lines degrade to
    /// action entries rather than failing.
    pub fn parse(&self, text: &str, options: &ParseOptions) -> Result<ParsedScript, ParseError> {
        let (lines, language) = self.preprocessor.preprocess(text)?;

        let scenes = self.scene_parser.parse_scenes(&lines);
        let scenes = self.scene_parser.assign_content_to_scenes(&lines, scenes);

        let (characters, dialogues, actions) = self
            .character_parser
            .parse_characters_and_dialogues(&lines, &scenes);

        let characters = if options.detect_aliases && !characters.is_empty() {
            self.character_parser
                .detect_character_aliases(characters, &dialogues)
        } else {
            characters
        };

        let metadata = ScriptMetadata {
            filename: options.filename.clone(),
            episode_number: options.episode_number,
            total_lines: lines.len(),
        };

        debug!(
            "Parsed script: {} scene(s), {} character(s), {} dialogue(s), language {}",
            scenes.len(),
            characters.len(),
            dialogues.len(),
            language
        );

        Ok(ParsedScript {
            total_scenes: scenes.len(),
            total_characters: characters.len(),
            scenes,
            characters,
            dialogues,
            actions,
            language,
            metadata,
        })
    }

    /// Parse raw script text and return the JSON-serializable value
    pub fn parse_to_json(
        &self,
        text: &str,
        options: &ParseOptions,
    ) -> anyhow::Result<serde_json::Value> {
        let parsed = self.parse(text, options)?;
        Ok(serde_json::to_value(parsed)?)
    }
}
