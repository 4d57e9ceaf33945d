use serde::{Deserialize, Serialize};
use std::fmt;

// @module: Data model for parsed scripts

/// Detected script language
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    // @variant: Chinese script (CJK content, no English scene headers)
    #[serde(rename = "zh")]
    Chinese,

    // @variant: English script
    #[serde(rename = "en")]
    English,

    // @variant: Mixed Chinese/English script
    #[serde(rename = "mixed")]
    Mixed,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Chinese => "zh",
            Self::English => "en",
            Self::Mixed => "mixed",
        };
        write!(f, "{}", code)
    }
}

// @struct: Single scene with extent and raw content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    // @field: Scene number, explicit or auto-incremented
    pub scene_number: u32,

    // @field: Free-text location
    pub location: String,

    // @field: Time of day (may be empty)
    pub time: String,

    // @field: Interior lines joined, header excluded
    pub content: String,

    // @field: Header line number (1-based)
    pub start_line: usize,

    // @field: Last line of the scene; total line count for the final scene
    pub end_line: Option<usize>,
}

// @struct: Speaking character aggregated over the whole document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    // @field: Canonicalized name
    pub name: String,

    // @field: Number of dialogue lines attributed to this name
    pub dialogue_count: usize,

    // @field: Scene number of the first cue for this name
    pub first_appearance_scene: u32,

    // @field: Other surface forms judged equivalent (alias resolution only)
    pub aliases: Vec<String>,
}

// @struct: Single dialogue line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dialogue {
    // @field: Speaking character (by canonical name, not a reference)
    pub character: String,

    // @field: Spoken text with any leading parenthetical stripped
    pub text: String,

    // @field: Owning scene number
    pub scene_number: u32,

    // @field: Line number in the normalized document (1-based)
    pub line_number: usize,

    // @field: Stage direction extracted from the start of the line
    pub parenthetical: Option<String>,
}

// @struct: Action/description line not attributable to a speaker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    // @field: Action text
    pub text: String,

    // @field: Owning scene number
    pub scene_number: u32,

    // @field: Line number in the normalized document (1-based)
    pub line_number: usize,
}

// @struct: Document-level metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScriptMetadata {
    // @field: Source filename, when provided by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    // @field: Episode number, when provided or inferred from the filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,

    // @field: Count of non-empty lines after normalization
    pub total_lines: usize,
}

/// Complete parsed script structure, the aggregate root of one parse call.
///
/// Scenes, characters, dialogues and actions are owned exclusively by this
/// aggregate; nothing outlives or is shared beyond a single parse call. The
/// serialized shape of this struct is the compatibility surface consumed by
/// downstream systems and must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedScript {
    /// Scenes in document order
    pub scenes: Vec<Scene>,

    /// Characters ordered by first appearance scene, discovery order on ties
    pub characters: Vec<Character>,

    /// Dialogue lines in document order
    pub dialogues: Vec<Dialogue>,

    /// Action lines in document order
    pub actions: Vec<Action>,

    /// Detected document language
    pub language: Language,

    /// Total scene count, always equal to `scenes.len()`
    pub total_scenes: usize,

    /// Total character count, always equal to `characters.len()`
    pub total_characters: usize,

    /// Document-level metadata
    pub metadata: ScriptMetadata,
}
