/*!
 * # scriptparse - Bilingual Screenplay Structure Extractor
 *
 * A Rust library for converting free-text screenplay/script documents
 * (Chinese, English, or mixed) into a structured, machine-readable
 * representation: scenes, characters, dialogue and action lines, plus
 * derived counts and language classification.
 *
 * ## Features
 *
 * - Line-ending normalization and whole-document language detection
 * - Bilingual scene-header recognition with explicit or auto-incremented
 *   scene numbers
 * - Line-by-line role classification: scene header / character cue /
 *   dialogue / action
 * - Parenthetical extraction from dialogue lines
 * - Heuristic character-alias clustering
 * - Concurrent batch conversion with per-document error isolation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `preprocessor`: Text normalization and language detection
 * - `scene_parser`: Scene header recognition and segmentation
 * - `character_parser`: Line classification and alias clustering
 * - `script_parser`: Pipeline orchestrator
 * - `script_types`: The serializable data model
 * - `batch`: Concurrent multi-document parsing
 * - `app_config`: Configuration management
 * - `app_controller`: File/directory conversion workflows
 * - `file_utils`: File system operations
 * - `errors`: Custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod batch;
pub mod character_parser;
pub mod errors;
pub mod file_utils;
pub mod preprocessor;
pub mod scene_parser;
pub mod script_parser;
pub mod script_types;

// Re-export main types for easier usage
pub use app_config::Config;
pub use batch::{BatchDocument, BatchParser, BatchReport};
pub use errors::ParseError;
pub use script_parser::{ParseOptions, ScriptParser};
pub use script_types::{
    Action, Character, Dialogue, Language, ParsedScript, Scene, ScriptMetadata,
};
