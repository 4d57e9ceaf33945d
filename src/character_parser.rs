use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::preprocessor::{self, ScriptLine};
use crate::scene_parser::SceneParser;
use crate::script_types::{Action, Character, Dialogue, Scene};

// @module: Line classification, character cues and alias clustering

// @const: CJK-style cue, a run of word characters followed by a colon,
// optionally carrying a parenthetical qualifier before the colon
static CJK_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\x{4e00}-\x{9fff}\w·][\x{4e00}-\x{9fff}\w· ]{0,19}(?:\s*[（(][^）)]*[）)])?)\s*[：:]").unwrap()
});

// @const: Cue entirely wrapped in bracket-style delimiters
static BRACKET_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[【\[（(]([^【\[（(】\]）)]{1,20})[】\]）)]$").unwrap());

// @const: Trailing parenthetical qualifier on a name, e.g. "(V.O.)"
static TRAILING_QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[（(][^）)]*[）)]\s*$").unwrap());

/// Line classifier and character aggregator.
///
/// Performs a single forward scan over the normalized lines with two pieces
/// of mutable state: the current scene (resolved by containment against the
/// precomputed extents) and the active speaker. All state is local to one
/// call; nothing is shared between invocations.
#[derive(Debug, Default)]
pub struct CharacterParser;

impl CharacterParser {
    /// Create a new character parser
    pub fn new() -> Self {
        CharacterParser
    }

    /// Extract and canonicalize a character name from a cue line.
    ///
    /// Returns `None` when the line is not a character cue. The scene-header
    /// test takes precedence for Latin all-caps lines so that short
    /// upper-case location lines are not read as cues.
    pub fn extract_character_name(line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(caps) = CJK_CUE.captures(trimmed) {
            return Self::canonicalize_name(&caps[1]);
        }

        if let Some(caps) = BRACKET_CUE.captures(trimmed) {
            return Self::canonicalize_name(&caps[1]);
        }

        if Self::is_latin_cue(trimmed) && !SceneParser::is_scene_header(trimmed) {
            return Self::canonicalize_name(trimmed);
        }

        None
    }

    /// Check the Latin cue shape: fully upper-case, at most three tokens
    fn is_latin_cue(line: &str) -> bool {
        if preprocessor::contains_cjk(line) {
            return false;
        }
        if !line.chars().any(|c| c.is_alphabetic()) {
            return false;
        }
        if line.chars().any(|c| c.is_lowercase()) {
            return false;
        }
        line.split_whitespace().count() <= 3
    }

    /// Strip trailing colon, brackets and qualifier from an extracted name
    fn canonicalize_name(name: &str) -> Option<String> {
        let stripped = name
            .trim()
            .trim_end_matches([':', '：'])
            .trim()
            .to_string();
        let stripped = TRAILING_QUALIFIER.replace(&stripped, "").trim().to_string();

        if stripped.is_empty() {
            None
        } else {
            Some(stripped)
        }
    }

    /// Split a leading parenthetical off a dialogue line.
    ///
    /// Returns the parenthetical content (without the delimiters) and the
    /// remaining spoken text, either of which may be empty.
    fn split_parenthetical(text: &str) -> (Option<String>, String) {
        let trimmed = text.trim();

        for (open, close) in [('(', ')'), ('（', '）')] {
            if let Some(rest) = trimmed.strip_prefix(open) {
                if let Some(end) = rest.find(close) {
                    let inner = rest[..end].trim();
                    let remainder = rest[end + close.len_utf8()..].trim();
                    let parenthetical = if inner.is_empty() {
                        None
                    } else {
                        Some(inner.to_string())
                    };
                    return (parenthetical, remainder.to_string());
                }
            }
        }

        (None, trimmed.to_string())
    }

    /// Classify every line as cue, dialogue or action and aggregate
    /// characters.
    ///
    /// Lines before the first scene header belong to no scene and are
    /// skipped; only when the document has no headers at all is everything
    /// attributed to scene number 1. Scene headers reset the active speaker.
    /// A cue sets it. With a speaker active, lines become dialogue (a line
    /// that is only a parenthetical is dropped but keeps the speaker);
    /// otherwise they become actions.
    pub fn parse_characters_and_dialogues(
        &self,
        lines: &[ScriptLine],
        scenes: &[Scene],
    ) -> (Vec<Character>, Vec<Dialogue>, Vec<Action>) {
        let mut dialogues: Vec<Dialogue> = Vec::new();
        let mut actions: Vec<Action> = Vec::new();

        // Characters in discovery order with per-name counters.
        let mut discovery: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_scene: HashMap<String, u32> = HashMap::new();

        let mut scene_cursor = 0usize;
        let mut active_speaker: Option<String> = None;

        for line in lines {
            if let Some(first) = scenes.first() {
                if line.number < first.start_line {
                    continue;
                }
            }

            while scene_cursor + 1 < scenes.len()
                && scenes[scene_cursor + 1].start_line <= line.number
            {
                scene_cursor += 1;
            }
            let scene_number = scenes
                .get(scene_cursor)
                .map(|s| s.scene_number)
                .unwrap_or(1);

            if SceneParser::is_scene_header(&line.text) {
                active_speaker = None;
                continue;
            }

            if let Some(name) = Self::extract_character_name(&line.text) {
                if !counts.contains_key(&name) {
                    counts.insert(name.clone(), 0);
                    first_scene.insert(name.clone(), scene_number);
                    discovery.push(name.clone());
                }
                active_speaker = Some(name);
                continue;
            }

            if let Some(speaker) = active_speaker.clone() {
                let (parenthetical, text) = Self::split_parenthetical(&line.text);
                if text.is_empty() {
                    // Parenthetical-only line: no dialogue emitted, the
                    // speaker stays active.
                    continue;
                }
                *counts.entry(speaker.clone()).or_insert(0) += 1;
                dialogues.push(Dialogue {
                    character: speaker,
                    text,
                    scene_number,
                    line_number: line.number,
                    parenthetical,
                });
            } else {
                actions.push(Action {
                    text: line.text.clone(),
                    scene_number,
                    line_number: line.number,
                });
            }
        }

        let mut characters: Vec<Character> = discovery
            .into_iter()
            .map(|name| Character {
                dialogue_count: counts.get(&name).copied().unwrap_or(0),
                first_appearance_scene: first_scene.get(&name).copied().unwrap_or(1),
                name,
                aliases: Vec::new(),
            })
            .collect();

        // Stable sort keeps discovery order within the same scene.
        characters.sort_by_key(|c| c.first_appearance_scene);

        debug!(
            "Classified {} dialogue(s), {} action(s), {} character(s)",
            dialogues.len(),
            actions.len(),
            characters.len()
        );

        (characters, dialogues, actions)
    }

    /// Cluster character name variants by normalized substring containment.
    ///
    /// This is a single left-to-right greedy pass keyed on the first member
    /// of each group, not a transitive closure: a later candidate is only
    /// compared against group keys, never against members added after the
    /// grouping decision. Known heuristic gap, kept for output
    /// compatibility; callers needing precise clustering should use a true
    /// union-find over the same containment predicate.
    pub fn detect_character_aliases(
        &self,
        mut characters: Vec<Character>,
        dialogues: &[Dialogue],
    ) -> Vec<Character> {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();

        for character in &characters {
            let key = Self::normalize_name(&character.name);
            match groups
                .iter_mut()
                .find(|(k, _)| k.contains(&key) || key.contains(k.as_str()))
            {
                Some((_, members)) => members.push(character.name.clone()),
                None => groups.push((key, vec![character.name.clone()])),
            }
        }

        for character in characters.iter_mut() {
            if let Some((_, members)) = groups
                .iter()
                .find(|(_, members)| members.iter().any(|n| n == &character.name))
            {
                character.aliases = members
                    .iter()
                    .filter(|n| *n != &character.name)
                    .cloned()
                    .collect();
            }
        }

        debug!(
            "Alias clustering: {} name(s) in {} group(s) over {} dialogue(s)",
            characters.len(),
            groups.len(),
            dialogues.len()
        );

        characters
    }

    /// Normalize a name for clustering: uppercase, whitespace removed
    fn normalize_name(name: &str) -> String {
        name.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }
}
