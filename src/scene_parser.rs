use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::preprocessor::ScriptLine;
use crate::script_types::Scene;

// @module: Scene header recognition and scene segmentation

// Chinese header patterns. These are tried before the English ones, and the
// explicit-number forms before the bare marker form; first match wins.

// @const: "场景" marker followed by an explicit number
static CN_MARKER_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^场景\s*(\d+)\s*[：:．.、\-－]?\s*(.*)$").unwrap());

// @const: Ordinal form "第N场" / "第N幕"
static CN_ORDINAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^第\s*(\d+)\s*[场幕]\s*[：:．.、]?\s*(.*)$").unwrap());

// @const: Leading digits with a separator, e.g. "1. 咖啡厅-白天"
static CN_LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,4})\s*[．.、:：]\s*(.*)$").unwrap());

// @const: Scene marker without an explicit number
static CN_BARE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[（(【\[]?\s*场景\s*[）)】\]]?\s*[：:．.、\-－]?\s*(.*)$").unwrap());

// @const: INT/EXT slug with a recognized time-of-day keyword after the dash
static EN_INT_EXT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^((?:INT\s*[/-]\s*EXT|INT|EXT)\.?)\s+(.+?)\s*[-–—]+\s*(DAY|NIGHT|MORNING|AFTERNOON|EVENING|NOON|DUSK|DAWN|CONTINUOUS|LATER)\b.*$",
    )
    .unwrap()
});

// @const: "SCENE N" form with an explicit number
static EN_SCENE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^SCENE\s+(\d+)\s*[:.\-]?\s*(.*)$").unwrap());

// @const: Separator run splitting location from time in Chinese headers
static LOCATION_TIME_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-－–—~～\s]+").unwrap());

// @const: Recognized Chinese time-of-day keywords
const CN_TIME_KEYWORDS: &[&str] = &[
    "白天", "夜晚", "夜里", "晚上", "早上", "早晨", "清晨", "上午", "中午", "下午", "傍晚",
    "黄昏", "深夜", "凌晨", "日", "夜",
];

// @const: Recognized English time-of-day keywords
const EN_TIME_KEYWORDS: &[&str] = &[
    "DAY",
    "NIGHT",
    "MORNING",
    "AFTERNOON",
    "EVENING",
    "NOON",
    "DUSK",
    "DAWN",
    "CONTINUOUS",
    "LATER",
];

/// A scene header successfully extracted from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Explicit scene number, when the header carried one
    pub number: Option<u32>,

    /// Free-text location
    pub location: String,

    /// Time of day (empty when not recognized)
    pub time: String,
}

/// Scene segmenter over normalized script lines.
///
/// Recognizes bilingual scene headers, resolves scene numbers (explicit
/// numbers reset the auto-increment baseline, unnumbered headers receive
/// `baseline + 1`) and assigns each scene its line extent and raw content.
#[derive(Debug, Default)]
pub struct SceneParser;

impl SceneParser {
    /// Create a new scene parser
    pub fn new() -> Self {
        SceneParser
    }

    /// Attempt to extract a scene header from one trimmed line.
    ///
    /// Chinese patterns are tried first, then English ones; the first match
    /// wins. This ordering is a convention of the legacy converter, not a
    /// specificity argument.
    pub fn parse_scene_header(line: &str) -> Option<HeaderInfo> {
        if let Some(caps) = CN_MARKER_NUMBER.captures(line) {
            let number = caps[1].parse().ok();
            return Some(Self::chinese_header(number, &caps[2]));
        }

        if let Some(caps) = CN_ORDINAL_NUMBER.captures(line) {
            let number = caps[1].parse().ok();
            return Some(Self::chinese_header(number, &caps[2]));
        }

        if let Some(caps) = CN_LEADING_NUMBER.captures(line) {
            let number = caps[1].parse().ok();
            return Some(Self::chinese_header(number, &caps[2]));
        }

        if let Some(caps) = CN_BARE_MARKER.captures(line) {
            return Some(Self::chinese_header(None, &caps[1]));
        }

        if let Some(caps) = EN_INT_EXT_TIME.captures(line) {
            return Some(HeaderInfo {
                number: None,
                location: format!("{} {}", &caps[1], caps[2].trim()),
                time: caps[3].to_uppercase(),
            });
        }

        if let Some(caps) = EN_SCENE_NUMBER.captures(line) {
            let number = caps[1].parse().ok();
            return Some(HeaderInfo {
                number,
                location: caps[2].trim().to_string(),
                time: String::new(),
            });
        }

        None
    }

    /// Check whether a line is a scene header in either language
    pub fn is_scene_header(line: &str) -> bool {
        Self::parse_scene_header(line).is_some()
    }

    /// Check whether a line matches one of the English header patterns.
    /// Used by whole-document language detection. A slug without the
    /// dash-separated time keyword is not a header.
    pub fn is_english_scene_header(line: &str) -> bool {
        EN_INT_EXT_TIME.is_match(line) || EN_SCENE_NUMBER.is_match(line)
    }

    /// Build a Chinese header from an optional number and the line remainder
    fn chinese_header(number: Option<u32>, remainder: &str) -> HeaderInfo {
        let (location, time) = Self::split_location_time(remainder);
        HeaderInfo {
            number,
            location,
            time,
        }
    }

    /// Split a Chinese header remainder into location and time.
    ///
    /// The remainder is split on the first run of dash-like or whitespace
    /// separators into at most two parts. The second part is kept as the
    /// time only when it contains a recognized time-of-day keyword.
    fn split_location_time(remainder: &str) -> (String, String) {
        let remainder = remainder.trim();
        if remainder.is_empty() {
            return (String::new(), String::new());
        }

        let mut parts = LOCATION_TIME_SPLIT.splitn(remainder, 2);
        let first = parts.next().unwrap_or("").trim();
        let second = parts.next().map(str::trim).unwrap_or("");

        if first.is_empty() {
            // Separator-leading remainder: no location was found, so keep
            // the whole remainder as the location.
            return (remainder.to_string(), String::new());
        }

        if !second.is_empty() && Self::contains_time_keyword(second) {
            (first.to_string(), second.to_string())
        } else {
            (first.to_string(), String::new())
        }
    }

    /// Check whether text contains a recognized time-of-day keyword
    fn contains_time_keyword(text: &str) -> bool {
        if CN_TIME_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            return true;
        }
        let upper = text.to_uppercase();
        EN_TIME_KEYWORDS.iter().any(|kw| upper.contains(kw))
    }

    /// Scan all lines for scene headers and resolve scene numbers.
    ///
    /// An explicit number is used directly and becomes the new
    /// auto-increment baseline; an unnumbered header receives `baseline + 1`.
    /// The baseline is never reset mid-document.
    pub fn parse_scenes(&self, lines: &[ScriptLine]) -> Vec<Scene> {
        let mut scenes = Vec::new();
        let mut baseline: u32 = 0;

        for line in lines {
            if let Some(header) = Self::parse_scene_header(&line.text) {
                let number = match header.number {
                    Some(n) => {
                        baseline = n;
                        n
                    }
                    None => {
                        baseline += 1;
                        baseline
                    }
                };

                scenes.push(Scene {
                    scene_number: number,
                    location: header.location,
                    time: header.time,
                    content: String::new(),
                    start_line: line.number,
                    end_line: None,
                });
            }
        }

        debug!("Segmented {} scene(s)", scenes.len());
        scenes
    }

    /// Assign each scene its line extent and interior content.
    ///
    /// A scene ends one line before the next scene's header; the last scene
    /// ends at the total line count. Content is the join of all lines
    /// strictly between the header and the next header.
    pub fn assign_content_to_scenes(&self, lines: &[ScriptLine], mut scenes: Vec<Scene>) -> Vec<Scene> {
        let total_lines = lines.len();
        let count = scenes.len();

        for i in 0..count {
            let end = if i + 1 < count {
                scenes[i + 1].start_line - 1
            } else {
                total_lines
            };
            scenes[i].end_line = Some(end);

            // Line numbers are 1-based positions into `lines`, so the body
            // of scene i is the slice (start_line, end].
            let body: Vec<&str> = lines[scenes[i].start_line..end]
                .iter()
                .map(|l| l.text.as_str())
                .collect();
            scenes[i].content = body.join("\n");
        }

        scenes
    }
}
