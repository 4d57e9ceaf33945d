/*!
 * Tests for the full parsing pipeline
 */

use scriptparse::script_parser::{ParseOptions, ScriptParser};
use scriptparse::script_types::Language;
use scriptparse::ParseError;

use crate::common;

/// Test the minimal Chinese scenario end to end
#[test]
fn test_parse_withMinimalChineseScript_shouldProduceTwoScenes() {
    let parser = ScriptParser::new();

    let parsed = parser
        .parse(common::minimal_chinese_script(), &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.total_scenes, 2);
    assert_eq!(parsed.scenes.len(), 2);
    assert!(parsed.scenes[0].location.contains("咖啡厅"));
    assert_eq!(parsed.scenes[0].time, "白天");
    assert!(parsed.scenes[1].location.contains("办公室"));
    assert_eq!(parsed.language, Language::Chinese);

    assert_eq!(parsed.dialogues.len(), 2);
    assert_eq!(parsed.dialogues[0].character, "张三");
    assert_eq!(parsed.dialogues[0].text, "你好。");
    assert_eq!(parsed.dialogues[0].scene_number, 1);
    assert_eq!(parsed.dialogues[1].character, "李四");
    assert_eq!(parsed.dialogues[1].scene_number, 2);

    assert_eq!(parsed.total_characters, 2);
}

/// Test the minimal English scenario end to end
#[test]
fn test_parse_withMinimalEnglishScript_shouldProduceSluglineScenes() {
    let parser = ScriptParser::new();

    let parsed = parser
        .parse(common::minimal_english_script(), &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.total_scenes, 2);
    assert_eq!(parsed.scenes[0].location, "INT. COFFEE SHOP");
    assert_eq!(parsed.scenes[0].time, "DAY");
    assert_eq!(parsed.scenes[1].location, "EXT. STREET");
    assert_eq!(parsed.scenes[1].time, "NIGHT");
    assert_eq!(parsed.language, Language::English);

    let names: Vec<&str> = parsed.characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["JOHN", "MARY"]);
}

/// Test dialogue counts over the larger Chinese fixture
#[test]
fn test_parse_withSampleChineseScript_shouldCountDialogues() {
    let parser = ScriptParser::new();

    let parsed = parser
        .parse(common::sample_chinese_script(), &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.total_scenes, 2);
    assert_eq!(parsed.language, Language::Chinese);

    let zhang = parsed.characters.iter().find(|c| c.name == "张三").unwrap();
    let li = parsed.characters.iter().find(|c| c.name == "李四").unwrap();
    assert_eq!(zhang.first_appearance_scene, 1);
    assert_eq!(li.first_appearance_scene, 1);
    assert_eq!(
        zhang.dialogue_count + li.dialogue_count,
        parsed.dialogues.len()
    );
}

/// Test structural invariants: contiguous extents, consistent totals
#[test]
fn test_parse_withSampleEnglishScript_shouldHoldStructuralInvariants() {
    let parser = ScriptParser::new();

    let parsed = parser
        .parse(common::sample_english_script(), &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.total_scenes, parsed.scenes.len());
    assert_eq!(parsed.total_characters, parsed.characters.len());

    for pair in parsed.scenes.windows(2) {
        assert_eq!(pair[0].end_line.unwrap() + 1, pair[1].start_line);
    }
    assert_eq!(
        parsed.scenes.last().unwrap().end_line,
        Some(parsed.metadata.total_lines)
    );

    for dialogue in &parsed.dialogues {
        let scene = parsed
            .scenes
            .iter()
            .find(|s| s.scene_number == dialogue.scene_number)
            .unwrap();
        assert!(dialogue.line_number >= scene.start_line);
        assert!(dialogue.line_number <= scene.end_line.unwrap());
    }
}

/// Test that dialogue emitted ahead of the first header cannot escape
/// its scene's line extent
#[test]
fn test_parse_withDialogueBeforeFirstHeader_shouldKeepDialoguesInsideScenes() {
    let parser = ScriptParser::new();
    let text = "张三：\n你好。\n场景1：咖啡厅-白天\n李四：\n早上好。\n";

    let parsed = parser.parse(text, &ParseOptions::default()).unwrap();

    assert!(parsed.characters.iter().all(|c| c.name != "张三"));
    for dialogue in &parsed.dialogues {
        let scene = parsed
            .scenes
            .iter()
            .find(|s| s.scene_number == dialogue.scene_number)
            .unwrap();
        assert!(dialogue.line_number >= scene.start_line);
        assert!(dialogue.line_number <= scene.end_line.unwrap());
    }
}

/// Test that parsing the same input twice yields identical output
#[test]
fn test_parse_withSameInput_shouldBeIdempotent() {
    let parser = ScriptParser::new();
    let options = ParseOptions::default();

    let first = parser.parse(common::sample_chinese_script(), &options).unwrap();
    let second = parser.parse(common::sample_chinese_script(), &options).unwrap();

    assert_eq!(first, second);
}

/// Test empty and whitespace-only inputs
#[test]
fn test_parse_withEmptyInput_shouldFailWithEmptyInput() {
    let parser = ScriptParser::new();

    assert_eq!(
        parser.parse("", &ParseOptions::default()).unwrap_err(),
        ParseError::EmptyInput
    );
    assert_eq!(
        parser.parse(" \n \t ", &ParseOptions::default()).unwrap_err(),
        ParseError::EmptyInput
    );
}

/// Test text without any recognizable structure still parses
#[test]
fn test_parse_withUnstructuredText_shouldDegradeToActions() {
    let parser = ScriptParser::new();

    let parsed = parser
        .parse("just some prose.\nmore prose here.", &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.total_scenes, 0);
    assert_eq!(parsed.total_characters, 0);
    assert_eq!(parsed.actions.len(), 2);
    assert!(parsed.actions.iter().all(|a| a.scene_number == 1));
}

/// Test metadata propagation from options
#[test]
fn test_parse_withMetadataOptions_shouldRecordThem() {
    let parser = ScriptParser::new();
    let options = ParseOptions {
        detect_aliases: true,
        filename: Some("第3集.txt".to_string()),
        episode_number: Some(3),
    };

    let parsed = parser.parse(common::minimal_chinese_script(), &options).unwrap();

    assert_eq!(parsed.metadata.filename.as_deref(), Some("第3集.txt"));
    assert_eq!(parsed.metadata.episode_number, Some(3));
    assert_eq!(parsed.metadata.total_lines, 6);
}

/// Test opting out of alias detection
#[test]
fn test_parse_withAliasDetectionDisabled_shouldLeaveAliasesEmpty() {
    let parser = ScriptParser::new();
    let text = "场景1：咖啡厅-白天\n张三：\n你好。\n张 三：\n是我。\n";

    let with_aliases = parser.parse(text, &ParseOptions::default()).unwrap();
    assert!(with_aliases.characters.iter().any(|c| !c.aliases.is_empty()));

    let options = ParseOptions {
        detect_aliases: false,
        ..ParseOptions::default()
    };
    let without = parser.parse(text, &options).unwrap();
    assert!(without.characters.iter().all(|c| c.aliases.is_empty()));
}

/// Test the JSON contract: field names and language tag
#[test]
fn test_parse_to_json_withMinimalScript_shouldMatchContract() {
    let parser = ScriptParser::new();

    let value = parser
        .parse_to_json(common::minimal_chinese_script(), &ParseOptions::default())
        .unwrap();

    assert_eq!(value["language"], "zh");
    assert_eq!(value["total_scenes"], 2);
    assert_eq!(value["total_characters"], 2);
    assert!(value["scenes"].is_array());
    assert!(value["characters"].is_array());
    assert!(value["dialogues"].is_array());
    assert!(value["actions"].is_array());
    assert_eq!(value["metadata"]["total_lines"], 6);
    // Optional metadata fields are omitted, not null.
    assert!(value["metadata"].get("filename").is_none());
    assert!(value["metadata"].get("episode_number").is_none());

    let scene = &value["scenes"][0];
    assert_eq!(scene["scene_number"], 1);
    assert!(scene["location"].is_string());
    assert!(scene["time"].is_string());
    assert!(scene["start_line"].is_number());
}
