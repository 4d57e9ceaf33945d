/*!
 * End-to-end conversion tests over real files
 */

use scriptparse::app_config::Config;
use scriptparse::app_controller::Controller;
use scriptparse::file_utils::FileManager;
use tempfile::tempdir;

use crate::common;

/// Test single-file conversion writing the expected JSON
#[tokio::test]
async fn test_run_withChineseScriptFile_shouldWriteJsonOutput() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("第2集.txt");
    let output_dir = dir.path().join("out");
    FileManager::write_to_file(&input, common::minimal_chinese_script()).unwrap();

    let controller = Controller::new_for_test().unwrap();
    controller
        .run(input, output_dir.clone(), false)
        .await
        .unwrap();

    let output_path = output_dir.join("第2集.json");
    assert!(FileManager::file_exists(&output_path));

    let value: serde_json::Value =
        serde_json::from_str(&FileManager::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(value["language"], "zh");
    assert_eq!(value["total_scenes"], 2);
    assert_eq!(value["metadata"]["filename"], "第2集.txt");
    assert_eq!(value["metadata"]["episode_number"], 2);
}

/// Test that an existing output is kept unless overwrite is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipWithoutForce() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("script.txt");
    let output_dir = dir.path().to_path_buf();
    let output_path = output_dir.join("script.json");

    FileManager::write_to_file(&input, common::minimal_english_script()).unwrap();
    FileManager::write_to_file(&output_path, "sentinel").unwrap();

    let controller = Controller::new_for_test().unwrap();

    controller
        .run(input.clone(), output_dir.clone(), false)
        .await
        .unwrap();
    assert_eq!(
        FileManager::read_to_string(&output_path).unwrap(),
        "sentinel"
    );

    controller.run(input, output_dir, true).await.unwrap();
    let rewritten = FileManager::read_to_string(&output_path).unwrap();
    assert_ne!(rewritten, "sentinel");
    let value: serde_json::Value = serde_json::from_str(&rewritten).unwrap();
    assert_eq!(value["language"], "en");
}

/// Test a missing input file is an error
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let dir = tempdir().unwrap();
    let controller = Controller::new_for_test().unwrap();

    let result = controller
        .run(dir.path().join("absent.txt"), dir.path().to_path_buf(), false)
        .await;

    assert!(result.is_err());
}

/// Test compact output honors the pretty_output setting
#[tokio::test]
async fn test_run_withCompactOutput_shouldWriteSingleLine() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("script.txt");
    FileManager::write_to_file(&input, common::minimal_english_script()).unwrap();

    let mut config = Config::default();
    config.parsing.pretty_output = false;
    let controller = Controller::with_config(config).unwrap();

    controller
        .run(input, dir.path().to_path_buf(), false)
        .await
        .unwrap();

    let json = FileManager::read_to_string(dir.path().join("script.json")).unwrap();
    assert!(!json.contains('\n'));
}

/// Test folder conversion isolating a bad file
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldIsolateFailures() {
    let dir = tempdir().unwrap();
    FileManager::write_to_file(dir.path().join("good.txt"), common::sample_chinese_script())
        .unwrap();
    FileManager::write_to_file(dir.path().join("empty.txt"), "   ").unwrap();
    FileManager::write_to_file(dir.path().join("notes.json"), "{}").unwrap();

    let controller = Controller::new_for_test().unwrap();
    controller
        .run_folder(dir.path().to_path_buf(), None, false)
        .await
        .unwrap();

    assert!(FileManager::file_exists(dir.path().join("good.json")));
    assert!(!FileManager::file_exists(dir.path().join("empty.json")));

    let value: serde_json::Value =
        serde_json::from_str(&FileManager::read_to_string(dir.path().join("good.json")).unwrap())
            .unwrap();
    assert_eq!(value["language"], "zh");
    assert_eq!(value["metadata"]["filename"], "good.txt");
}

/// Test folder conversion honoring an explicit output directory
#[tokio::test]
async fn test_run_folder_withOutputDir_shouldWriteThere() {
    let dir = tempdir().unwrap();
    let input_dir = dir.path().join("scripts");
    let output_dir = dir.path().join("converted");
    FileManager::write_to_file(input_dir.join("a.txt"), common::minimal_chinese_script()).unwrap();
    FileManager::write_to_file(input_dir.join("b.txt"), common::minimal_english_script()).unwrap();

    let controller = Controller::new_for_test().unwrap();
    controller
        .run_folder(input_dir.clone(), Some(output_dir.clone()), false)
        .await
        .unwrap();

    assert!(FileManager::file_exists(output_dir.join("a.json")));
    assert!(FileManager::file_exists(output_dir.join("b.json")));
    assert!(!FileManager::file_exists(input_dir.join("a.json")));
    assert!(!FileManager::file_exists(input_dir.join("b.json")));
}

/// Test folder conversion on an empty directory is a no-op
#[tokio::test]
async fn test_run_folder_withNoScriptFiles_shouldSucceed() {
    let dir = tempdir().unwrap();
    let controller = Controller::new_for_test().unwrap();

    controller
        .run_folder(dir.path().to_path_buf(), None, false)
        .await
        .unwrap();
}

/// Test that a rerun without force leaves existing outputs alone
#[tokio::test]
async fn test_run_folder_withExistingOutputs_shouldSkipThem() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("script.txt");
    let output = dir.path().join("script.json");
    FileManager::write_to_file(&input, common::minimal_chinese_script()).unwrap();
    FileManager::write_to_file(&output, "sentinel").unwrap();

    let controller = Controller::new_for_test().unwrap();
    controller
        .run_folder(dir.path().to_path_buf(), None, false)
        .await
        .unwrap();

    assert_eq!(FileManager::read_to_string(&output).unwrap(), "sentinel");
}
