/*!
 * End-to-end prompt template processing tests
 */

use std::fs;
use anyhow::Result;
use genderize::app_config::Config;
use genderize::app_controller::Controller;
use genderize::genderizer::{genderize, FEMININE_STYLE_TAG, MASCULINE_STYLE_TAG};
use crate::common;

/// Test the full single-file workflow: read, transform, write
#[tokio::test]
async fn test_run_withSingleTemplate_shouldWriteGenderizedCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let template = common::create_test_template(&dir, "dance.txt")?;

    let mut config = Config::default();
    config.gender = "M".to_string();
    let controller = Controller::with_config(config)?;

    controller.run(template.clone(), dir.clone(), false).await?;

    let output = dir.join("dance.m.txt");
    assert!(output.exists());

    let content = fs::read_to_string(&output)?;
    assert!(content.contains(MASCULINE_STYLE_TAG));
    assert!(content.contains("He move"));
    // The output matches the library transform exactly
    let template_text = fs::read_to_string(&template)?;
    assert_eq!(content, genderize(&template_text, "M")?);

    Ok(())
}

/// Test that an existing output is preserved unless overwrite is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let template = common::create_test_template(&dir, "dance.txt")?;
    let existing = common::create_test_file(&dir, "dance.f.txt", "sentinel")?;

    let controller = Controller::new_for_test()?;
    assert_eq!(controller.gender().code(), "F");

    // Without the force flag the sentinel survives
    controller.run(template.clone(), dir.clone(), false).await?;
    assert_eq!(fs::read_to_string(&existing)?, "sentinel");

    // With the force flag it is replaced by the transform
    controller.run(template, dir, true).await?;
    let content = fs::read_to_string(&existing)?;
    assert!(content.contains(FEMININE_STYLE_TAG));

    Ok(())
}

/// Test folder processing writes one output per template and skips
/// previously genderized files
#[tokio::test]
async fn test_run_folder_withTemplatesAndOldOutputs_shouldProcessTemplatesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_template(&dir, "hiphop.txt")?;
    common::create_test_template(&dir, "ballet.txt")?;
    // An output from an earlier run must not be fed back into the transform
    common::create_test_file(&dir, "kpop.f.txt", "already genderized")?;

    let mut config = Config::default();
    config.gender = "f".to_string();
    let controller = Controller::with_config(config)?;

    controller.run_folder(dir.clone(), false).await?;

    assert!(dir.join("hiphop.f.txt").exists());
    assert!(dir.join("ballet.f.txt").exists());
    // No second-generation output was produced
    assert!(!dir.join("kpop.f.f.txt").exists());
    assert_eq!(fs::read_to_string(dir.join("kpop.f.txt"))?, "already genderized");

    Ok(())
}

/// Test a failing template is recorded in the run log while the rest of
/// the folder still completes
#[tokio::test]
async fn test_run_folder_withUnreadableTemplate_shouldLogFailureAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_template(&dir, "good.txt")?;
    // Invalid UTF-8 makes the template unreadable as text
    fs::write(dir.join("broken.txt"), [0xffu8, 0xfe, 0xfd])?;

    let run_log = dir.join("run.log");
    let mut config = Config::default();
    config.gender = "M".to_string();
    config.batch.run_log = Some(run_log.to_string_lossy().to_string());
    let controller = Controller::with_config(config)?;

    controller.run_folder(dir.clone(), false).await?;

    // The good template was still processed
    assert!(dir.join("good.m.txt").exists());

    // The failure landed in the run log
    let log_content = fs::read_to_string(&run_log)?;
    assert!(log_content.contains("broken.txt"));

    Ok(())
}

/// Test controller construction rejects an invalid configured gender code
#[test]
fn test_controller_withInvalidGenderCode_shouldFailToConstruct() {
    let mut config = Config::default();
    config.gender = "Q".to_string();

    let result = Controller::with_config(config);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("invalid gender code"));
}

/// Test the controller applies configured transform-table overrides
#[test]
fn test_controller_withCustomStyleTag_shouldUseOverride() -> Result<()> {
    let mut config = Config::default();
    config.gender = "M".to_string();
    config.transform.style_tags.masculine = "Grounded, powerful movement.".to_string();
    let controller = Controller::with_config(config)?;

    let out = controller.genderize_text("They dance.");
    assert!(out.contains("He dance."));
    assert!(out.contains("Grounded, powerful movement."));
    assert!(!out.contains(MASCULINE_STYLE_TAG));

    Ok(())
}
