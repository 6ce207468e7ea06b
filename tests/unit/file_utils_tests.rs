/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use genderize::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    // Create a temporary test file
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "test_file_exists.tmp", "test content")?;

    // Test that file_exists works correctly
    assert!(FileManager::file_exists(test_file.to_str().unwrap()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/input/prompt.txt");
    let output_dir = Path::new("/tmp/output");
    let gender_code = "m";
    let extension = "txt";

    let output_path = FileManager::generate_output_path(input_file, output_dir, gender_code, extension);

    assert_eq!(output_path, Path::new("/tmp/output/prompt.m.txt"));
}

/// Test recognition of previously genderized outputs
#[test]
fn test_is_genderized_output_withVariousNames_shouldClassifyCorrectly() {
    assert!(FileManager::is_genderized_output("dance.m.txt"));
    assert!(FileManager::is_genderized_output("dance.f.txt"));
    assert!(FileManager::is_genderized_output("dance.F.txt"));
    assert!(FileManager::is_genderized_output("/some/dir/kpop.m.txt"));

    assert!(!FileManager::is_genderized_output("dance.txt"));
    assert!(!FileManager::is_genderized_output("m.txt"));
    assert!(!FileManager::is_genderized_output("dance.mf.txt"));
}

/// Test that dir_exists distinguishes directories from files
#[test]
fn test_dir_exists_withDirAndFile_shouldClassifyCorrectly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "not_a_dir.tmp", "x")?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&test_file));
    assert!(!FileManager::dir_exists("non_existent_dir"));

    Ok(())
}

/// Test finding files by extension, case-insensitively
#[test]
fn test_find_files_withMixedExtensions_shouldReturnMatchesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "one.txt", "a")?;
    common::create_test_file(&dir, "two.TXT", "b")?;
    common::create_test_file(&dir, "other.json", "{}")?;

    // Nested files are found too
    let nested = dir.join("nested");
    fs::create_dir_all(&nested)?;
    common::create_test_file(&nested, "three.txt", "c")?;

    let mut found = FileManager::find_files(&dir, "txt")?;
    found.sort();

    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|p| p.extension().unwrap().to_string_lossy().eq_ignore_ascii_case("txt")));

    // A leading dot on the extension is accepted as well
    let with_dot = FileManager::find_files(&dir, ".txt")?;
    assert_eq!(with_dot.len(), 3);

    Ok(())
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::write_to_file(&target, "content")?;

    assert!(target.exists());
    assert_eq!(fs::read_to_string(&target)?, "content");

    Ok(())
}

/// Test that ensure_dir is a no-op on existing directories
#[test]
fn test_ensure_dir_withExistingDir_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    FileManager::ensure_dir(temp_dir.path())?;
    FileManager::ensure_dir(temp_dir.path().join("fresh"))?;

    assert!(temp_dir.path().join("fresh").is_dir());

    Ok(())
}

/// Test appending timestamped entries to a log file
#[test]
fn test_append_to_log_file_withTwoEntries_shouldAppendBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log_path, "first entry")?;
    FileManager::append_to_log_file(&log_path, "second entry")?;

    let content = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("first entry"));
    assert!(lines[1].ends_with("second entry"));

    Ok(())
}
