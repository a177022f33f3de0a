/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use scriptcue::file_utils::FileManager;
use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.txt", "x")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    Ok(())
}

/// Test directory creation
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

#[test]
fn test_writeAtomic_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "video.srt", "old")?;

    FileManager::write_atomic(&file, "new".as_bytes())?;

    assert_eq!(fs::read_to_string(&file)?, "new");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_subtitlePathFor_withOutputDir_shouldUseIt() {
    let out = PathBuf::from("/out");
    let path = FileManager::subtitle_path_for("/videos/episode 01.mov", Some(out.as_path()));
    assert_eq!(path, PathBuf::from("/out/episode 01.srt"));
}
