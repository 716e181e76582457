use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Copy the file to a timestamped sibling before any mutation.
///
/// The backup lands alongside the original as `{name}.backup_{timestamp}` so
/// the pre-mutation state can be restored by hand if anything downstream
/// goes wrong.
pub fn create_backup(path: &Path) -> Result<PathBuf, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut backup = path.as_os_str().to_owned();
    backup.push(format!(".backup_{timestamp}"));
    let backup = PathBuf::from(backup);
    fs::copy(path, &backup)?;
    Ok(backup)
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the destination is untouched. The
/// tempfile lives in the destination's directory so the rename stays on one
/// filesystem.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    // Bump mtime so file watchers and build systems notice the change
    filetime::set_file_mtime(path, filetime::FileTime::now())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_is_byte_identical_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("project.pbxproj");
        fs::write(&file, b"original content").unwrap();

        let backup = create_backup(&file).unwrap();
        assert!(backup
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("project.pbxproj.backup_"));
        assert_eq!(backup.parent(), file.parent());
        assert_eq!(fs::read(&backup).unwrap(), b"original content");
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("project.pbxproj");
        fs::write(&file, b"before").unwrap();

        atomic_write(&file, b"after").unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"after");
    }
}
