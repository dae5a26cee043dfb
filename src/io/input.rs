use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TransposeError};

/// Extension of the files picked up for transposition. Matched exactly.
pub const INPUT_EXTENSION: &str = "mid";

/// Recursively collect every `*.mid` file below `root`, sorted by path.
///
/// The root itself must be readable. Subdirectories that cannot be listed are
/// logged and skipped. Symlinked directories are not followed.
pub fn find_midi_files(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|source| TransposeError::Read {
        path: root.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    let mut pending = vec![entries];
    while let Some(entries) = pending.pop() {
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Skipping unreadable directory entry: {}", err);
                    continue;
                }
            };
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                match fs::read_dir(&path) {
                    Ok(sub) => pending.push(sub),
                    Err(err) => warn!(path = %path.display(), "Skipping unreadable directory: {}", err),
                }
            } else if is_midi_file(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    debug!(root = %root.display(), count = found.len(), "Collected MIDI files");
    Ok(found)
}

fn is_midi_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == INPUT_EXTENSION) && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[test]
    fn test_finds_nested_mid_files_sorted() {
        let dir = scratch_dir("find_nested");
        fs::create_dir_all(dir.join("b/deeper")).unwrap();
        fs::create_dir_all(dir.join("a")).unwrap();
        fs::write(dir.join("b/deeper/two.mid"), b"x").unwrap();
        fs::write(dir.join("a/one.mid"), b"x").unwrap();
        fs::write(dir.join("top.mid"), b"x").unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();
        fs::write(dir.join("upper.MID"), b"x").unwrap();
        fs::write(dir.join("long.midi"), b"x").unwrap();

        let found = find_midi_files(&dir).unwrap();
        assert_eq!(
            found,
            vec![
                dir.join("a/one.mid"),
                dir.join("b/deeper/two.mid"),
                dir.join("top.mid"),
            ]
        );
    }

    #[test]
    fn test_directory_named_like_midi_is_not_a_file() {
        let dir = scratch_dir("find_dir_named_mid");
        fs::create_dir_all(dir.join("folder.mid")).unwrap();
        fs::write(dir.join("folder.mid/inner.mid"), b"x").unwrap();

        let found = find_midi_files(&dir).unwrap();
        assert_eq!(found, vec![dir.join("folder.mid/inner.mid")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = scratch_dir("find_missing").join("nope");
        assert!(matches!(
            find_midi_files(&dir),
            Err(TransposeError::Read { .. })
        ));
    }
}
