use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use regex::Regex;

static TEMP_SAVE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+_Temp\.sav$").expect("valid save name pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCandidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// `Documents/Saved Games/Hades` for the current user.
pub fn default_save_dir() -> Option<PathBuf> {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .map(|docs| docs.join("Saved Games").join("Hades"))
}

pub fn is_run_save_name(name: &str) -> bool {
    TEMP_SAVE_NAME.is_match(name)
}

/// The most recently modified in-progress run save in `dir`, if any.
pub fn find_save_file(dir: &Path) -> io::Result<Option<SaveCandidate>> {
    let mut best: Option<SaveCandidate> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !is_run_save_name(&name.to_string_lossy()) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        let candidate = SaveCandidate {
            path: entry.path(),
            modified,
        };
        let newer = match &best {
            None => true,
            Some(b) => (candidate.modified, &candidate.path) > (b.modified, &b.path),
        };
        if newer {
            best = Some(candidate);
        }
    }
    Ok(best)
}

/// Resolve a user-supplied path: a directory is searched, a file is taken
/// as-is.
pub fn resolve_save(target: &Path) -> Result<SaveCandidate, String> {
    if target.is_dir() {
        return find_save_file(target)
            .map_err(|e| format!("failed to list {}: {e}", target.display()))?
            .ok_or_else(|| format!("no *_Temp.sav run save found in {}", target.display()));
    }

    let metadata =
        fs::metadata(target).map_err(|e| format!("failed to read {}: {e}", target.display()))?;
    Ok(SaveCandidate {
        path: target.to_path_buf(),
        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
    })
}

#[cfg(test)]
mod tests {
    use super::is_run_save_name;

    #[test]
    fn matches_only_temp_run_saves() {
        assert!(is_run_save_name("Profile1_Temp.sav"));
        assert!(is_run_save_name("abc123_Temp.sav"));
        assert!(!is_run_save_name("Profile1.sav"));
        assert!(!is_run_save_name("Profile1_Temp.sav.bak"));
        assert!(!is_run_save_name("Profile 1_Temp.sav"));
    }
}
