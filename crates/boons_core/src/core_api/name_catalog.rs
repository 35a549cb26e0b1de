use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::error::CoreError;

static ID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*Id\s*=\s*"([^"]*)""#).expect("valid Id pattern"));
static DISPLAY_NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*DisplayName\s*=\s*"([^"]*)""#).expect("valid DisplayName pattern")
});

/// Internal trait key to display string. Unknown keys resolve to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCatalog {
    source: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl NameCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from pairs; the first definition of a key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for (key, value) in pairs {
            entries.entry(key.into()).or_insert_with(|| value.into());
        }
        Self {
            source: None,
            entries,
        }
    }

    /// Scan game text in sjson form for `Id` / `DisplayName` pairs.
    ///
    /// Only blocks carrying both fields contribute; nothing else in the file
    /// is interpreted.
    pub fn from_sjson(text: &str) -> Self {
        Self::from_pairs(scan_sjson(text))
    }

    pub fn load_sjson_file(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let mut catalog = Self::from_sjson(&text);
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load every `*.sjson` file under `Content/Game/Text/<language>`.
    pub fn load_from_install_dir(install_dir: &Path, language: &str) -> Result<Self, CoreError> {
        let text_dir = find_text_dir(install_dir, language).ok_or_else(|| {
            CoreError::catalog(format!(
                "could not find Content/Game/Text/{language} under {}",
                install_dir.display()
            ))
        })?;

        let mut files = Vec::new();
        let listing = fs::read_dir(&text_dir).map_err(|e| CoreError::io(&text_dir, e))?;
        for entry_result in listing {
            let entry = entry_result.map_err(|e| CoreError::io(&text_dir, e))?;
            let path = entry.path();
            let is_sjson = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sjson"));
            if is_sjson && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut pairs = Vec::new();
        for path in &files {
            let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
            let before = pairs.len();
            pairs.extend(scan_sjson(&text));
            debug!(
                file = %path.display(),
                names = pairs.len() - before,
                "scanned text file"
            );
        }

        let mut catalog = Self::from_pairs(pairs);
        if catalog.is_empty() {
            return Err(CoreError::catalog(format!(
                "no display names could be parsed from {}",
                text_dir.display()
            )));
        }
        catalog.source = Some(text_dir);
        Ok(catalog)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scan_sjson(text: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut id: Option<String> = None;
    let mut display: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('}') {
            id = None;
            display = None;
            continue;
        }
        if let Some(caps) = ID_LINE.captures(line) {
            id = Some(caps[1].to_string());
        } else if let Some(caps) = DISPLAY_NAME_LINE.captures(line) {
            display = Some(caps[1].to_string());
        } else {
            continue;
        }

        if let (Some(key), Some(name)) = (&id, &display) {
            out.push((key.clone(), name.clone()));
            id = None;
            display = None;
        }
    }
    out
}

fn find_text_dir(install_dir: &Path, language: &str) -> Option<PathBuf> {
    [
        ["Content", "Game", "Text", language].as_slice(),
        ["Game", "Text", language].as_slice(),
        ["Text", language].as_slice(),
    ]
    .iter()
    .find_map(|parts| resolve_case_insensitive_path(install_dir, parts))
    .filter(|path| path.is_dir())
}

fn resolve_case_insensitive_path(base: &Path, parts: &[&str]) -> Option<PathBuf> {
    let mut current = base.to_path_buf();
    for part in parts {
        current = resolve_case_insensitive_component(&current, part)?;
    }
    Some(current)
}

fn resolve_case_insensitive_component(base: &Path, part: &str) -> Option<PathBuf> {
    let direct = base.join(part);
    if direct.exists() {
        return Some(direct);
    }

    let entries = fs::read_dir(base).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.to_string_lossy().eq_ignore_ascii_case(part) {
            return Some(entry.path());
        }
    }
    None
}
