use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::{config::Config, core::diagnostics::Diagnostics};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// How a discovered file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    /// Program text scanned for marker calls.
    Source,
    /// Markup scanned for markup-extension values.
    Markup,
    /// Compiled binary, disassembled before scanning.
    Binary,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Source => write!(f, "source"),
            FileKind::Markup => write!(f, "markup"),
            FileKind::Binary => write!(f, "binary"),
        }
    }
}

/// Maps file extensions to a [`FileKind`].
#[derive(Debug, Clone, Default)]
pub struct FileClassifier {
    source: Vec<String>,
    markup: Vec<String>,
    binary: Vec<String>,
}

impl FileClassifier {
    pub fn from_config(config: &Config) -> Self {
        let normalize = |exts: &[String]| -> Vec<String> {
            exts.iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect()
        };
        Self {
            source: normalize(&config.source_extensions),
            markup: normalize(&config.markup_extensions),
            binary: normalize(&config.binary_extensions),
        }
    }

    /// Same classifier with binaries left unrecognized.
    pub fn without_binaries(mut self) -> Self {
        self.binary.clear();
        self
    }

    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if self.source.contains(&ext) {
            Some(FileKind::Source)
        } else if self.markup.contains(&ext) {
            Some(FileKind::Markup)
        } else if self.binary.contains(&ext) {
            Some(FileKind::Binary)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// Result of scanning files.
pub struct ScanResult {
    /// Files in path order, without duplicates.
    pub files: Vec<ScannedFile>,
    pub skipped_count: usize,
}

/// Collect every classifiable file under `sources`.
///
/// Each source is a file or directory relative to `base_dir`, or a glob
/// pattern expanded against it. Ignore patterns without wildcards are path
/// prefixes; glob patterns are matched against both the relative and the full
/// path. Problems are reported to `diagnostics` and never abort the scan.
pub fn scan_files(
    base_dir: &Path,
    sources: &[String],
    ignore_patterns: &[String],
    classifier: &FileClassifier,
    diagnostics: &mut Diagnostics,
) -> ScanResult {
    let mut files: BTreeMap<PathBuf, FileKind> = BTreeMap::new();
    let mut skipped_count = 0;

    // Separate ignore patterns into literal paths and glob patterns
    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => diagnostics.warning(format!("Invalid ignore pattern '{}': {}", p, e)),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let is_ignored = |path: &Path| {
        if literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            return true;
        }
        let full = path.to_string_lossy();
        let relative = path.strip_prefix(base_dir).unwrap_or(path).to_string_lossy();
        glob_patterns
            .iter()
            .any(|p| p.matches(&full) || p.matches(&relative))
    };

    let mut roots: Vec<PathBuf> = Vec::new();
    for source in sources {
        if is_glob_pattern(source) {
            let full_pattern = base_dir.join(source);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten()),
                Err(e) => {
                    diagnostics.warning(format!("Invalid source pattern '{}': {}", source, e))
                }
            }
        } else {
            let path: PathBuf = base_dir.join(source).components().collect();
            if path.exists() {
                roots.push(path);
            } else {
                diagnostics.warning(format!("Source path does not exist: {}", path.display()));
            }
        }
    }

    for root in roots {
        for entry in WalkDir::new(&root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    diagnostics.warning(format!("Cannot access path: {}", e));
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || is_ignored(path) {
                continue;
            }
            if let Some(kind) = classifier.classify(path) {
                files.insert(path.to_path_buf(), kind);
            }
        }
    }

    ScanResult {
        files: files
            .into_iter()
            .map(|(path, kind)| ScannedFile { path, kind })
            .collect(),
        skipped_count,
    }
}
