//! Source enumeration and file access.
//!
//! Checks never touch the filesystem directly. They go through
//! [`SourceAccess`], which enumerates the configured source files and reads
//! them one at a time. Content is never cached between checks.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ValidationConfig;
use crate::detect::ValidationResult;

/// A source file discovered under the configured source directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the project root, used in every message.
    pub relative: PathBuf,
}

impl SourceFile {
    pub fn new(project_root: &Path, path: PathBuf) -> Self {
        let relative = path
            .strip_prefix(project_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        Self { path, relative }
    }

    /// Relative path with forward slashes, stable across platforms.
    pub fn display(&self) -> String {
        self.relative.to_string_lossy().replace('\\', "/")
    }

    /// File name component, or the full path when there is none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.display())
    }
}

/// Size and permission bits of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub len: u64,
    /// Unix mode bits; `None` where the platform has no mode model.
    pub mode: Option<u32>,
}

/// File enumeration and reading shared by every check family.
pub trait SourceAccess {
    fn project_root(&self) -> &Path;

    fn config(&self) -> &ValidationConfig;

    /// All source files, sorted by path.
    fn enumerate_files(&self) -> Vec<SourceFile>;

    fn read_to_string(&self, file: &SourceFile) -> io::Result<String>;

    fn stat(&self, file: &SourceFile) -> io::Result<FileStat>;

    /// Read a file, converting any failure into a warning on `result`.
    fn read_file_safely(&self, file: &SourceFile, result: &mut ValidationResult) -> Option<String> {
        match self.read_to_string(file) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(
                    file = %file.display(),
                    error = %e,
                    check = result.check_name(),
                    "cannot read file"
                );
                result.add_warning(format!("cannot read {}: {}", file.display(), e));
                None
            }
        }
    }

    /// Stat a file, converting any failure into a warning on `result`.
    fn stat_safely(&self, file: &SourceFile, result: &mut ValidationResult) -> Option<FileStat> {
        match self.stat(file) {
            Ok(stat) => Some(stat),
            Err(e) => {
                warn!(
                    file = %file.display(),
                    error = %e,
                    check = result.check_name(),
                    "cannot stat file"
                );
                result.add_warning(format!("cannot inspect {}: {}", file.display(), e));
                None
            }
        }
    }
}

/// [`SourceAccess`] backed by the real filesystem.
#[derive(Debug, Clone)]
pub struct FsSource {
    project_root: PathBuf,
    config: ValidationConfig,
}

impl FsSource {
    pub fn new<P: AsRef<Path>>(project_root: P, config: ValidationConfig) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            config,
        }
    }
}

impl SourceAccess for FsSource {
    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn config(&self) -> &ValidationConfig {
        &self.config
    }

    fn enumerate_files(&self) -> Vec<SourceFile> {
        collect_source_files(
            &self.project_root,
            &self.config.source_dir,
            &self.config.file_extensions,
        )
    }

    fn read_to_string(&self, file: &SourceFile) -> io::Result<String> {
        fs::read_to_string(&file.path)
    }

    fn stat(&self, file: &SourceFile) -> io::Result<FileStat> {
        let metadata = fs::metadata(&file.path)?;
        Ok(FileStat {
            len: metadata.len(),
            mode: file_mode(&metadata),
        })
    }
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn file_mode(_metadata: &fs::Metadata) -> Option<u32> {
    None
}

/// Collect every file under `project_root/source_dir` whose name ends with
/// one of `extensions`, sorted lexicographically by path.
///
/// A missing source directory yields an empty list.
pub fn collect_source_files(
    project_root: &Path,
    source_dir: &Path,
    extensions: &BTreeSet<String>,
) -> Vec<SourceFile> {
    let root = project_root.join(source_dir);
    if !root.is_dir() {
        debug!(dir = %root.display(), "source directory does not exist");
        return Vec::new();
    }

    let mut paths = BTreeSet::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            paths.insert(entry.into_path());
        }
    }

    debug!(dir = %root.display(), files = paths.len(), "enumerated source files");
    paths
        .into_iter()
        .map(|path| SourceFile::new(project_root, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_collect_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("pkg")).unwrap();
        std::fs::write(src.join("zeta.py"), "").unwrap();
        std::fs::write(src.join("alpha.py"), "").unwrap();
        std::fs::write(src.join("pkg/mid.py"), "").unwrap();
        std::fs::write(src.join("notes.txt"), "").unwrap();

        let files = collect_source_files(temp.path(), Path::new("src"), &exts(&[".py"]));
        let names: Vec<String> = files.iter().map(|f| f.display()).collect();
        assert_eq!(names, vec!["src/alpha.py", "src/pkg/mid.py", "src/zeta.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_source_file_is_listed() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        let src = temp.path().join("src");
        std::fs::create_dir_all(&shared).unwrap();
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(shared.join("big.py"), "x = 1\n".repeat(20)).unwrap();
        std::os::unix::fs::symlink(shared.join("big.py"), src.join("big.py")).unwrap();

        let files = collect_source_files(temp.path(), Path::new("src"), &exts(&[".py"]));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display(), "src/big.py");

        let source = FsSource::new(temp.path(), ValidationConfig::defaults(temp.path()));
        let content = source.read_to_string(&files[0]).unwrap();
        assert_eq!(content.lines().count(), 20);
    }

    #[test]
    fn test_missing_source_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let files = collect_source_files(temp.path(), Path::new("lib"), &exts(&[".dart"]));
        assert!(files.is_empty());
    }

    #[test]
    fn test_overlapping_extensions_list_file_once() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("types.d.ts"), "").unwrap();

        let files = collect_source_files(temp.path(), Path::new("src"), &exts(&[".ts", ".d.ts"]));
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_read_file_safely_records_warning() {
        let temp = TempDir::new().unwrap();
        let config = ValidationConfig::defaults(temp.path());
        let source = FsSource::new(temp.path(), config);
        let missing = SourceFile::new(temp.path(), temp.path().join("src/gone.py"));

        let mut result = ValidationResult::new("File Size", crate::detect::Family::Quality);
        assert!(source.read_file_safely(&missing, &mut result).is_none());
        assert!(result.passed());
        assert_eq!(result.warnings().len(), 1);
        assert!(result.warnings()[0].contains("src/gone.py"));
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("bad.py"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let source = FsSource::new(temp.path(), ValidationConfig::defaults(temp.path()));
        let files = source.enumerate_files();
        assert_eq!(files.len(), 1);
        assert!(source.read_to_string(&files[0]).is_err());
    }
}
