//! File discovery and report classification.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use hai_model::ReportType;
use hai_standards::Catalog;

use crate::error::{IngestError, Result};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb"];

/// Files matched to one report type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFiles {
    pub report: ReportType,
    pub files: Vec<PathBuf>,
}

/// Lists all spreadsheet files in a directory.
///
/// Returns files sorted by filename.
pub fn list_spreadsheet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let is_spreadsheet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SPREADSHEET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false);

        if is_spreadsheet {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Groups files by report type, in catalog order.
///
/// Files whose name starts with the catalog's exclude prefix are skipped so a
/// previous summary in the same folder is never read back as input. Report
/// types without any matching file are left out.
pub fn classify_files(files: &[PathBuf], catalog: &Catalog) -> Vec<ClassifiedFiles> {
    let mut groups = Vec::new();
    for profile in &catalog.reports {
        let matched: Vec<PathBuf> = files
            .iter()
            .filter(|path| {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    return false;
                };
                if !catalog.exclude_prefix.is_empty() && name.starts_with(&catalog.exclude_prefix)
                {
                    return false;
                }
                profile.matches_file_name(name)
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            debug!(report = %profile.kind, label = %profile.label, "no files matched report type");
            continue;
        }
        info!(
            report = %profile.kind,
            label = %profile.label,
            files = %file_names(&matched).join(", "),
            "matched report files"
        );
        groups.push(ClassifiedFiles {
            report: profile.kind,
            files: matched,
        });
    }
    groups
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &[
            "医院感染汇总表2024.xlsx",
            "手卫生依从正确率.XLS",
            "readme.txt",
            "汇总.xlsx",
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, "data").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        dir
    }

    #[test]
    fn test_list_spreadsheet_files() {
        let dir = create_test_dir();
        let files = list_spreadsheet_files(dir.path()).unwrap();

        let names = file_names(&files);
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"手卫生依从正确率.XLS".to_string()));
        assert!(!names.contains(&"readme.txt".to_string()));
        assert!(!names.contains(&"nested.xlsx".to_string()));
    }

    #[test]
    fn test_list_spreadsheet_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("report.xlsx");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_spreadsheet_files(&file_path);
        assert!(matches!(
            result,
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
