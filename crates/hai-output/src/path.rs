//! Output naming.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Folder created next to the inputs when no output directory is given.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "输出结果";

const FILE_STEM: &str = "医疗数据汇总结果";

/// Format of the persisted summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Timestamped summary file name, e.g. `医疗数据汇总结果_20240131_081500.xlsx`.
pub fn summary_file_name(timestamp: NaiveDateTime, format: OutputFormat) -> String {
    format!(
        "{FILE_STEM}_{}.{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Summary path inside `output_dir`, stamped with the current local time.
pub fn default_output_path(output_dir: &Path, format: OutputFormat) -> PathBuf {
    output_dir.join(summary_file_name(Local::now().naive_local(), format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn file_name_is_timestamped() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        assert_eq!(
            summary_file_name(timestamp, OutputFormat::Xlsx),
            "医疗数据汇总结果_20240131_081500.xlsx"
        );
        assert_eq!(
            summary_file_name(timestamp, OutputFormat::Csv),
            "医疗数据汇总结果_20240131_081500.csv"
        );
    }

    #[test]
    fn default_path_lives_in_output_dir() {
        let path = default_output_path(Path::new("/data/输出结果"), OutputFormat::Csv);
        assert_eq!(path.parent(), Some(Path::new("/data/输出结果")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
    }
}
