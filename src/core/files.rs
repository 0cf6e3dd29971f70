//! Output file layout
//!
//! Generated, converted and report files live in one directory per
//! [`FileCategory`] under the configured storage root. Names carry a
//! millisecond timestamp so repeated runs do not collide.

use crate::config::StorageConfig;
use crate::domain::{Result, RosterError};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of file produced by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// Generated workbooks
    Excel,
    /// Converted delimited files
    Csv,
    /// Report exports
    Reports,
}

impl std::str::FromStr for FileCategory {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(FileCategory::Excel),
            "csv" => Ok(FileCategory::Csv),
            "reports" | "report" => Ok(FileCategory::Reports),
            other => Err(RosterError::InvalidArgument(format!(
                "Unknown file category '{other}'. Must be one of: excel, csv, reports"
            ))),
        }
    }
}

/// Directory layout for pipeline outputs
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    excel_folder: String,
    csv_folder: String,
    reports_folder: String,
}

impl OutputLayout {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root_path),
            excel_folder: config.excel_folder.clone(),
            csv_folder: config.csv_folder.clone(),
            reports_folder: config.reports_folder.clone(),
        }
    }

    /// Directory for a file category
    pub fn dir(&self, category: FileCategory) -> PathBuf {
        let folder = match category {
            FileCategory::Excel => &self.excel_folder,
            FileCategory::Csv => &self.csv_folder,
            FileCategory::Reports => &self.reports_folder,
        };
        self.root.join(folder)
    }

    /// Creates the category directory if needed and returns it
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Output`] if the directory cannot be created.
    pub fn ensure_dir(&self, category: FileCategory) -> Result<PathBuf> {
        let dir = self.dir(category);
        fs::create_dir_all(&dir).map_err(|e| RosterError::output(&dir, e))?;
        Ok(dir)
    }

    /// Resolves a bare file name inside a category directory
    ///
    /// Any directory component of `name` is discarded, so `../../etc/passwd`
    /// resolves to `passwd` inside the category directory.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidArgument`] if no file name remains.
    pub fn resolve(&self, category: FileCategory, name: &str) -> Result<PathBuf> {
        let bare = bare_file_name(name).ok_or_else(|| {
            RosterError::InvalidArgument(format!("'{name}' does not contain a file name"))
        })?;
        Ok(self.dir(category).join(bare))
    }
}

/// Builds `<prefix>_<epoch-millis>.<extension>`
pub fn timestamped_name(prefix: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, Utc::now().timestamp_millis(), extension)
}

/// Last path component of `name`, treating both `/` and `\` as separators
pub fn bare_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Path::new(last)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout(root: &Path) -> OutputLayout {
        OutputLayout::new(&StorageConfig {
            root_path: root.to_string_lossy().to_string(),
            ..StorageConfig::default()
        })
    }

    #[test]
    fn test_resolve_strips_directories() {
        let temp = TempDir::new().unwrap();
        let layout = layout(temp.path());

        let resolved = layout.resolve(FileCategory::Csv, "../../etc/passwd").unwrap();
        assert_eq!(resolved, temp.path().join("csv").join("passwd"));

        let resolved = layout.resolve(FileCategory::Excel, "C:\\temp\\a.xlsx").unwrap();
        assert_eq!(resolved, temp.path().join("excel").join("a.xlsx"));
    }

    #[test]
    fn test_resolve_rejects_empty_names() {
        let temp = TempDir::new().unwrap();
        let layout = layout(temp.path());

        assert!(layout.resolve(FileCategory::Reports, "").is_err());
        assert!(layout.resolve(FileCategory::Reports, "dir/").is_err());
        assert!(layout.resolve(FileCategory::Reports, "..").is_err());
    }

    #[test]
    fn test_ensure_dir_creates_directory() {
        let temp = TempDir::new().unwrap();
        let layout = layout(temp.path());

        let dir = layout.ensure_dir(FileCategory::Reports).unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, temp.path().join("reports"));
    }

    #[test]
    fn test_timestamped_name_shape() {
        let name = timestamped_name("students", "xlsx");
        assert!(name.starts_with("students_"));
        assert!(name.ends_with(".xlsx"));
        let millis = &name["students_".len()..name.len() - ".xlsx".len()];
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("CSV".parse::<FileCategory>().unwrap(), FileCategory::Csv);
        assert_eq!("excel".parse::<FileCategory>().unwrap(), FileCategory::Excel);
        assert!("pdf".parse::<FileCategory>().is_err());
    }
}
