use crate::ScraperResult;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes serde records to a CSV file, headers taken from field names.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file with `records`. With no records only `headers` is written,
    /// since csv derives the header row from the first record.
    pub fn write<T: Serialize>(&self, records: &[T], headers: &[&str]) -> ScraperResult<&Path> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(!records.is_empty())
            .from_path(&self.path)?;

        if records.is_empty() {
            writer.write_record(headers)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("Saved {} rows to {}", records.len(), self.path.display());
        Ok(&self.path)
    }
}
