//! Local CSV export of the sheet (File → Download → CSV).

use std::path::{Path, PathBuf};

use super::{RawRows, SheetSource};
use crate::error::{Result, SheetError};

/// Reads every record of a CSV file as a raw row. The first record is the
/// header, exactly as with the remote source; records may differ in length.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SheetSource for CsvFileSource {
    /// The range expression has no meaning for a single-sheet export and is ignored.
    fn fetch(&self, _range: &str) -> Result<RawRows> {
        let unavailable = |e: csv::Error| {
            SheetError::SourceUnavailable(format!("reading {}: {e}", self.path.display()))
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(unavailable)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(unavailable)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        log::info!("read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("CSV export {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ragged_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acuerdos.csv");
        std::fs::write(
            &path,
            "Entidad,Tipo de entidad,Estado\n\"Alcaldía, Bogotá\",Pública,Vigente\nBanco,Privada\n",
        )
        .unwrap();

        let rows = CsvFileSource::new(&path).fetch("ignored").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Alcaldía, Bogotá");
        assert_eq!(rows[2], ["Banco", "Privada"]);
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvFileSource::new(dir.path().join("absent.csv"));
        assert!(matches!(
            source.fetch(""),
            Err(SheetError::SourceUnavailable(msg)) if msg.contains("absent.csv")
        ));
    }
}
