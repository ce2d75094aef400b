//! Where raw sheet rows come from.
//!
//! A [`SheetSource`] returns the header row followed by data rows, each an
//! ordered list of cell strings. Rows may be shorter than the header;
//! [`Dataset::build`] pads them.

pub mod auth;
pub mod cache;
pub mod csv_file;
pub mod google;

pub use auth::{AuthorizedUserFile, CredentialProvider, StaticToken};
pub use cache::CachedSource;
pub use csv_file::CsvFileSource;
pub use google::GoogleSheetsSource;

use std::path::Path;

use crate::config::AppConfig;
use crate::data::Dataset;
use crate::error::Result;

/// Raw rows as delivered by a source: header first, no padding.
pub type RawRows = Vec<Vec<String>>;

/// A provider of raw tabular rows for an opaque range expression.
pub trait SheetSource {
    /// Fetch every row of `range`. Fails with `SourceUnavailable` when the
    /// rows cannot be delivered in full.
    fn fetch(&self, range: &str) -> Result<RawRows>;

    /// Short human-readable origin, for status lines.
    fn describe(&self) -> String;

    /// Forget anything remembered from earlier fetches.
    fn invalidate(&self) {}
}

impl<S: SheetSource + ?Sized> SheetSource for Box<S> {
    fn fetch(&self, range: &str) -> Result<RawRows> {
        (**self).fetch(range)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn invalidate(&self) {
        (**self).invalidate()
    }
}

/// Fetch `range` from `source` and build the session dataset.
pub fn load_dataset(source: &dyn SheetSource, range: &str) -> Result<Dataset> {
    let raw = source.fetch(range)?;
    Dataset::build(raw)
}

/// The source described by `config`, or a CSV export when `csv` is given.
///
/// A token in the configured environment variable wins over the token file.
pub fn from_config(config: &AppConfig, csv: Option<&Path>) -> Box<dyn SheetSource> {
    if let Some(path) = csv {
        return Box::new(CsvFileSource::new(path));
    }

    let credentials: Box<dyn CredentialProvider> =
        match StaticToken::from_env(&config.auth.access_token_env) {
            Some(token) => {
                log::info!("using access token from ${}", config.auth.access_token_env);
                Box::new(token)
            }
            None => {
                let file = AuthorizedUserFile::new(&config.auth.token_file);
                log::info!("using token file {}", file.path().display());
                Box::new(file)
            }
        };
    let google = GoogleSheetsSource::new(
        &config.sheet.spreadsheet_id,
        credentials,
        config.sheet.timeout(),
    );
    Box::new(CachedSource::new(google, config.sheet.cache_ttl()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;

    struct Fixed(RawRows);

    impl SheetSource for Fixed {
        fn fetch(&self, _range: &str) -> Result<RawRows> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    struct Offline;

    impl SheetSource for Offline {
        fn fetch(&self, _range: &str) -> Result<RawRows> {
            Err(SheetError::SourceUnavailable("offline".into()))
        }

        fn describe(&self) -> String {
            "offline".into()
        }
    }

    #[test]
    fn load_builds_from_fetched_rows() {
        let source = Fixed(vec![
            vec!["Entity ".into(), "Type".into()],
            vec!["A".into()],
        ]);
        let ds = load_dataset(&source, "Sheet1!A:Z").unwrap();
        assert_eq!(ds.columns(), ["Entity", "Type"]);
        assert_eq!(ds.rows()[0].get("Type"), Some(""));
    }

    #[test]
    fn config_selects_source() {
        let mut config = AppConfig::default();
        config.auth.access_token_env = "AGREEMENT_BOARD_TEST_UNSET_TOKEN".into();
        config.sheet.spreadsheet_id = "sheet-123".into();

        let remote = from_config(&config, None);
        assert_eq!(remote.describe(), "Google Sheets sheet-123");

        let local = from_config(&config, Some(Path::new("acuerdos.csv")));
        assert_eq!(local.describe(), "CSV export acuerdos.csv");
    }

    #[test]
    fn load_propagates_source_failure() {
        let boxed: Box<dyn SheetSource> = Box::new(Offline);
        assert_eq!(
            load_dataset(&boxed, "Sheet1!A:Z").unwrap_err(),
            SheetError::SourceUnavailable("offline".into())
        );
    }
}
