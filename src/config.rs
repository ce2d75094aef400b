//! Dashboard configuration, read from `config.toml`.
//!
//! Lookup order: an explicit `--config` path, then
//! `<config dir>/agreement-board/config.toml`, then built-in defaults that
//! match the agreements sheet this dashboard was made for.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "agreement-board";

/// Read-only Sheets scope; the token file must grant at least this.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sheet: SheetConfig,
    pub auth: AuthConfig,
    pub columns: ColumnLayout,
    pub ui: UiConfig,
}

/// Which spreadsheet and range to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    /// A1 range expression, passed to the source untouched.
    pub range: String,
    /// Keep fetched rows this long; 0 disables caching.
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: "1CLXO542URTaZOjOaZnMP_BkQYbXVoCVIM0AQEciMqiU".to_string(),
            range: "Hoja1!A:Z".to_string(),
            cache_ttl_secs: 300,
            timeout_secs: 30,
        }
    }
}

impl SheetConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where the OAuth bearer token comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Cached authorized-user token file (`token.json`).
    pub token_file: PathBuf,
    /// Environment variable holding a ready-to-use access token; wins over the file.
    pub access_token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("token.json"),
            access_token_env: "GOOGLE_OAUTH_ACCESS_TOKEN".to_string(),
        }
    }
}

/// Sheet columns the dashboard gives a role to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Unique key of a row; drives the details tab selector.
    pub entity: String,
    pub entity_type: String,
    pub agreement_type: String,
    /// Column holding a logo image URL.
    pub logo: String,
    /// `entity_type` value counted as "private".
    pub private_value: String,
    /// `entity_type` value counted as "public".
    pub public_value: String,
    /// Columns shown in the overview table.
    pub table: Vec<String>,
    /// Columns listed as bullets under the entity name.
    pub detail_fields: Vec<String>,
    pub detail_sections: Vec<DetailSection>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            entity: "Entidad".to_string(),
            entity_type: "Tipo de entidad".to_string(),
            agreement_type: "Tipo de acuerdo".to_string(),
            logo: "Logos".to_string(),
            private_value: "Privada".to_string(),
            public_value: "Pública".to_string(),
            table: [
                "Entidad",
                "Tipo de entidad",
                "Tipo de acuerdo",
                "Estado",
                "Vigencia del acuerdo",
            ]
            .map(String::from)
            .to_vec(),
            detail_fields: ["Tipo de acuerdo", "Estado", "Vigencia del acuerdo"]
                .map(String::from)
                .to_vec(),
            detail_sections: vec![
                DetailSection::new(
                    "Tipo de información a la que la UBPD tiene acceso",
                    "Tipo de información a la que la UBPD tiene acceso",
                ),
                DetailSection::new(
                    "Quién tiene acceso a la información",
                    "Quién tiene el acceso a la info",
                ),
                DetailSection {
                    highlight: true,
                    ..DetailSection::new(
                        "¿Cómo consulto o solicito la información?",
                        "¿Cómo consulto o solicito la información?",
                    )
                },
            ],
        }
    }
}

impl ColumnLayout {
    /// The two columns offered as overview filters.
    pub fn filter_columns(&self) -> [&str; 2] {
        [self.entity_type.as_str(), self.agreement_type.as_str()]
    }
}

/// One titled text block on the details tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSection {
    pub title: String,
    pub column: String,
    /// Render as a warning-style callout instead of an info box.
    #[serde(default)]
    pub highlight: bool,
}

impl DetailSection {
    pub fn new(title: &str, column: &str) -> Self {
        Self {
            title: title.to_string(),
            column: column.to_string(),
            highlight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub logo_url: Option<String>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Visualizador Acuerdos UBPD".to_string(),
            logo_url: Some(
                "https://unidadbusqueda.gov.co/wp-content/themes/ubpd-portal-web/assets/ubpd_white_logo.svg"
                    .to_string(),
            ),
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

impl AppConfig {
    /// Default location of the user config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), else the user config file
    /// if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialising config")
    }

    /// Reject settings that would make every fetch or summary fail.
    ///
    /// `remote` is false when rows come from a local CSV export, in which
    /// case the spreadsheet id is irrelevant.
    pub fn validate(&self, remote: bool) -> Result<()> {
        if remote && self.sheet.spreadsheet_id.trim().is_empty() {
            bail!("sheet.spreadsheet_id must not be empty");
        }
        if self.sheet.range.trim().is_empty() {
            bail!("sheet.range must not be empty");
        }
        if remote && self.sheet.timeout_secs == 0 {
            bail!("sheet.timeout_secs must be > 0");
        }
        let cols = &self.columns;
        for (key, value) in [
            ("columns.entity", &cols.entity),
            ("columns.entity_type", &cols.entity_type),
            ("columns.agreement_type", &cols.agreement_type),
        ] {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_agreements_sheet() {
        let config = AppConfig::default();
        assert_eq!(config.sheet.range, "Hoja1!A:Z");
        assert_eq!(config.columns.entity, "Entidad");
        assert_eq!(config.columns.filter_columns(), ["Tipo de entidad", "Tipo de acuerdo"]);
        assert_eq!(config.columns.table.len(), 5);
        assert_eq!(config.columns.detail_sections.len(), 3);
        assert!(config.columns.detail_sections[2].highlight);
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [sheet]
            spreadsheet_id = "abc"
            cache_ttl_secs = 0

            [columns]
            entity = "Entity"
            "#,
        )
        .unwrap();
        assert_eq!(config.sheet.spreadsheet_id, "abc");
        assert_eq!(config.sheet.range, "Hoja1!A:Z");
        assert_eq!(config.sheet.cache_ttl(), Duration::ZERO);
        assert_eq!(config.columns.entity, "Entity");
        assert_eq!(config.columns.agreement_type, "Tipo de acuerdo");
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn detail_sections_parse_from_array_of_tables() {
        let config = AppConfig::from_toml(
            r#"
            [[columns.detail_sections]]
            title = "Access"
            column = "Who"

            [[columns.detail_sections]]
            title = "Request"
            column = "How"
            highlight = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.columns.detail_sections,
            [
                DetailSection::new("Access", "Who"),
                DetailSection {
                    highlight: true,
                    ..DetailSection::new("Request", "How")
                }
            ]
        );
    }

    #[test]
    fn toml_roundtrip_preserves_config() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let mut config = AppConfig::default();
        config.sheet.spreadsheet_id = " ".to_string();
        assert!(config.validate(true).is_err());
        assert!(config.validate(false).is_ok());

        config.sheet.spreadsheet_id = "abc".to_string();
        config.sheet.timeout_secs = 0;
        let err = config.validate(true).unwrap_err();
        assert!(err.to_string().contains("sheet.timeout_secs"));
        assert!(config.validate(false).is_ok());

        config.columns.agreement_type.clear();
        let err = config.validate(false).unwrap_err();
        assert!(err.to_string().contains("columns.agreement_type"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntitle = \"Acuerdos\"\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.ui.title, "Acuerdos");
    }
}
