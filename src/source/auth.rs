//! Bearer tokens for the Sheets API.
//!
//! The data core never sees credentials; a [`CredentialProvider`] is handed
//! to [`GoogleSheetsSource`](super::GoogleSheetsSource) and asked for a token
//! right before each request. Obtaining the first token (the interactive
//! browser consent) happens outside this program.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::config::SHEETS_READONLY_SCOPE;
use crate::error::{Result, SheetError};

/// Google's OAuth2 token endpoint, used when the token file names none.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens closer than this to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

const REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies an OAuth2 access token authorising one Sheets request.
pub trait CredentialProvider {
    fn access_token(&self) -> Result<String>;
}

// ---------------------------------------------------------------------------
// StaticToken
// ---------------------------------------------------------------------------

/// A token obtained elsewhere (e.g. `gcloud auth print-access-token`).
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from environment variable `var`, if set and non-empty.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Self)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

impl CredentialProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// AuthorizedUserFile
// ---------------------------------------------------------------------------

/// On-disk authorized-user credentials, as written by Google's client
/// libraries after the consent flow. Unknown keys are kept on rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthorizedUser {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<String>,
    #[serde(default)]
    expiry: Option<String>,
    #[serde(flatten)]
    extra: Map<String, JsonValue>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl AuthorizedUser {
    /// The cached token, if present and not about to expire.
    fn usable_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        match self.expiry.as_deref() {
            // No expiry recorded: trust the token and let the API reject it.
            None => Some(token),
            Some(raw) => {
                let expiry = DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc);
                let margin = chrono::Duration::seconds(EXPIRY_MARGIN_SECS);
                (expiry - margin > now).then_some(token)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Token cache file (`token.json`) that is refreshed in place when expired.
#[derive(Debug, Clone)]
pub struct AuthorizedUserFile {
    path: PathBuf,
}

impl AuthorizedUserFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<AuthorizedUser> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            SheetError::SourceUnavailable(format!(
                "cannot read token file {}: {e}",
                self.path.display()
            ))
        })?;
        let user: AuthorizedUser = serde_json::from_str(&text).map_err(|e| {
            SheetError::SourceUnavailable(format!(
                "malformed token file {}: {e}",
                self.path.display()
            ))
        })?;
        if !user.scopes.is_empty() && !user.scopes.iter().any(|s| s == SHEETS_READONLY_SCOPE) {
            log::warn!(
                "token file {} does not list scope {SHEETS_READONLY_SCOPE}",
                self.path.display()
            );
        }
        Ok(user)
    }

    fn write(&self, user: &AuthorizedUser) -> Result<()> {
        let text = serde_json::to_string_pretty(user)
            .map_err(|e| SheetError::SourceUnavailable(format!("encoding token file: {e}")))?;
        std::fs::write(&self.path, text).map_err(|e| {
            SheetError::SourceUnavailable(format!(
                "cannot write token file {}: {e}",
                self.path.display()
            ))
        })
    }

    /// Exchange the refresh token for a new access token.
    fn refresh(&self, user: &mut AuthorizedUser, now: DateTime<Utc>) -> Result<String> {
        let (Some(refresh_token), Some(client_id)) =
            (user.refresh_token.as_deref(), user.client_id.as_deref())
        else {
            return Err(SheetError::SourceUnavailable(format!(
                "token in {} expired and cannot be refreshed; sign in again",
                self.path.display()
            )));
        };
        let client_secret = user.client_secret.as_deref().unwrap_or_default();

        log::info!("refreshing access token via {}", user.token_uri);
        let response = ureq::post(&user.token_uri)
            .timeout(REFRESH_TIMEOUT)
            .send_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .map_err(|e| {
                log::warn!("token refresh failed: {e}");
                SheetError::SourceUnavailable(format!("token refresh failed: {e}"))
            })?;
        let body: RefreshResponse = response.into_json().map_err(|e| {
            SheetError::SourceUnavailable(format!("malformed token refresh response: {e}"))
        })?;

        user.token = Some(body.access_token.clone());
        user.expiry = body.expires_in.map(|secs| {
            (now + chrono::Duration::seconds(secs)).to_rfc3339_opts(SecondsFormat::Micros, true)
        });
        // The fresh token is good for this request even if it can't be cached.
        if let Err(err) = self.write(user) {
            log::warn!("refreshed token not saved: {err}");
        }
        Ok(body.access_token)
    }

    fn access_token_at(&self, now: DateTime<Utc>) -> Result<String> {
        let mut user = self.read()?;
        if let Some(token) = user.usable_token(now) {
            log::debug!("using cached access token from {}", self.path.display());
            return Ok(token.to_string());
        }
        self.refresh(&mut user, now)
    }
}

impl CredentialProvider for AuthorizedUserFile {
    fn access_token(&self) -> Result<String> {
        self.access_token_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn token_file(dir: &tempfile::TempDir, json: &str) -> AuthorizedUserFile {
        let path = dir.path().join("token.json");
        std::fs::write(&path, json).unwrap();
        AuthorizedUserFile::new(path)
    }

    /// Answer one HTTP request on a local port with a JSON `body`, running
    /// `before_reply` first. The join handle yields the request body.
    fn token_endpoint(
        body: &'static str,
        before_reply: impl FnOnce() + Send + 'static,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/token", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim().is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request = vec![0; content_length];
            reader.read_exact(&mut request).unwrap();

            before_reply();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            String::from_utf8(request).unwrap()
        });
        (url, handle)
    }

    fn expired_token_json(token_uri: &str) -> String {
        format!(
            r#"{{"token": "ya29.old", "refresh_token": "rt-123", "client_id": "cid",
                "client_secret": "secret", "token_uri": "{token_uri}",
                "expiry": "2025-03-01T11:00:00Z", "universe_domain": "googleapis.com"}}"#
        )
    }

    const REFRESHED: &str = r#"{"access_token": "ya29.new", "expires_in": 3600}"#;

    #[test]
    fn static_token_is_returned_verbatim() {
        let provider = StaticToken::new("ya29.abc");
        assert_eq!(provider.access_token().unwrap(), "ya29.abc");
        assert_eq!(format!("{provider:?}"), "StaticToken(<redacted>)");
    }

    #[test]
    fn fresh_cached_token_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let file = token_file(
            &dir,
            r#"{"token": "ya29.cached", "refresh_token": "1//r", "client_id": "id",
                "expiry": "2025-03-01T13:00:00.000000Z"}"#,
        );
        assert_eq!(file.access_token_at(now()).unwrap(), "ya29.cached");
    }

    #[test]
    fn token_without_expiry_is_trusted() {
        let dir = tempfile::tempdir().unwrap();
        let file = token_file(&dir, r#"{"token": "ya29.noexpiry"}"#);
        assert_eq!(file.access_token_at(now()).unwrap(), "ya29.noexpiry");
    }

    #[test]
    fn expired_token_without_refresh_token_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = token_file(
            &dir,
            r#"{"token": "ya29.old", "expiry": "2025-03-01T12:00:30Z"}"#,
        );
        let err = file.access_token_at(now()).unwrap_err();
        assert!(matches!(err, SheetError::SourceUnavailable(msg) if msg.contains("sign in again")));
    }

    #[test]
    fn missing_or_malformed_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = AuthorizedUserFile::new(dir.path().join("absent.json"));
        assert!(matches!(
            missing.access_token_at(now()),
            Err(SheetError::SourceUnavailable(_))
        ));
        let broken = token_file(&dir, "{not json");
        assert!(matches!(
            broken.access_token_at(now()),
            Err(SheetError::SourceUnavailable(msg)) if msg.contains("malformed")
        ));
    }

    #[test]
    fn unknown_keys_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = token_file(&dir, r#"{"token": "t", "universe_domain": "googleapis.com"}"#);
        let user = file.read().unwrap();
        assert_eq!(user.token_uri, DEFAULT_TOKEN_URI);
        file.write(&user).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("universe_domain"));
    }

    #[test]
    fn expired_token_is_refreshed_and_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = token_endpoint(REFRESHED, || {});
        let file = token_file(&dir, &expired_token_json(&url));

        assert_eq!(file.access_token_at(now()).unwrap(), "ya29.new");

        let request = server.join().unwrap();
        assert!(request.contains("grant_type=refresh_token"));
        assert!(request.contains("refresh_token=rt-123"));
        assert!(request.contains("client_id=cid"));

        let saved: JsonValue =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(saved["token"], "ya29.new");
        assert_eq!(saved["expiry"], "2025-03-01T13:00:00.000000Z");
        assert_eq!(saved["refresh_token"], "rt-123");
        assert_eq!(saved["universe_domain"], "googleapis.com");

        // The rewritten token is now fresh and served from the file.
        assert_eq!(file.access_token_at(now()).unwrap(), "ya29.new");
    }

    #[test]
    fn refreshed_token_is_used_when_file_cannot_be_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let blocked = path.clone();
        // Swap the file for a directory once the request is in flight, so the
        // write-back fails regardless of the user running the test.
        let (url, server) = token_endpoint(REFRESHED, move || {
            std::fs::remove_file(&blocked).unwrap();
            std::fs::create_dir(&blocked).unwrap();
        });
        std::fs::write(&path, expired_token_json(&url)).unwrap();
        let file = AuthorizedUserFile::new(&path);

        assert_eq!(file.access_token_at(now()).unwrap(), "ya29.new");
        server.join().unwrap();
        assert!(path.is_dir());
    }
}
