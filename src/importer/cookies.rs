//! Cookie import into the browser's active cookie jar.
//!
//! Cookie writes are fire-and-forget: a cookie that cannot be stored is
//! logged and skipped, and the rest of the batch carries on.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};
use url::Url;

use super::ImportedCookie;
use crate::errors::CookieError;

/// Cookie as the jar expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieDetails {
    pub url: String,
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    /// Seconds since the epoch; `None` for session cookies.
    pub expiration_date: Option<f64>,
}

impl From<&ImportedCookie> for CookieDetails {
    fn from(cookie: &ImportedCookie) -> Self {
        Self {
            url: cookie.url.clone(),
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
            secure: cookie.secure,
            http_only: cookie.httponly,
            expiration_date: cookie.expiry_date,
        }
    }
}

pub trait CookieJar {
    fn set(&mut self, cookie: &CookieDetails) -> Result<(), CookieError>;
}

/// Outcome of one `add-cookies` batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CookieImportSummary {
    pub stored: usize,
    pub failed: usize,
}

/// Stores every cookie in `cookies`, logging the ones the jar rejects.
pub fn import_cookies(jar: &mut dyn CookieJar, cookies: &[ImportedCookie]) -> CookieImportSummary {
    let mut summary = CookieImportSummary::default();

    for cookie in cookies {
        let details = CookieDetails::from(cookie);
        match jar.set(&details) {
            Ok(()) => summary.stored += 1,
            Err(e) => {
                error!("❌ Failed to set cookie {} for {}: {}", details.name, details.url, e);
                summary.failed += 1;
            }
        }
    }

    debug!(
        "Cookie batch done: {} stored, {} failed",
        summary.stored, summary.failed
    );
    summary
}

/// Lowercased host of an http(s) URL.
fn url_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str().map(str::to_string)
}

/// Whether `host` is `domain` or one of its subdomains. A leading dot on
/// `domain` is ignored and the comparison is case-insensitive.
fn domain_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Cookie jar persisted in a SQLite database.
pub struct SqliteCookieJar {
    conn: Connection,
}

impl SqliteCookieJar {
    pub fn open(db_path: &Path) -> Result<Self, CookieError> {
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self, CookieError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, CookieError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cookies (
                host            TEXT NOT NULL,
                path            TEXT NOT NULL,
                name            TEXT NOT NULL,
                value           TEXT NOT NULL,
                url             TEXT NOT NULL,
                secure          INTEGER NOT NULL,
                http_only       INTEGER NOT NULL,
                expiration_date REAL,
                UNIQUE (host, path, name)
            )",
        )?;
        Ok(Self { conn })
    }

    pub fn count(&self) -> Result<usize, CookieError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cookies", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl CookieJar for SqliteCookieJar {
    fn set(&mut self, cookie: &CookieDetails) -> Result<(), CookieError> {
        let invalid = |reason: &str| CookieError::Invalid {
            url: cookie.url.clone(),
            name: cookie.name.clone(),
            reason: reason.to_string(),
        };

        if cookie.name.is_empty() {
            return Err(invalid("empty name"));
        }
        let url_host = url_host(&cookie.url).ok_or_else(|| invalid("not an http(s) URL"))?;

        let host = if cookie.domain.is_empty() {
            url_host
        } else if domain_matches(&url_host, &cookie.domain) {
            cookie.domain.to_ascii_lowercase()
        } else {
            return Err(invalid("domain does not match URL"));
        };

        let path = if cookie.path.is_empty() { "/" } else { cookie.path.as_str() };

        self.conn.execute(
            "INSERT INTO cookies (host, path, name, value, url, secure, http_only, expiration_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (host, path, name) DO UPDATE SET
                value = excluded.value,
                url = excluded.url,
                secure = excluded.secure,
                http_only = excluded.http_only,
                expiration_date = excluded.expiration_date",
            params![
                host,
                path,
                cookie.name,
                cookie.value,
                cookie.url,
                cookie.secure,
                cookie.http_only,
                cookie.expiration_date,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
impl SqliteCookieJar {
    /// Value stored for `(host, name)`, if any.
    fn value_of(&self, host: &str, name: &str) -> Result<Option<String>, CookieError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM cookies WHERE host = ?1 AND name = ?2")?;
        let mut rows = stmt.query(params![host, name])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(url: &str, domain: &str, name: &str, value: &str) -> ImportedCookie {
        ImportedCookie {
            url: url.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            secure: true,
            httponly: true,
            expiry_date: Some(1_900_000_000.0),
        }
    }

    #[test]
    fn test_details_from_imported() {
        let details = CookieDetails::from(&cookie("https://a.example/", ".a.example", "sid", "1"));
        assert!(details.http_only);
        assert_eq!(details.expiration_date, Some(1_900_000_000.0));
        assert_eq!(details.domain, ".a.example");
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("https://a.example:8080/x").as_deref(), Some("a.example"));
        assert_eq!(url_host("http://b.example").as_deref(), Some("b.example"));
        assert_eq!(url_host("HTTPS://Mixed.EXAMPLE/").as_deref(), Some("mixed.example"));
        assert_eq!(url_host("https://user:pw@d.example/").as_deref(), Some("d.example"));
        assert_eq!(url_host("ftp://c.example"), None);
        assert_eq!(url_host("not a url"), None);
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("example.com", ".Example.COM"));
        assert!(domain_matches("www.example.com", "example.com"));
        assert!(!domain_matches("badexample.com", "example.com"));
        assert!(!domain_matches("example.com", "www.example.com"));
    }

    #[test]
    fn test_import_accepts_case_and_userinfo_variants() {
        let mut jar = SqliteCookieJar::open_in_memory().unwrap();
        let cookies = vec![
            cookie("https://Example.COM/", ".example.com", "upper", "1"),
            cookie("https://user@example.com/", "example.com", "userinfo", "2"),
            cookie("HTTPS://example.com/", "example.com", "scheme", "3"),
            cookie("https://example.com/", "EXAMPLE.com", "domain", "4"),
        ];

        let summary = import_cookies(&mut jar, &cookies);
        assert_eq!(summary, CookieImportSummary { stored: 4, failed: 0 });
        assert_eq!(jar.value_of(".example.com", "upper").unwrap().as_deref(), Some("1"));
        assert_eq!(jar.value_of("example.com", "userinfo").unwrap().as_deref(), Some("2"));
        assert_eq!(jar.value_of("example.com", "domain").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn test_import_skips_failures_and_keeps_going() {
        let mut jar = SqliteCookieJar::open_in_memory().unwrap();
        let cookies = vec![
            cookie("https://a.example/", ".a.example", "sid", "1"),
            cookie("not a url", "", "bad", "x"),
            cookie("https://b.example/", "other.example", "mismatch", "x"),
            cookie("https://www.c.example/", ".c.example", "pref", "dark"),
        ];

        let summary = import_cookies(&mut jar, &cookies);
        assert_eq!(summary, CookieImportSummary { stored: 2, failed: 2 });
        assert_eq!(jar.count().unwrap(), 2);
        assert_eq!(jar.value_of(".c.example", "pref").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_same_cookie_overwrites() {
        let mut jar = SqliteCookieJar::open_in_memory().unwrap();
        import_cookies(&mut jar, &[cookie("https://a.example/", "", "sid", "1")]);
        import_cookies(&mut jar, &[cookie("https://a.example/", "", "sid", "2")]);

        assert_eq!(jar.count().unwrap(), 1);
        assert_eq!(jar.value_of("a.example", "sid").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.sqlite");
        {
            let mut jar = SqliteCookieJar::open(&path).unwrap();
            import_cookies(&mut jar, &[cookie("https://a.example/", "", "sid", "1")]);
        }
        let jar = SqliteCookieJar::open(&path).unwrap();
        assert_eq!(jar.count().unwrap(), 1);
    }
}
