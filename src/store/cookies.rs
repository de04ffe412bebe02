use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AuthResult;

/// Cookie attributes supplied at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieOptions {
    pub path: String,
    pub max_age: Duration,
    pub same_site: SameSite,
}

impl CookieOptions {
    /// The layout every auth cookie in this client uses: `path=/`,
    /// seven-day lifetime, `SameSite=Strict`.
    pub fn auth_default() -> Self {
        Self {
            path: "/".to_string(),
            max_age: Duration::days(7),
            same_site: SameSite::Strict,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CookieRecord {
    name: String,
    value: String,
    path: String,
    same_site: SameSite,
    /// Absolute expiry derived from max-age at write time.
    expires_at: DateTime<Utc>,
}

impl CookieRecord {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// `Set-Cookie`-style rendering for edge/middleware consumers.
    fn header_value(&self, now: DateTime<Utc>) -> String {
        let max_age = (self.expires_at - now).num_seconds().max(0);
        format!(
            "{}={}; Path={}; Max-Age={}; SameSite={}",
            self.name,
            self.value,
            self.path,
            max_age,
            self.same_site.as_str()
        )
    }
}

/// The cookie surface of the session store, persisted as a JSON file.
///
/// Removal follows cookie semantics: a cookie is deleted by writing it back
/// with an already-elapsed lifetime, not by a distinct delete primitive.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn set(&self, name: &str, value: &str, options: &CookieOptions) -> AuthResult<()> {
        let record = CookieRecord {
            name: name.to_string(),
            value: value.to_string(),
            path: options.path.clone(),
            same_site: options.same_site,
            expires_at: Utc::now() + options.max_age,
        };

        let mut records = self.load()?;
        records.retain(|existing| existing.name != name);
        records.push(record);
        self.save(&records)
    }

    pub fn get(&self, name: &str) -> AuthResult<Option<String>> {
        let now = Utc::now();
        Ok(self
            .load()?
            .into_iter()
            .find(|record| record.name == name && !record.is_expired(now))
            .map(|record| record.value))
    }

    /// Expire the cookie in place: same name and path, max-age zero.
    pub fn remove(&self, name: &str, options: &CookieOptions) -> AuthResult<()> {
        let expired = CookieOptions {
            path: options.path.clone(),
            max_age: Duration::zero(),
            same_site: options.same_site,
        };
        self.set(name, "", &expired)
    }

    /// Render all live cookies as `Set-Cookie` header values.
    pub fn header_values(&self) -> AuthResult<Vec<String>> {
        let now = Utc::now();
        Ok(self
            .load()?
            .iter()
            .filter(|record| !record.is_expired(now))
            .map(|record| record.header_value(now))
            .collect())
    }

    fn load(&self) -> AuthResult<Vec<CookieRecord>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, records: &[CookieRecord]) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn jar() -> (tempfile::TempDir, CookieJar) {
        let dir = tempdir().unwrap();
        let jar = CookieJar::new(dir.path().join("cookies.json"));
        (dir, jar)
    }

    #[test]
    fn set_then_get_returns_live_value() {
        let (_dir, jar) = jar();
        jar.set("auth_token", "abc", &CookieOptions::auth_default()).unwrap();
        assert_eq!(jar.get("auth_token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn removal_is_an_expired_overwrite() {
        let (_dir, jar) = jar();
        let options = CookieOptions::auth_default();
        jar.set("auth_token", "abc", &options).unwrap();
        jar.remove("auth_token", &options).unwrap();

        // The record still exists on disk but is expired, so reads miss it.
        assert_eq!(jar.get("auth_token").unwrap(), None);
        // Removing again must not fail.
        jar.remove("auth_token", &options).unwrap();
    }

    #[test]
    fn zero_max_age_is_immediately_expired() {
        let (_dir, jar) = jar();
        let options = CookieOptions::auth_default().with_max_age(Duration::zero());
        jar.set("auth_token", "abc", &options).unwrap();
        assert_eq!(jar.get("auth_token").unwrap(), None);
    }

    #[test]
    fn header_values_carry_declared_attributes() {
        let (_dir, jar) = jar();
        jar.set("auth_token", "abc", &CookieOptions::auth_default()).unwrap();

        let headers = jar.header_values().unwrap();
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("auth_token=abc; Path=/; Max-Age="));
        assert!(headers[0].ends_with("; SameSite=Strict"));
    }
}
