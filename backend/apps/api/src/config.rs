//! Server Configuration
//!
//! Everything is read from the environment (after `.env` is loaded).
//! Only `DATABASE_URL` is required.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use auth::AuthConfig;
use notes::NotesConfig;
use platform::kv::KvConfig;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_UPLOAD_DIR: &str = "./uploads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub struct ServerConfig {
    pub database_url: String,
    pub max_db_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Root directory for the filesystem blob store
    pub upload_dir: PathBuf,
    pub kv: KvConfig,
    pub auth: AuthConfig,
    pub notes: NotesConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse(
            "BIND_ADDR",
            var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let kv = KvConfig {
            host: var("REDIS_HOST").unwrap_or_else(|| KvConfig::default().host),
            port: var("REDIS_PORT")
                .map(|v| parse("REDIS_PORT", v))
                .transpose()?
                .unwrap_or(KvConfig::default().port),
            password: var("REDIS_PASSWORD"),
            ..KvConfig::default()
        };

        let mut auth = AuthConfig::default();
        if let Some(secs) = var("SESSION_TTL_SECS") {
            let secs: u64 = parse("SESSION_TTL_SECS", secs)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    name: "SESSION_TTL_SECS",
                    value: secs.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            auth.session_ttl = Duration::from_secs(secs);
        }
        if let Some(pepper) = var("PASSWORD_PEPPER") {
            auth = auth.with_pepper(pepper);
        }

        let notes = NotesConfig {
            public_url: var("BLOB_PUBLIC_URL").unwrap_or_else(|| NotesConfig::default().public_url),
            bucket: var("BLOB_BUCKET").unwrap_or_else(|| NotesConfig::default().bucket),
            ..NotesConfig::default()
        };

        Ok(Self {
            database_url,
            max_db_connections: 5,
            bind_addr,
            frontend_origins,
            upload_dir: PathBuf::from(
                var("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            kv,
            auth,
            notes,
        })
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &"[REDACTED]")
            .field("max_db_connections", &self.max_db_connections)
            .field("bind_addr", &self.bind_addr)
            .field("frontend_origins", &self.frontend_origins)
            .field("upload_dir", &self.upload_dir)
            .field("kv", &self.kv)
            .field("auth", &self.auth)
            .field("notes", &self.notes)
            .finish()
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_database_url_is_required() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
        assert!(matches!(
            config(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_defaults() {
        let c = config(&[("DATABASE_URL", "postgres://localhost/notes")]).unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(c.kv.host, "localhost");
        assert_eq!(c.kv.port, 6379);
        assert!(c.kv.password.is_none());
        assert_eq!(c.auth.session_ttl, Duration::from_secs(86_400));
        assert!(c.auth.pepper().is_none());
        assert_eq!(c.notes.file_url("k"), "http://localhost:9000/notes/k");
        assert_eq!(c.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(c.frontend_origins.len(), 2);
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("DATABASE_URL", "postgres://db/notes"),
            ("REDIS_HOST", "redis"),
            ("REDIS_PORT", "6380"),
            ("REDIS_PASSWORD", "hunter2"),
            ("SESSION_TTL_SECS", "3600"),
            ("PASSWORD_PEPPER", "pepper"),
            ("FRONTEND_ORIGINS", "https://a.example, ,https://b.example"),
            ("BLOB_PUBLIC_URL", "https://cdn.example"),
            ("BLOB_BUCKET", "files"),
        ])
        .unwrap();

        assert_eq!(c.kv.host, "redis");
        assert_eq!(c.kv.port, 6380);
        assert_eq!(c.kv.password.as_deref(), Some("hunter2"));
        assert_eq!(c.auth.session_ttl, Duration::from_secs(3600));
        assert_eq!(c.auth.pepper(), Some(b"pepper".to_vec()));
        assert_eq!(c.frontend_origins, ["https://a.example", "https://b.example"]);
        assert_eq!(c.notes.file_url("k"), "https://cdn.example/files/k");
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("DATABASE_URL", "x"), ("REDIS_PORT", "abc")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "REDIS_PORT", .. }));

        let err = config(&[("DATABASE_URL", "x"), ("SESSION_TTL_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SESSION_TTL_SECS", .. }));
    }
}
