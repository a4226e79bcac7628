use std::fmt;

use anyhow::{bail, Context};

/// One year.
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// Argon2id work factor used for new password hashes.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"<redacted>")
            .field("db_max_connections", &self.db_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("jwt", &self.jwt)
            .field("password", &self.password)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => compose_database_url(&var)?,
        };

        let secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let jwt = JwtConfig {
            secret,
            ttl_hours: parse_or(&var, "JWT_TTL_HOURS", 24)?,
        };
        if !(1..=MAX_JWT_TTL_HOURS).contains(&jwt.ttl_hours) {
            bail!("JWT_TTL_HOURS must be between 1 and {MAX_JWT_TTL_HOURS}");
        }

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_or(&var, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&var, "PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&var, "PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        let port = match var("APP_PORT").or_else(|| var("PORT")) {
            Some(p) => p.parse().with_context(|| format!("invalid port {p:?}"))?,
            None => 8080,
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 10)?,
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            allowed_origins,
            jwt,
            password,
        })
    }
}

fn compose_database_url<F>(var: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let (Some(user), Some(name)) = (var("DB_USER"), var("DB_NAME")) else {
        bail!("DATABASE_URL or DB_USER/DB_NAME must be set");
    };
    let password = var("DB_PASSWORD").map(|p| format!(":{p}")).unwrap_or_default();
    let host = var("DB_HOST").unwrap_or_else(|| "localhost".into());
    let port = var("DB_PORT").unwrap_or_else(|| "5432".into());
    Ok(format!("postgres://{user}{password}@{host}:{port}/{name}"))
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn applies_defaults() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://u:p@db:5432/shop"),
            ("JWT_SECRET", "s3cret"),
        ])
        .expect("config");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.jwt.ttl_hours, 24);
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.allowed_origins, vec!["http://localhost:5173".to_string()]);
        assert_eq!(cfg.password.iterations, 2);
    }

    #[test]
    fn requires_jwt_secret() {
        let err = config_from(&[("DATABASE_URL", "postgres://db/shop")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn composes_database_url_from_parts() {
        let cfg = config_from(&[
            ("JWT_SECRET", "x"),
            ("DB_USER", "shop"),
            ("DB_PASSWORD", "pw"),
            ("DB_HOST", "pg"),
            ("DB_NAME", "store"),
        ])
        .expect("config");
        assert_eq!(cfg.database_url, "postgres://shop:pw@pg:5432/store");
    }

    #[test]
    fn falls_back_to_port_and_splits_origins() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://db/shop"),
            ("JWT_SECRET", "x"),
            ("PORT", "3000"),
            ("ALLOWED_ORIGINS", "http://a.test, https://b.test,"),
        ])
        .expect("config");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.allowed_origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://db/shop"),
            ("JWT_SECRET", "x"),
            ("JWT_TTL_HOURS", "soon"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_HOURS"));
    }

    #[test]
    fn bounds_token_lifetime() {
        let base = [("DATABASE_URL", "postgres://db/shop"), ("JWT_SECRET", "x")];
        for ttl in ["0", "-5", "8761", "100000000"] {
            let mut pairs = base.to_vec();
            pairs.push(("JWT_TTL_HOURS", ttl));
            let err = config_from(&pairs).unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_HOURS"), "ttl {ttl}");
        }

        let mut pairs = base.to_vec();
        pairs.push(("JWT_TTL_HOURS", "8760"));
        assert_eq!(config_from(&pairs).expect("config").jwt.ttl_hours, MAX_JWT_TTL_HOURS);
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://u:hunter2@db/shop"),
            ("JWT_SECRET", "topsecret"),
        ])
        .expect("config");
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("topsecret"));
        assert!(!printed.contains("hunter2"));
    }
}
