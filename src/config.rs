use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextGenConfig {
    /// `None` disables the summary/draft endpoints.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub seed: SeedConfig,
    pub textgen: TextGenConfig,
}

/// Token lifetimes are limited to one year.
pub const MAX_JWT_TTL_MINUTES: i64 = 525_600;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: or_default("JWT_ISSUER", "uservault"),
            audience: or_default("JWT_AUDIENCE", "uservault-users"),
            ttl_minutes: jwt_ttl_minutes(parsed(&lookup, "JWT_TTL_MINUTES", 60)?)?,
        };
        let seed = SeedConfig {
            admin_name: or_default("SEED_ADMIN_NAME", "AdminTest"),
            admin_email: or_default("SEED_ADMIN_EMAIL", "admin@test.com"),
            admin_password: or_default("SEED_ADMIN_PASSWORD", "admin123"),
        };
        let textgen = TextGenConfig {
            api_key: lookup("GEMINI_API_KEY").filter(|v| !v.trim().is_empty()),
            model: or_default("GEMINI_MODEL", "gemini-2.0-flash"),
            timeout_secs: parsed(&lookup, "GEMINI_TIMEOUT_SECS", 30)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            host: or_default("APP_HOST", "0.0.0.0"),
            port: parsed(&lookup, "PORT", 5000)?,
            jwt,
            seed,
            textgen,
        })
    }
}

fn jwt_ttl_minutes(value: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_JWT_TTL_MINUTES).contains(&value) {
        anyhow::bail!("JWT_TTL_MINUTES={value} is out of range (1..={MAX_JWT_TTL_MINUTES})");
    }
    Ok(value)
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key}={raw:?} is invalid: {e}")),
        None => Ok(default),
    }
}
