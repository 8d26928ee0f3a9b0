use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// `None` when `JWT_SECRET` is unset or blank; signing and verification then refuse to run.
    pub secret: Option<String>,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub textbelt_url: String,
    pub textbelt_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub sms: SmsConfig,
    pub cors_allowed_origin: Option<String>,
}

const DEFAULT_SMS_TIMEOUT_SECS: u64 = 10;

fn non_blank(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Zero or unparseable values fall back to the default.
fn sms_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_SMS_TIMEOUT_SECS)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: non_blank("JWT_SECRET"),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "clinic-api".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "clinic-users".into()),
        };
        let sms = SmsConfig {
            textbelt_url: std::env::var("TEXTBELT_URL")
                .unwrap_or_else(|_| "https://textbelt.com/text".into()),
            textbelt_key: non_blank("TEXTBELT_API_KEY"),
            timeout_secs: sms_timeout_secs(std::env::var("SMS_TIMEOUT_SECS").ok().as_deref()),
        };
        Ok(Self {
            database_url,
            jwt,
            sms,
            cors_allowed_origin: non_blank("CORS_ALLOWED_ORIGIN"),
        })
    }
}
