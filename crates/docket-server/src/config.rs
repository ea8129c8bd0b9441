use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use docket_notify::SweepConfig;

/// Secrets that ship in .env.example and must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub sweep: SweepConfig,
    pub smtp_host: String,
    pub smtp_user: String,
    pub smtp_password: String,
    pub email_from: String,
    pub twilio_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from: String,
}

impl Config {
    /// Read everything from the environment. Channel credentials and the
    /// signing secret are required: their absence is a startup failure,
    /// never a runtime one.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = require("DOCKET_JWT_SECRET")?;
        if PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("DOCKET_JWT_SECRET is still a placeholder; set a real secret");
        }

        let sweep_hour: u32 = parse_var("DOCKET_SWEEP_HOUR", 9)?;
        if sweep_hour > 23 {
            bail!("DOCKET_SWEEP_HOUR must be 0-23, got {sweep_hour}");
        }

        Ok(Self {
            host: var_or("DOCKET_HOST", "0.0.0.0"),
            port: parse_var("DOCKET_PORT", 8000)?,
            db_path: var_or("DOCKET_DB_PATH", "docket.db").into(),
            jwt_secret,
            token_ttl_minutes: parse_var("DOCKET_TOKEN_TTL_MINUTES", 30)?,
            sweep: SweepConfig {
                hour: sweep_hour,
                window_days: parse_var("DOCKET_SWEEP_WINDOW_DAYS", 7)?,
                dispatch_timeout: Duration::from_secs(parse_var(
                    "DOCKET_DISPATCH_TIMEOUT_SECS",
                    30,
                )?),
            },
            smtp_host: require("DOCKET_SMTP_HOST")?,
            smtp_user: require("DOCKET_SMTP_USER")?,
            smtp_password: require("DOCKET_SMTP_PASSWORD")?,
            email_from: require("DOCKET_EMAIL_FROM")?,
            twilio_sid: require("DOCKET_TWILIO_SID")?,
            twilio_auth_token: require("DOCKET_TWILIO_AUTH_TOKEN")?,
            twilio_from: require("DOCKET_TWILIO_FROM")?,
        })
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

/// Unset falls back to the default; a value that is set but unparsable is a
/// startup failure, not something to paper over.
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_defaults_only_when_unset() {
        assert_eq!(parse_var("DOCKET_TEST_UNSET_PORT", 8000u16).unwrap(), 8000);

        unsafe { std::env::set_var("DOCKET_TEST_GOOD_PORT", "9100") };
        assert_eq!(parse_var("DOCKET_TEST_GOOD_PORT", 8000u16).unwrap(), 9100);
    }

    #[test]
    fn parse_var_rejects_malformed_values() {
        unsafe { std::env::set_var("DOCKET_TEST_BAD_PORT", "80O0") };
        let err = parse_var("DOCKET_TEST_BAD_PORT", 8000u16).unwrap_err();
        assert!(err.to_string().contains("DOCKET_TEST_BAD_PORT"));

        unsafe { std::env::set_var("DOCKET_TEST_BAD_WINDOW", "seven") };
        assert!(parse_var("DOCKET_TEST_BAD_WINDOW", 7i64).is_err());
    }
}
