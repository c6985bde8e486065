use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_TAG_MATCH_THRESHOLD: f64 = 0.8;

/// Credentials for the hosted search index. Absent when search is not configured.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub app_id: String,
    pub api_key: String,
    pub index: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub search: Option<SearchConfig>,
    pub admin_api_token: String,
    pub max_upload_bytes: usize,
    pub tag_match_threshold: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let search = match (
            std::env::var("SEARCH_APP_ID").ok(),
            std::env::var("SEARCH_API_KEY").ok(),
        ) {
            (Some(app_id), Some(api_key)) if !app_id.is_empty() && !api_key.is_empty() => {
                Some(SearchConfig {
                    app_id,
                    api_key,
                    index: optional_env("SEARCH_INDEX", "articles"),
                })
            }
            _ => None,
        };

        let tag_match_threshold = parse_env("TAG_MATCH_THRESHOLD", DEFAULT_TAG_MATCH_THRESHOLD)?;
        if !(0.0..=1.0).contains(&tag_match_threshold) {
            anyhow::bail!("TAG_MATCH_THRESHOLD must be between 0.0 and 1.0");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: optional_env("S3_REGION", "us-east-1"),
            s3_public_url: require_env("S3_PUBLIC_URL")?
                .trim_end_matches('/')
                .to_string(),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL", "https://api.openai.com")
                .trim_end_matches('/')
                .to_string(),
            search,
            admin_api_token: require_env("ADMIN_API_TOKEN")?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            tag_match_threshold,
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/mediacms_test".to_string(),
        s3_bucket: "media".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_public_url: "http://localhost:9000/media".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        openai_api_key: "test".to_string(),
        openai_base_url: "http://localhost:1".to_string(),
        search: None,
        admin_api_token: "secret-token".to_string(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        tag_match_threshold: DEFAULT_TAG_MATCH_THRESHOLD,
        port: 0,
        rust_log: "info".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let v: u16 = parse_env("MEDIACMS_TEST_UNSET_PORT_VARIABLE", 8080).unwrap();
        assert_eq!(v, 8080);
    }
}
