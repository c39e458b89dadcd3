use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_SITE_NAME: &str = "News Portal";
const DEFAULT_HTTP_PORT: u16 = 3100;
const DEFAULT_CATEGORIES: &str = "politics,technology,sports,business,health,world,entertainment";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Public site base, without trailing slash. Every emitted URL starts here.
    pub site_url: String,
    /// Backend API base, without trailing slash.
    pub api_url: String,
    /// Base the refresh coordinator reads `/sitemap.xml` from.
    pub refresh_url: String,
    pub indexing_queue_url: String,
    pub site_name: String,
    pub category_slugs: Vec<String>,
    pub http_port: u16,
    pub article_fetch_timeout: Duration,
    pub sitemap_crawl_timeout: Duration,
    pub refresh_timeout: Duration,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable is present but unparsable, or
    /// when the resulting settings fail validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let site_url = base_url(
            "NEXT_PUBLIC_SITE_URL",
            lookup("NEXT_PUBLIC_SITE_URL"),
            DEFAULT_SITE_URL,
        )?;
        let api_url = base_url(
            "NEXT_PUBLIC_API_URL",
            lookup("NEXT_PUBLIC_API_URL").or_else(|| lookup("BACKEND_URL")),
            DEFAULT_API_URL,
        )?;
        let refresh_url = base_url(
            "SITEMAP_REFRESH_URL",
            lookup("SITEMAP_REFRESH_URL"),
            &site_url,
        )?;
        let indexing_queue_url = match lookup("INDEXING_QUEUE_URL") {
            Some(raw) => absolute_url("INDEXING_QUEUE_URL", &raw)?,
            None => format!("{api_url}/api/indexing/queue"),
        };

        let site_name = lookup("SITE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());
        let category_slugs = parse_csv(
            lookup("SITEMAP_CATEGORIES")
                .as_deref()
                .unwrap_or(DEFAULT_CATEGORIES),
        );

        let http_port = parse_u16("HTTP_PORT", lookup("HTTP_PORT"), DEFAULT_HTTP_PORT)?;
        let article_fetch_timeout = parse_duration_ms(
            "ARTICLE_FETCH_TIMEOUT_MS",
            lookup("ARTICLE_FETCH_TIMEOUT_MS"),
            30_000,
        )?;
        let sitemap_crawl_timeout = parse_duration_ms(
            "SITEMAP_CRAWL_TIMEOUT_MS",
            lookup("SITEMAP_CRAWL_TIMEOUT_MS"),
            60_000,
        )?;
        let refresh_timeout = parse_duration_ms(
            "REFRESH_TIMEOUT_MS",
            lookup("REFRESH_TIMEOUT_MS"),
            30_000,
        )?;

        let settings = Self {
            site_url,
            api_url,
            refresh_url,
            indexing_queue_url,
            site_name,
            category_slugs,
            http_port,
            article_fetch_timeout,
            sitemap_crawl_timeout,
            refresh_timeout,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_port(self.http_port)?;
        validate_timeout("ARTICLE_FETCH_TIMEOUT_MS", self.article_fetch_timeout)?;
        validate_timeout("SITEMAP_CRAWL_TIMEOUT_MS", self.sitemap_crawl_timeout)?;
        validate_timeout("REFRESH_TIMEOUT_MS", self.refresh_timeout)?;
        if self.category_slugs.is_empty() {
            return Err(ConfigError::Invalid {
                name: "SITEMAP_CATEGORIES",
                reason: "at least one category slug is required".into(),
            });
        }
        Ok(())
    }
}

fn base_url(name: &'static str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    let raw = raw.unwrap_or_else(|| default.to_string());
    let url = absolute_url(name, &raw)?;
    Ok(url.trim_end_matches('/').to_string())
}

fn absolute_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_u16(name: &'static str, raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn parse_duration_ms(
    name: &'static str,
    raw: Option<String>,
    default_ms: u64,
) -> Result<Duration, ConfigError> {
    let ms = match raw {
        None => default_ms,
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })?,
    };
    Ok(Duration::from_millis(ms))
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::Invalid {
            name: "HTTP_PORT",
            reason: "Port cannot be 0".into(),
        });
    }
    Ok(())
}

fn validate_timeout(name: &'static str, timeout: Duration) -> Result<(), ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::Invalid {
            name,
            reason: "timeout cannot be 0".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.site_url, "http://localhost:3000");
        assert_eq!(settings.api_url, "http://localhost:5000");
        assert_eq!(settings.refresh_url, "http://localhost:3000");
        assert_eq!(
            settings.indexing_queue_url,
            "http://localhost:5000/api/indexing/queue"
        );
        assert_eq!(settings.http_port, 3100);
        assert_eq!(settings.article_fetch_timeout, Duration::from_secs(30));
        assert_eq!(settings.sitemap_crawl_timeout, Duration::from_secs(60));
        assert_eq!(settings.category_slugs.len(), 7);
        assert_eq!(settings.category_slugs[0], "politics");
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_urls() {
        let settings = settings_from(&[("NEXT_PUBLIC_SITE_URL", "https://news.example.com/")]).unwrap();
        assert_eq!(settings.site_url, "https://news.example.com");
        assert_eq!(settings.refresh_url, "https://news.example.com");
    }

    #[test]
    fn backend_url_is_used_when_public_api_url_is_absent() {
        let settings = settings_from(&[("BACKEND_URL", "http://backend:5000")]).unwrap();
        assert_eq!(settings.api_url, "http://backend:5000");

        let settings = settings_from(&[
            ("BACKEND_URL", "http://backend:5000"),
            ("NEXT_PUBLIC_API_URL", "http://api:8080"),
        ])
        .unwrap();
        assert_eq!(settings.api_url, "http://api:8080");
    }

    #[test]
    fn relative_site_url_is_rejected() {
        let err = settings_from(&[("NEXT_PUBLIC_SITE_URL", "/relative")]).unwrap_err();
        assert!(err.to_string().contains("NEXT_PUBLIC_SITE_URL"));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = settings_from(&[("NEXT_PUBLIC_API_URL", "ftp://files.example.com")]).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn zero_port_fails() {
        let err = settings_from(&[("HTTP_PORT", "0")]).unwrap_err();
        assert!(err.to_string().contains("Port cannot be 0"));
    }

    #[test]
    fn unparsable_timeout_fails() {
        let err = settings_from(&[("REFRESH_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("REFRESH_TIMEOUT_MS"));
    }

    #[test]
    fn category_list_is_normalized() {
        let settings = settings_from(&[("SITEMAP_CATEGORIES", " World, ,Tech ")]).unwrap();
        assert_eq!(settings.category_slugs, vec!["world", "tech"]);
    }

    #[test]
    fn empty_category_list_fails() {
        assert!(settings_from(&[("SITEMAP_CATEGORIES", " , ")]).is_err());
    }
}
