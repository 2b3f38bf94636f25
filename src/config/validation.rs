use crate::config::types::{Config, CrawlerConfig, HeaderConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;

/// Upper bound accepted for `max-redirects`
const MAX_REDIRECTS_CEILING: u32 = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_header_config(&config.headers)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_to_crawl < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_to_crawl must be >= 1, got {}",
            config.max_pages_to_crawl
        )));
    }

    // request_delay = 0 is allowed; it disables the politeness pause

    if config.max_redirects < 1 || config.max_redirects > MAX_REDIRECTS_CEILING {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be between 1 and {}, got {}",
            MAX_REDIRECTS_CEILING, config.max_redirects
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= 1s, got {}s",
            config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates request header values
fn validate_header_config(config: &HeaderConfig) -> Result<(), ConfigError> {
    validate_header_value("user_agent", &config.user_agent)?;
    validate_header_value("accept", &config.accept)?;
    validate_header_value("accept_language", &config.accept_language)?;
    Ok(())
}

/// A header value must be non-empty and encodable on the wire
fn validate_header_value(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    HeaderValue::from_str(value).map_err(|_| {
        ConfigError::Validation(format!(
            "{} is not a valid HTTP header value: '{}'",
            name, value
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut config = Config::default();
        config.crawler.max_pages_to_crawl = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_delay_allowed() {
        let mut config = Config::default();
        config.crawler.request_delay = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_redirect_bounds() {
        let mut config = Config::default();
        config.crawler.max_redirects = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_redirects = 51;
        assert!(validate(&config).is_err());

        config.crawler.max_redirects = 50;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_header_value() {
        assert!(validate_header_value("accept", "text/html").is_ok());

        assert!(validate_header_value("accept", "").is_err());
        assert!(validate_header_value("accept", "   ").is_err());
        assert!(validate_header_value("accept", "text/html\n").is_err());
    }
}
