use crate::app_config::{AppConfig, Environment, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default. A missing completion API key is not an error:
/// the server must stay reachable for health checks, and model calls fail
/// individually instead.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("RIVALSCOPE_ENV", "development"))?;

    let bind_addr = or_default("RIVALSCOPE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("RIVALSCOPE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("RIVALSCOPE_LOG_LEVEL", "info");

    let fetch_timeout_secs = parse_positive_u64("RIVALSCOPE_FETCH_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("RIVALSCOPE_USER_AGENT", DEFAULT_USER_AGENT);
    let analysis_timeout_secs = parse_positive_u64("RIVALSCOPE_ANALYSIS_TIMEOUT_SECS", "55")?;
    let inline_max_url_len = parse_usize("RIVALSCOPE_INLINE_MAX_URL_LEN", "100")?;
    let job_ttl_secs = parse_positive_u64("RIVALSCOPE_JOB_TTL_SECS", "3600")?;

    let debug_default = if env == Environment::Development {
        "true"
    } else {
        "false"
    };
    let debug_endpoints = parse_bool(
        "RIVALSCOPE_DEBUG_ENDPOINTS",
        &or_default("RIVALSCOPE_DEBUG_ENDPOINTS", debug_default),
    )?;

    let model_api_key = lookup("RIVALSCOPE_MODEL_API_KEY")
        .or_else(|_| lookup("PERPLEXITY_API_KEY"))
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    let model_base_url = or_default("RIVALSCOPE_MODEL_BASE_URL", "https://api.perplexity.ai")
        .trim_end_matches('/')
        .to_string();
    let model_name = or_default("RIVALSCOPE_MODEL_NAME", "sonar");
    // Sized so the fetch, one retry and its backoff fit inside the analysis deadline.
    let model_timeout_secs = parse_positive_u64("RIVALSCOPE_MODEL_TIMEOUT_SECS", "20")?;
    let model_max_retries = parse_u32("RIVALSCOPE_MODEL_MAX_RETRIES", "1")?;
    let model_retry_backoff_base_secs =
        parse_u64("RIVALSCOPE_MODEL_RETRY_BACKOFF_BASE_SECS", "2")?;

    let extract_max_text_chars = parse_usize("RIVALSCOPE_EXTRACT_MAX_TEXT_CHARS", "15000")?;
    let extract_max_links = parse_usize("RIVALSCOPE_EXTRACT_MAX_LINKS", "50")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        fetch_timeout_secs,
        user_agent,
        analysis_timeout_secs,
        inline_max_url_len,
        job_ttl_secs,
        debug_endpoints,
        model_api_key,
        model_base_url,
        model_name,
        model_timeout_secs,
        model_max_retries,
        model_retry_backoff_base_secs,
        extract_max_text_chars,
        extract_max_links,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RIVALSCOPE_ENV".to_string(),
            reason: format!("expected development, test or production, got \"{other}\""),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
