use crate::{config::PagerConfig, defaults};
use std::{env, future::Future, str::FromStr};
use tokio::time::{sleep, Duration};
use tracing::warn;
use tracing_subscriber::filter::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";
const HUMAN_LOGGING: &str = "HUMAN_LOGGING";

/// Trim the leading '$' or '${' and trailing '}' from an environment variable.
pub fn trim_opt_env_key(key: &str) -> &str {
    // Abmiguous key: $FOO, non-ambiguous key: ${FOO}
    match key.strip_prefix("${").and_then(|k| k.strip_suffix('}')) {
        Some(k) => k,
        None => key.strip_prefix('$').unwrap_or(key),
    }
}

/// Determine whether a given key is an environment variable.
pub fn is_opt_env_var(k: &str) -> bool {
    k.starts_with('$') || (k.starts_with("${") && k.ends_with('}'))
}

/// Attempt to connect to a database, with retries.
///
/// This function takes a closure with a database connection
/// function as an argument; said function should return a future that
/// resolves to a final value of type `Result<T, sqlx::Error>`. The last
/// error is returned once the retry budget is spent.
pub async fn attempt_database_connection<F, Fut, T, U>(mut fut: F) -> Result<T, U>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, U>>,
    U: std::error::Error,
{
    let mut remaining_retries = defaults::MAX_DATABASE_CONNECTION_ATTEMPTS;
    let mut delay = defaults::INITIAL_RETRY_DELAY_SECS;
    loop {
        match fut().await {
            Ok(t) => break Ok(t),
            Err(e) => {
                if remaining_retries > 0 {
                    warn!(
                        "Could not connect to database: {e}. Retrying in {delay} seconds...",
                    );
                    remaining_retries -= 1;
                    sleep(Duration::from_secs(delay)).await;
                    delay *= 2;
                } else {
                    break Err(e);
                }
            }
        }
    }
}

/// Build the log filter from `RUST_LOG`, falling back to the configured level.
///
/// Unless verbose logging is requested, per-statement `sqlx` logging is
/// suppressed.
pub fn log_filter(config: &PagerConfig) -> anyhow::Result<EnvFilter> {
    let level = match env::var_os(RUST_LOG) {
        Some(level) => level
            .into_string()
            .map_err(|_| anyhow::anyhow!("Invalid `RUST_LOG` provided"))?,
        None => config.log_level.clone(),
    };

    let directives = if config.verbose {
        level
    } else {
        format!("{level},sqlx=warn")
    };

    Ok(EnvFilter::try_new(directives)?)
}

/// Initialize the logging context for the pager binaries.
pub fn init_logging(config: &PagerConfig) -> anyhow::Result<()> {
    let filter = log_filter(config)?;

    let human_logging = match env::var_os(HUMAN_LOGGING) {
        Some(s) => bool::from_str(s.to_str().unwrap_or_default()).map_err(|_| {
            anyhow::anyhow!(
                "Expected `true` or `false` to be provided for `HUMAN_LOGGING`"
            )
        })?,
        None => true,
    };

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let result = if human_logging {
        sub.with_ansi(true)
            .with_level(true)
            .with_line_number(true)
            .try_init()
    } else {
        sub.with_ansi(false)
            .with_level(true)
            .with_line_number(true)
            .json()
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

/// Health of a backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// The service is healthy.
    OK,

    /// The service is not healthy.
    NotOk,
}

/// Format a SQL query for logging.
pub fn format_sql_query(s: String) -> String {
    s.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_env_var_keys_are_trimmed() {
        assert!(is_opt_env_var("$POSTGRES_USER"));
        assert!(is_opt_env_var("${POSTGRES_USER}"));
        assert!(!is_opt_env_var("postgres"));

        assert_eq!(trim_opt_env_key("$POSTGRES_USER"), "POSTGRES_USER");
        assert_eq!(trim_opt_env_key("${POSTGRES_USER}"), "POSTGRES_USER");
        assert_eq!(trim_opt_env_key("${"), "{");
        assert_eq!(trim_opt_env_key("$"), "");
        assert_eq!(trim_opt_env_key(""), "");
    }

    #[test]
    fn test_format_sql_query_flattens_newlines() {
        let query = "SELECT *\nFROM tasks\nLIMIT 4".to_string();
        assert_eq!(format_sql_query(query), "SELECT * FROM tasks LIMIT 4");
    }

    #[tokio::test]
    async fn test_attempt_database_connection_returns_first_success() {
        let calls = AtomicUsize::new(0);
        let result: Result<u8, std::fmt::Error> = attempt_database_connection(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
