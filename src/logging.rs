//! Tracing subscriber setup.
//!
//! `TRADELEDGER_LOG` overrides the configured level with any `EnvFilter`
//! directive. Logs always go to stderr so command output on stdout stays
//! clean. ANSI colour applies to the text format only.

pub const LOG_ENV: &str = "TRADELEDGER_LOG";

pub fn init_tracing(log_level: &str, log_format: &str, ansi: bool) -> Result<(), String> {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let format = log_format.trim().to_lowercase();
    let result = if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .try_init()
    };
    result.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
