use std::sync::Once;

/// Logger setup for binaries built on the engine.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter string, e.g. `"lantern_engine=debug,wgpu_core=warn"`.
    /// Takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// wgpu and naga log every resource at info level.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Explicit filter first, then the environment, then [`DEFAULT_FILTER`].
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    explicit
        .filter(|f| !f.trim().is_empty())
        .or_else(|| env.filter(|f| !f.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();

        log::debug!("log filter: {filter}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let f = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn blank_values_fall_through() {
        assert_eq!(resolve_filter(Some("  ".into()), Some("warn".into())), "warn");
        assert_eq!(resolve_filter(None, Some(String::new())), DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
    }
}
