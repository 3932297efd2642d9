use std::sync::Once;

/// Crates below the renderer that flood `info` with per-resource chatter.
const GPU_BACKENDS: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. `"spinquad_engine=debug"`.
    /// Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,

    /// Caps the GPU backend crates at `warn` when no directives are given.
    pub quiet_gpu_backends: bool,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            quiet_gpu_backends: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Builds the logger without installing it. `env` is the value of
    /// `RUST_LOG`, if set.
    fn builder(&self, env: Option<&str>) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();

        match self.filter.as_deref().or(env) {
            Some(directives) => {
                builder.parse_filters(directives);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
                if self.quiet_gpu_backends {
                    for module in GPU_BACKENDS {
                        builder.filter_module(module, log::LevelFilter::Warn);
                    }
                }
            }
        }

        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has an effect.
///
/// Call before the window opens so shader compile logs emitted during
/// startup reach the terminal.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        config.builder(env.as_deref()).init();
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passes(config: &LoggingConfig, env: Option<&str>, target: &str, level: log::Level) -> bool {
        let logger = config.builder(env).build();
        let record = log::Record::builder().target(target).level(level).build();
        logger.matches(&record)
    }

    #[test]
    fn default_quiets_gpu_backends_only() {
        let config = LoggingConfig::default();
        assert!(passes(&config, None, "spinquad_engine::render", log::Level::Info));
        assert!(!passes(&config, None, "wgpu_core::device", log::Level::Info));
        assert!(passes(&config, None, "wgpu_core::device", log::Level::Warn));
        assert!(!passes(&config, None, "spinquad_engine::render", log::Level::Debug));
    }

    #[test]
    fn backends_stay_at_info_when_not_quieted() {
        let config = LoggingConfig { quiet_gpu_backends: false, ..Default::default() };
        assert!(passes(&config, None, "naga::front", log::Level::Info));
    }

    #[test]
    fn explicit_filter_wins_over_env() {
        let config = LoggingConfig {
            filter: Some("spinquad_engine=debug".into()),
            ..Default::default()
        };
        assert!(passes(&config, Some("error"), "spinquad_engine::render", log::Level::Debug));
        assert!(!passes(&config, Some("error"), "spinquad_demo", log::Level::Info));
    }

    #[test]
    fn env_directives_apply_without_explicit_filter() {
        let config = LoggingConfig::default();
        assert!(passes(&config, Some("debug"), "wgpu_core::device", log::Level::Debug));
    }
}
