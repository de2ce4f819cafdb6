use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};

use crate::log::LogSpec;

// ISO 8601 timestamp, color coded level, module path
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
// Reports own stdout, so diagnostics go to stderr.
const APPENDER: &str = "stderr";

/// A `log4rs` logger writing to stderr. Installed on first use, reconfigured after.
#[derive(Default)]
pub(super) struct Backend {
    handle: Option<Handle>,
}

fn build_config(spec: &LogSpec) -> Config {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let loggers = spec
        .modules
        .iter()
        .map(|(module, level)| Logger::builder().build(module.clone(), *level));

    Config::builder()
        .appender(Appender::builder().build(APPENDER, Box::new(stderr)))
        .loggers(loggers)
        .build(Root::builder().appender(APPENDER).build(spec.global))
        .unwrap_or_else(|e| panic!("failed to build log config: {e}"))
}

impl Backend {
    pub(super) fn apply(&mut self, spec: &LogSpec) {
        let config = build_config(spec);
        match &self.handle {
            Some(handle) => handle.set_config(config),
            None => {
                let handle = log4rs::init_config(config)
                    .unwrap_or_else(|e| panic!("failed to install logger: {e}"));
                self.handle = Some(handle);
            }
        }
        log::set_max_level(spec.max_level());
    }
}
