//! Console logging through `log4rs`. Messages go to stderr so the runner's summary on stdout
//! stays machine readable.
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};

use crate::error::SirError;
use crate::log::LogSpec;

// ISO 8601 timestamp and a color coded level tag
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const APPENDER: &str = "stderr";

#[derive(Default)]
pub(super) struct Backend {
    handle: Option<Handle>,
}

impl Backend {
    /// Installs the global logger on first use and reconfigures it afterwards.
    pub(super) fn install(&mut self, spec: &LogSpec) -> Result<(), SirError> {
        let config = build_config(spec)?;
        match &self.handle {
            Some(handle) => handle.set_config(config),
            None => {
                let handle = log4rs::init_config(config)
                    .map_err(|e| SirError::config(format!("failed to install logger: {e}")))?;
                self.handle = Some(handle);
            }
        }
        Ok(())
    }
}

fn build_config(spec: &LogSpec) -> Result<Config, SirError> {
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
        .build(Root::builder().appender(APPENDER).build(spec.root_level()))
        .map_err(|e| SirError::config(format!("invalid logger configuration: {e}")))
}
