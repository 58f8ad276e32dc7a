//! Used when the `logging` feature is disabled: specs are tracked but nothing is printed.
use crate::error::SirError;
use crate::log::LogSpec;

#[derive(Default)]
pub(super) struct Backend;

impl Backend {
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn install(&mut self, spec: &LogSpec) -> Result<(), SirError> {
        log::set_max_level(spec.max_level());
        Ok(())
    }
}
