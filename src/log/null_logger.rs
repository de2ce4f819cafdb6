//! Stand-in used without the `logging` feature: nothing is printed, but `log::max_level`
//! still follows the installed spec so level checks behave the same.

use crate::log::LogSpec;

#[derive(Default)]
pub(super) struct Backend;

impl Backend {
    pub(super) fn apply(&mut self, spec: &LogSpec) {
        log::set_max_level(spec.max_level());
    }
}
