use std::fmt::Display;

use tracing::info;

/// Progress messages for the user.
///
/// Every message is also recorded as an INFO event; `quiet` only silences stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Reporter { quiet }
    }

    pub fn info(&self, message: impl Display) {
        info!("{message}");
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Printed even in quiet mode.
    pub fn always(&self, message: impl Display) {
        info!("{message}");
        println!("{message}");
    }
}
