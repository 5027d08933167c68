//! Terminal notification sink: toasts go to stderr.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use sitewatch_core::{Notification, NotificationSink, Variant};

pub struct TerminalSink {
    color: bool,
    quiet: bool,
}

impl TerminalSink {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }
}

impl NotificationSink for TerminalSink {
    fn notify(&self, n: Notification) {
        tracing::debug!(title = %n.title, variant = ?n.variant, "{}", n.description);

        // Errors still surface in quiet mode.
        if self.quiet && n.variant == Variant::Success {
            return;
        }

        let line = match (n.variant, self.color) {
            (Variant::Success, true) => format!("{} {}", "✓".green(), n.description),
            (Variant::Destructive, true) => {
                format!("{} {}", "✗".red(), n.description.red())
            }
            (Variant::Success, false) => format!("✓ {}", n.description),
            (Variant::Destructive, false) => format!("✗ {}", n.description),
        };
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}
