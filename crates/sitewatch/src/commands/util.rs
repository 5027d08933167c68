//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};

use sitewatch_core::Confirmation;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Yes/no prompt on the terminal, auto-approving with `--yes`.
pub struct TerminalConfirm {
    yes: bool,
}

impl TerminalConfirm {
    /// Fails up front when a prompt would be needed but stdin is not a TTY.
    pub fn new(global: &GlobalOpts, action: &str) -> Result<Self, CliError> {
        if !global.yes && !io::stdin().is_terminal() {
            return Err(CliError::NonInteractiveRequiresYes {
                action: action.into(),
            });
        }
        Ok(Self { yes: global.yes })
    }
}

#[async_trait]
impl Confirmation for TerminalConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        let prompt = prompt.to_owned();
        // dialoguer blocks; keep it off the runtime threads.
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "confirmation prompt failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "confirmation task failed");
                false
            }
        }
    }
}

/// Spinner on stderr while waiting on the network; hidden when piped or quiet.
pub fn spinner(message: &'static str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
