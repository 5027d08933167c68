// ── Confirmation gate ──
//
// Destructive operations ask the calling surface before doing anything.
// The prompt blocks only the interaction that raised it.

use async_trait::async_trait;

/// A yes/no prompt supplied by the calling surface.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

#[async_trait]
impl Confirmation for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverConfirm;

#[async_trait]
impl Confirmation for NeverConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
