// Confirmation policies for batch sync
//
// The pipeline never prompts on its own; callers decide how a SyncPlan is
// approved (always, never, a closure, or an interactive terminal prompt).

use crate::pipeline::SyncPlan;
use anyhow::Result;

pub trait ConfirmPolicy {
    fn confirm(&self, plan: &SyncPlan) -> Result<bool>;
}

/// Approve every plan (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmPolicy for AssumeYes {
    fn confirm(&self, _plan: &SyncPlan) -> Result<bool> {
        Ok(true)
    }
}

/// Reject every plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl ConfirmPolicy for Decline {
    fn confirm(&self, _plan: &SyncPlan) -> Result<bool> {
        Ok(false)
    }
}

impl<F> ConfirmPolicy for F
where
    F: Fn(&SyncPlan) -> bool,
{
    fn confirm(&self, plan: &SyncPlan) -> Result<bool> {
        Ok(self(plan))
    }
}

/// Ask on the terminal; defaults to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompt;

impl ConfirmPolicy for InteractivePrompt {
    fn confirm(&self, plan: &SyncPlan) -> Result<bool> {
        let answer = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Upload {} partition files from {} to {}?",
                plan.len(),
                plan.local_root.display(),
                plan.destination
            ))
            .default(false)
            .interact()?;
        Ok(answer)
    }
}
