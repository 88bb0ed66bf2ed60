//! Direct reconciliation against a live model, with conflict policies.
//!
//! ```text
//! ResolvedTree ──reconcile──▶ ModelAdapter
//!                   │
//!                   ├─ Policy::Skip     keep existing, continue with children
//!                   ├─ Policy::Replace  delete existing, create fresh
//!                   ├─ Policy::Abort    stop on first conflict
//!                   └─ Policy::Ask      Prompter decides (y / Y / n / N)
//! ```

mod engine;
mod error;
mod policy;
mod prompt;

#[cfg(test)]
mod tests;

pub use engine::{ReconcileReport, Reconciler, reconcile};
pub use error::ReconcileError;
pub use policy::{Answer, Policy};
pub use prompt::{NoPrompt, Prompter, TerminalPrompter, overwrite_question};
