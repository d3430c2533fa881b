//! Reasoning service client module
//!
//! The service answers questions against a working-directory corpus. This
//! crate only consumes it: `ask(question, context) -> answer + sources`.

mod client;
mod types;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

pub use client::ServiceClient;
pub use types::*;

/// Anything that can answer a question
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn ask(&self, question: &str, context: &Path) -> Result<Answer>;
}
