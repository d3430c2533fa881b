//! Reasoning service API types
//!
//! DTOs for the `/api/chat` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub base_dir: String,
}

/// Response body from `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,

    #[serde(default)]
    pub sources: Option<Vec<String>>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub job_id: Option<String>,
}

/// Error body returned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(alias = "error")]
    pub detail: String,
}

/// A successful answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
    pub title: Option<String>,
}

impl TryFrom<ChatResponse> for Answer {
    type Error = anyhow::Error;

    fn try_from(resp: ChatResponse) -> Result<Self, Self::Error> {
        match resp.answer {
            Some(text) => Ok(Answer {
                text,
                sources: resp.sources.unwrap_or_default(),
                title: resp.title.filter(|t| !t.trim().is_empty()),
            }),
            None => match resp.job_id {
                Some(job_id) => anyhow::bail!(
                    "Service queued the question as job {} ({}); no answer returned",
                    job_id,
                    resp.status.as_deref().unwrap_or("pending")
                ),
                None => anyhow::bail!(
                    "Service returned no answer (status: {})",
                    resp.status.as_deref().unwrap_or("unknown")
                ),
            },
        }
    }
}
