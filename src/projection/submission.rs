use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::TransferPayload;

/// What is being transferred, and from which workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferContext {
    pub document_id: Uuid,
    #[serde(default)]
    pub workflow_node_id: Option<String>,
}

impl TransferContext {
    pub fn new(document_id: Uuid, workflow_node_id: Option<String>) -> Self {
        Self {
            document_id,
            workflow_node_id,
        }
    }
}

/// Body handed to the transfer API client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferSubmission {
    pub session_id: Uuid,
    pub document_id: Uuid,
    pub workflow_node_id: Option<String>,
    #[serde(flatten)]
    pub payload: TransferPayload,
    pub comment: String,
    pub deadline: Option<NaiveDate>,
    pub prepared_at: DateTime<Utc>,
}

impl TransferSubmission {
    pub fn new(
        session_id: Uuid,
        context: &TransferContext,
        payload: TransferPayload,
        free_text: &str,
        deadline: Option<NaiveDate>,
    ) -> Self {
        let comment = compose_comment(&payload.comment_prefix, free_text);
        Self {
            session_id,
            document_id: context.document_id,
            workflow_node_id: context.workflow_node_id.clone(),
            payload,
            comment,
            deadline,
            prepared_at: Utc::now(),
        }
    }
}

/// Role summary followed by the user's own comment.
pub fn compose_comment(prefix: &str, free_text: &str) -> String {
    let free_text = free_text.trim();
    match (prefix.is_empty(), free_text.is_empty()) {
        (true, _) => free_text.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}\n{}", prefix, free_text),
    }
}
