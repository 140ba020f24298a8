use utoipa::OpenApi;

use crate::organization::{DelegateUser, NodeKey, NodeKind, OrgUnit, StaffMember};
use crate::projection::{DelegateEncoding, Delegation, TransferContext, TransferPayload, TransferSubmission};
use crate::selection::{Role, SelectionEntry, SelectionSets};

/// Schemas shared with the transfer API and the directory service.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            OrgUnit,
            StaffMember,
            DelegateUser,
            NodeKind,
            NodeKey,
            Role,
            SelectionEntry,
            SelectionSets,
            DelegateEncoding,
            Delegation,
            TransferContext,
            TransferPayload,
            TransferSubmission,
        )
    ),
    tags(
        (name = "Transfer", description = "Document transfer recipient selection.")
    )
)]
pub struct TransferSchemas;

pub fn schema_json() -> Result<String, serde_json::Error> {
    TransferSchemas::openapi().to_pretty_json()
}
