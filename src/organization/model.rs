use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type UnitId = i64;
pub type StaffId = i64;

/// Organizational unit as delivered by the directory service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
    pub id: UnitId,
    #[serde(default)]
    pub parent_id: Option<UnitId>,
    pub name: String,
    #[serde(default)]
    pub is_can_check: Option<bool>,
}

impl OrgUnit {
    pub fn new(id: UnitId, parent_id: Option<UnitId>, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            is_can_check: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A person who may act on behalf of a staff member.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DelegateUser {
    pub id: StaffId,
    pub full_name: String,
    #[serde(default)]
    pub position_name: Option<String>,
}

impl DelegateUser {
    pub fn new(id: StaffId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            position_name: None,
        }
    }
}

/// Staff member eligible to receive a transfer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: StaffId,
    pub full_name: String,
    pub org_id: UnitId,
    #[serde(default)]
    pub position_name: Option<String>,
    #[serde(default)]
    pub position_order: i32,
    #[serde(default)]
    pub is_lead: bool,
    #[serde(default)]
    pub delegate_users: Vec<DelegateUser>,
}

impl StaffMember {
    pub fn new(id: StaffId, full_name: impl Into<String>, org_id: UnitId) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            org_id,
            position_name: None,
            position_order: 0,
            is_lead: false,
            delegate_users: Vec::new(),
        }
    }

    /// Mark this member as the designated leader of their unit.
    pub fn lead(mut self) -> Self {
        self.is_lead = true;
        self
    }

    pub fn with_position(mut self, name: impl Into<String>, order: i32) -> Self {
        self.position_name = Some(name.into());
        self.position_order = order;
        self
    }

    pub fn with_delegates(mut self, delegates: Vec<DelegateUser>) -> Self {
        self.delegate_users = delegates;
        self
    }
}
