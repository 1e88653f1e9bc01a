//! Group model
//!
//! A study group is identified by a shareable 6-character join code. The
//! member list is the source of truth; each student additionally carries a
//! back-reference entry so their own group resolves without a scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub code: String,
    pub created_by: Uuid,
    /// Revision counter checked before delete and leadership writes
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub roll_no: Option<String>,
    pub branch: Option<String>,
    pub profile_photo: Option<String>,
    pub leader: bool,
    pub joined_at: DateTime<Utc>,
}

/// Back-reference stored on the student side; mirrors `{code, created_by}`
/// of the group it points at. Not an ownership relation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentGroupRef {
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub code: String,
    pub created_by: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub roll_no: Option<String>,
    pub branch: Option<String>,
    pub profile_photo: Option<String>,
    pub leader: bool,
}

/// A resolved group as seen by one student: the group plus its member list
/// and the computed leader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub group: Group,
    pub members: Vec<GroupMember>,
    pub leader: Option<Uuid>,
}

impl GroupView {
    pub fn new(group: Group, members: Vec<GroupMember>) -> Self {
        let leader = members.iter().find(|m| m.leader).map(|m| m.user_id);
        Self {
            group,
            members,
            leader,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_leader(&self, user_id: Uuid) -> bool {
        self.leader == Some(user_id)
    }
}
