//! Group membership service implementation
//!
//! Students form groups identified by a shareable 6-character code. Each
//! group has exactly one leader (its creator until transferred), the member
//! list lives under the group, and every member carries a back-reference so
//! their own group resolves in one lookup.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::repositories::{GroupRepository, ProfileRepository};
use crate::models::group::{AddMemberRequest, Group, GroupMember, GroupView};
use crate::models::profile::Student;
use crate::services::notification::{DomainEvent, NotificationService};
use crate::utils::errors::{CommitteeHubError, Result};
use crate::utils::helpers;

/// Group membership service
#[derive(Clone, Debug)]
pub struct GroupService {
    groups: GroupRepository,
    profiles: ProfileRepository,
    notifications: NotificationService,
}

impl GroupService {
    /// Create a new GroupService instance
    pub fn new(
        groups: GroupRepository,
        profiles: ProfileRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            groups,
            profiles,
            notifications,
        }
    }

    /// Resolve the group a student currently belongs to. The back-reference
    /// is checked first; a leader whose back-reference was never written is
    /// still found through the creator fallback query.
    pub async fn resolve_current_group(&self, user_id: Uuid) -> Result<Option<GroupView>> {
        let group = match self.groups.find_backref(user_id).await? {
            Some(backref) => self.groups.find_by_id(backref.group_id).await?,
            None => self.groups.find_by_creator(user_id).await?,
        };

        let Some(group) = group else {
            debug!(user_id = %user_id, "Student has no group");
            return Ok(None);
        };

        let members = self.groups.get_members(group.id).await?;
        Ok(Some(GroupView::new(group, members)))
    }

    /// Create a group with the caller as leader
    pub async fn create_group(&self, user_id: Uuid) -> Result<GroupView> {
        self.ensure_not_in_group(user_id).await?;

        let student = self.student_snapshot(user_id).await?;
        let code = helpers::generate_join_code();
        let group_id = Uuid::new_v4();

        let group = self
            .groups
            .create_with_leader(&code, member_request(group_id, &student, true))
            .await?;

        info!(group_id = %group.id, user_id = %user_id, code = %code, "Group created");
        crate::utils::logging::log_group_event(group.id, "created", user_id, None);
        self.notifications
            .publish(DomainEvent::GroupChanged { group_id: group.id });

        let members = self.groups.get_members(group.id).await?;
        Ok(GroupView::new(group, members))
    }

    /// Join a group by its 6-character code. When duplicate codes exist the
    /// first match is taken; duplicates are not prevented here.
    pub async fn join_group(&self, user_id: Uuid, code: &str) -> Result<GroupView> {
        let code = code.trim();
        if code.len() != helpers::JOIN_CODE_LEN {
            return Err(CommitteeHubError::InvalidInput(
                "Join code must be exactly 6 characters".to_string(),
            ));
        }

        self.ensure_not_in_group(user_id).await?;

        let group = self
            .groups
            .find_first_by_code(code)
            .await?
            .ok_or(CommitteeHubError::GroupNotFound)?;

        let student = self.student_snapshot(user_id).await?;
        self.groups
            .add_member(
                member_request(group.id, &student, false),
                &group.code,
                group.created_by,
            )
            .await?;

        info!(group_id = %group.id, user_id = %user_id, "Student joined group");
        crate::utils::logging::log_group_event(group.id, "member_joined", user_id, None);
        self.notifications
            .publish(DomainEvent::GroupChanged { group_id: group.id });

        let members = self.groups.get_members(group.id).await?;
        Ok(GroupView::new(group, members))
    }

    /// Leave the current group. A leader with other members present must
    /// transfer leadership first; the last member leaving deletes the group.
    pub async fn leave_group(&self, user_id: Uuid) -> Result<()> {
        let view = self
            .resolve_current_group(user_id)
            .await?
            .ok_or(CommitteeHubError::GroupNotFound)?;

        let is_leader = view.is_leader(user_id);
        let member_count = view.member_count();

        if is_leader && member_count > 1 {
            warn!(group_id = %view.group.id, user_id = %user_id,
                  "Leader attempted to leave with members present");
            return Err(CommitteeHubError::LeaderCannotLeave);
        }

        if is_leader && member_count == 1 {
            self.groups
                .remove_member_and_delete_group(view.group.id, user_id, view.group.version)
                .await?;
            info!(group_id = %view.group.id, user_id = %user_id, "Last member left, group deleted");
        } else {
            self.groups.remove_member(view.group.id, user_id).await?;
            info!(group_id = %view.group.id, user_id = %user_id, "Student left group");
        }

        crate::utils::logging::log_group_event(view.group.id, "member_left", user_id, None);
        self.notifications.publish(DomainEvent::GroupChanged {
            group_id: view.group.id,
        });
        Ok(())
    }

    /// Remove another member from the caller's group. Leader only, and
    /// never against the leader itself.
    pub async fn remove_member(&self, leader_id: Uuid, member_id: Uuid) -> Result<()> {
        let view = self
            .resolve_current_group(leader_id)
            .await?
            .ok_or(CommitteeHubError::GroupNotFound)?;

        if !view.is_leader(leader_id) {
            return Err(CommitteeHubError::PermissionDenied(
                "Only the group leader can remove members".to_string(),
            ));
        }
        if leader_id == member_id {
            return Err(CommitteeHubError::InvalidInput(
                "The leader cannot remove themselves".to_string(),
            ));
        }
        if self
            .groups
            .find_member(view.group.id, member_id)
            .await?
            .is_none()
        {
            return Err(CommitteeHubError::InvalidInput(
                "No such member in this group".to_string(),
            ));
        }

        self.groups.remove_member(view.group.id, member_id).await?;

        info!(group_id = %view.group.id, member_id = %member_id, leader_id = %leader_id,
              "Member removed by leader");
        crate::utils::logging::log_group_event(view.group.id, "member_removed", member_id, None);
        self.notifications.publish(DomainEvent::GroupChanged {
            group_id: view.group.id,
        });
        Ok(())
    }

    /// Hand the leader flag to another member of the same group
    pub async fn transfer_leadership(&self, leader_id: Uuid, member_id: Uuid) -> Result<GroupView> {
        let view = self
            .resolve_current_group(leader_id)
            .await?
            .ok_or(CommitteeHubError::GroupNotFound)?;

        if !view.is_leader(leader_id) {
            return Err(CommitteeHubError::PermissionDenied(
                "Only the group leader can transfer leadership".to_string(),
            ));
        }
        if leader_id == member_id {
            return Err(CommitteeHubError::InvalidInput(
                "Leadership is already held by this member".to_string(),
            ));
        }
        if self
            .groups
            .find_member(view.group.id, member_id)
            .await?
            .is_none()
        {
            return Err(CommitteeHubError::InvalidInput(
                "No such member in this group".to_string(),
            ));
        }

        self.groups
            .transfer_leadership(view.group.id, leader_id, member_id, view.group.version)
            .await?;

        info!(group_id = %view.group.id, from = %leader_id, to = %member_id,
              "Leadership transferred");
        self.notifications.publish(DomainEvent::GroupChanged {
            group_id: view.group.id,
        });

        let group = self
            .groups
            .find_by_id(view.group.id)
            .await?
            .ok_or(CommitteeHubError::GroupNotFound)?;
        let members = self.groups.get_members(group.id).await?;
        Ok(GroupView::new(group, members))
    }

    /// Fetch the member list of a group
    pub async fn members(&self, group: &Group) -> Result<Vec<GroupMember>> {
        self.groups.get_members(group.id).await
    }

    async fn ensure_not_in_group(&self, user_id: Uuid) -> Result<()> {
        if self.groups.find_backref(user_id).await?.is_some() {
            return Err(CommitteeHubError::AlreadyInGroup);
        }
        Ok(())
    }

    async fn student_snapshot(&self, user_id: Uuid) -> Result<Student> {
        self.profiles
            .find_student(user_id)
            .await?
            .ok_or(CommitteeHubError::StudentNotFound { user_id })
    }
}

/// The denormalized member entry copied from the student profile
fn member_request(group_id: Uuid, student: &Student, leader: bool) -> AddMemberRequest {
    AddMemberRequest {
        group_id,
        user_id: student.id,
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
        roll_no: student.roll_no.clone(),
        branch: student.branch.clone(),
        profile_photo: student.profile_photo.clone(),
        leader,
    }
}
