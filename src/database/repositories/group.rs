//! Group repository implementation
//!
//! Member rows and the student-side back-references are written together
//! inside one transaction, so a join, leave or removal can never leave the
//! two sides disagreeing.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::group::{AddMemberRequest, Group, GroupMember, StudentGroupRef};
use crate::utils::errors::CommitteeHubError;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a group with its leader member and back-reference in one
    /// transaction. Join codes are not deduplicated; the first match wins
    /// on lookup.
    pub async fn create_with_leader(
        &self,
        code: &str,
        leader: AddMemberRequest,
    ) -> Result<Group, CommitteeHubError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let group_id = leader.group_id;

        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (id, code, created_by, version, created_at)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id, code, created_by, version, created_at
            "#,
        )
        .bind(group_id)
        .bind(code)
        .bind(leader.user_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, first_name, last_name, roll_no, branch, profile_photo, leader, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
            "#,
        )
        .bind(group_id)
        .bind(leader.user_id)
        .bind(&leader.first_name)
        .bind(&leader.last_name)
        .bind(&leader.roll_no)
        .bind(&leader.branch)
        .bind(&leader.profile_photo)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO student_groups (user_id, group_id, code, created_by, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(leader.user_id)
        .bind(group_id)
        .bind(code)
        .bind(leader.user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Find group by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, CommitteeHubError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, code, created_by, version, created_at FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find a group by its join code. Duplicate codes are possible by
    /// design; the oldest match is taken.
    pub async fn find_first_by_code(&self, code: &str) -> Result<Option<Group>, CommitteeHubError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, code, created_by, version, created_at FROM groups WHERE code = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find the group a user created, covering a leader whose
    /// back-reference was never written
    pub async fn find_by_creator(&self, user_id: Uuid) -> Result<Option<Group>, CommitteeHubError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, code, created_by, version, created_at FROM groups WHERE created_by = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Get group members ordered by join time
    pub async fn get_members(&self, group_id: Uuid) -> Result<Vec<GroupMember>, CommitteeHubError> {
        let members = sqlx::query_as::<_, GroupMember>(
            "SELECT group_id, user_id, first_name, last_name, roll_no, branch, profile_photo, leader, joined_at FROM group_members WHERE group_id = $1 ORDER BY joined_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Get one member entry
    pub async fn find_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupMember>, CommitteeHubError> {
        let member = sqlx::query_as::<_, GroupMember>(
            "SELECT group_id, user_id, first_name, last_name, roll_no, branch, profile_photo, leader, joined_at FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Get the student-side back-reference, if any
    pub async fn find_backref(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StudentGroupRef>, CommitteeHubError> {
        let backref = sqlx::query_as::<_, StudentGroupRef>(
            "SELECT user_id, group_id, code, created_by, joined_at FROM student_groups WHERE user_id = $1 LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(backref)
    }

    /// Add a member entry plus the mirroring back-reference
    pub async fn add_member(
        &self,
        request: AddMemberRequest,
        code: &str,
        created_by: Uuid,
    ) -> Result<GroupMember, CommitteeHubError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (group_id, user_id, first_name, last_name, roll_no, branch, profile_photo, leader, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING group_id, user_id, first_name, last_name, roll_no, branch, profile_photo, leader, joined_at
            "#,
        )
        .bind(request.group_id)
        .bind(request.user_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.roll_no)
        .bind(&request.branch)
        .bind(&request.profile_photo)
        .bind(request.leader)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO student_groups (user_id, group_id, code, created_by, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request.user_id)
        .bind(request.group_id)
        .bind(code)
        .bind(created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(member)
    }

    /// Delete a member entry and its back-reference
    pub async fn remove_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), CommitteeHubError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM student_groups WHERE user_id = $1 AND group_id = $2")
            .bind(user_id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete the last member and the group itself. The version check
    /// refuses the delete when the group changed underneath the caller.
    pub async fn remove_member_and_delete_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        version: i64,
    ) -> Result<(), CommitteeHubError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM student_groups WHERE user_id = $1 AND group_id = $2")
            .bind(user_id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM groups WHERE id = $1 AND version = $2")
            .bind(group_id)
            .bind(version)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(CommitteeHubError::VersionConflict);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Move the leader flag and creator pointer to another member. All
    /// back-references mirror `created_by`, so they are rewritten in the
    /// same transaction.
    pub async fn transfer_leadership(
        &self,
        group_id: Uuid,
        from: Uuid,
        to: Uuid,
        version: i64,
    ) -> Result<(), CommitteeHubError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE groups SET created_by = $2, version = version + 1 WHERE id = $1 AND version = $3",
        )
        .bind(group_id)
        .bind(to)
        .bind(version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(CommitteeHubError::VersionConflict);
        }

        sqlx::query("UPDATE group_members SET leader = FALSE WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(from)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE group_members SET leader = TRUE WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(to)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE student_groups SET created_by = $2 WHERE group_id = $1")
            .bind(group_id)
            .bind(to)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
