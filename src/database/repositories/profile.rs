//! Role record repository implementation
//!
//! Covers the three per-user role records. The students table is the
//! canonical role pointer; `set_role` is only reachable through the role
//! service, which materializes the per-role record first.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{
    Admin, CreateStudentRequest, Host, Role, Student, UpdateAdminRequest, UpdateHostRequest,
    UpdateStudentRequest,
};
use crate::utils::errors::CommitteeHubError;

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a student record at signup, role pointer starts at "student"
    pub async fn create_student(
        &self,
        request: CreateStudentRequest,
    ) -> Result<Student, CommitteeHubError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id, first_name, last_name, email, roll_no, branch, year, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'student', $8, $9)
            RETURNING id, first_name, last_name, email, roll_no, branch, year, profile_photo, role, created_at, updated_at
            "#,
        )
        .bind(request.id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.email)
        .bind(request.roll_no)
        .bind(request.branch)
        .bind(request.year)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    /// Find student record by user ID
    pub async fn find_student(&self, id: Uuid) -> Result<Option<Student>, CommitteeHubError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, email, roll_no, branch, year, profile_photo, role, created_at, updated_at FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Update student profile details
    pub async fn update_student(
        &self,
        id: Uuid,
        request: UpdateStudentRequest,
    ) -> Result<Student, CommitteeHubError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                roll_no = COALESCE($4, roll_no),
                branch = COALESCE($5, branch),
                year = COALESCE($6, year),
                profile_photo = COALESCE($7, profile_photo),
                updated_at = $8
            WHERE id = $1
            RETURNING id, first_name, last_name, email, roll_no, branch, year, profile_photo, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.roll_no)
        .bind(request.branch)
        .bind(request.year)
        .bind(request.profile_photo)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    /// Flip the canonical role pointer
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Student, CommitteeHubError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET role = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, first_name, last_name, email, roll_no, branch, year, profile_photo, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    /// Find host record by user ID
    pub async fn find_host(&self, id: Uuid) -> Result<Option<Host>, CommitteeHubError> {
        let host = sqlx::query_as::<_, Host>(
            "SELECT id, first_name, last_name, email, organization, profile_photo, created_at, updated_at FROM hosts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(host)
    }

    /// Materialize a host record copying baseline identity fields
    pub async fn create_host(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Host, CommitteeHubError> {
        let host = sqlx::query_as::<_, Host>(
            r#"
            INSERT INTO hosts (id, first_name, last_name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, organization, profile_photo, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(host)
    }

    /// Update host profile details
    pub async fn update_host(
        &self,
        id: Uuid,
        request: UpdateHostRequest,
    ) -> Result<Host, CommitteeHubError> {
        let host = sqlx::query_as::<_, Host>(
            r#"
            UPDATE hosts
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                organization = COALESCE($4, organization),
                profile_photo = COALESCE($5, profile_photo),
                updated_at = $6
            WHERE id = $1
            RETURNING id, first_name, last_name, email, organization, profile_photo, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.organization)
        .bind(request.profile_photo)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(host)
    }

    /// Find admin record by user ID
    pub async fn find_admin(&self, id: Uuid) -> Result<Option<Admin>, CommitteeHubError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, first_name, last_name, email, department, profile_photo, created_at, updated_at FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Materialize an admin record copying baseline identity fields
    pub async fn create_admin(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Admin, CommitteeHubError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, first_name, last_name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, department, profile_photo, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Update admin profile details
    pub async fn update_admin(
        &self,
        id: Uuid,
        request: UpdateAdminRequest,
    ) -> Result<Admin, CommitteeHubError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                department = COALESCE($4, department),
                profile_photo = COALESCE($5, profile_photo),
                updated_at = $6
            WHERE id = $1
            RETURNING id, first_name, last_name, email, department, profile_photo, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.department)
        .bind(request.profile_photo)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }
}
