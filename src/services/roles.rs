//! Role resolution service implementation
//!
//! Every user is governed by exactly one of three role records. The student
//! record carries the canonical `role` pointer; host and admin records are
//! materialized on first login after a role change, copying the baseline
//! identity fields. `assign_role` is the only writer of the pointer, and it
//! creates the role record before flipping it, so a freshly assigned role
//! is never observably missing its record.

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::repositories::ProfileRepository;
use crate::models::profile::{
    Admin, Destination, Host, Role, RoleResolution, Student, UpdateAdminRequest,
    UpdateHostRequest, UpdateStudentRequest,
};
use crate::utils::errors::{CommitteeHubError, Result};

/// Role resolution and profile management service
#[derive(Clone, Debug)]
pub struct RoleService {
    profiles: ProfileRepository,
}

impl RoleService {
    /// Create a new RoleService instance
    pub fn new(profiles: ProfileRepository) -> Self {
        Self { profiles }
    }

    /// Resolve which role governs a user at login, materializing a missing
    /// host/admin record on the way, and decide whether the client lands on
    /// the dashboard or the complete-your-details form.
    pub async fn resolve_on_login(&self, user_id: Uuid) -> Result<RoleResolution> {
        let student = self
            .profiles
            .find_student(user_id)
            .await?
            .ok_or(CommitteeHubError::StudentNotFound { user_id })?;

        let role = student.governing_role();
        debug!(user_id = %user_id, role = %role, "Resolving governing role");

        let profile_complete = match role {
            Role::Student => student.details_complete(),
            Role::Host => {
                let host = match self.profiles.find_host(user_id).await? {
                    Some(host) => host,
                    None => {
                        info!(user_id = %user_id, "Materializing host record on first login");
                        self.profiles
                            .create_host(
                                user_id,
                                &student.first_name,
                                &student.last_name,
                                &student.email,
                            )
                            .await?
                    }
                };
                host.details_complete()
            }
            Role::Admin => {
                let admin = match self.profiles.find_admin(user_id).await? {
                    Some(admin) => admin,
                    None => {
                        info!(user_id = %user_id, "Materializing admin record on first login");
                        self.profiles
                            .create_admin(
                                user_id,
                                &student.first_name,
                                &student.last_name,
                                &student.email,
                            )
                            .await?
                    }
                };
                admin.details_complete()
            }
        };

        Ok(RoleResolution {
            role,
            profile_complete,
            destination: if profile_complete {
                Destination::Dashboard
            } else {
                Destination::Details
            },
        })
    }

    /// Explicitly assign a role. The role-specific record is created first,
    /// then the pointer flips.
    pub async fn assign_role(&self, user_id: Uuid, role: Role) -> Result<Student> {
        let student = self
            .profiles
            .find_student(user_id)
            .await?
            .ok_or(CommitteeHubError::StudentNotFound { user_id })?;

        match role {
            Role::Student => {}
            Role::Host => {
                if self.profiles.find_host(user_id).await?.is_none() {
                    self.profiles
                        .create_host(
                            user_id,
                            &student.first_name,
                            &student.last_name,
                            &student.email,
                        )
                        .await?;
                }
            }
            Role::Admin => {
                if self.profiles.find_admin(user_id).await?.is_none() {
                    self.profiles
                        .create_admin(
                            user_id,
                            &student.first_name,
                            &student.last_name,
                            &student.email,
                        )
                        .await?;
                }
            }
        }

        let student = self.profiles.set_role(user_id, role).await?;
        info!(user_id = %user_id, role = %role, "Role assigned");

        Ok(student)
    }

    /// The governing role of a user, for permission checks
    pub async fn governing_role(&self, user_id: Uuid) -> Result<Role> {
        let student = self
            .profiles
            .find_student(user_id)
            .await?
            .ok_or(CommitteeHubError::StudentNotFound { user_id })?;
        Ok(student.governing_role())
    }

    /// Fetch the student record
    pub async fn get_student(&self, user_id: Uuid) -> Result<Student> {
        self.profiles
            .find_student(user_id)
            .await?
            .ok_or(CommitteeHubError::StudentNotFound { user_id })
    }

    /// Fetch the host record
    pub async fn get_host(&self, user_id: Uuid) -> Result<Host> {
        self.profiles
            .find_host(user_id)
            .await?
            .ok_or(CommitteeHubError::AccountNotFound { user_id })
    }

    /// Fetch the admin record
    pub async fn get_admin(&self, user_id: Uuid) -> Result<Admin> {
        self.profiles
            .find_admin(user_id)
            .await?
            .ok_or(CommitteeHubError::AccountNotFound { user_id })
    }

    /// Update student profile details
    pub async fn update_student(
        &self,
        user_id: Uuid,
        request: UpdateStudentRequest,
    ) -> Result<Student> {
        debug!(user_id = %user_id, "Updating student details");
        self.profiles.update_student(user_id, request).await
    }

    /// Update host profile details
    pub async fn update_host(&self, user_id: Uuid, request: UpdateHostRequest) -> Result<Host> {
        debug!(user_id = %user_id, "Updating host details");
        self.profiles.update_host(user_id, request).await
    }

    /// Update admin profile details
    pub async fn update_admin(&self, user_id: Uuid, request: UpdateAdminRequest) -> Result<Admin> {
        debug!(user_id = %user_id, "Updating admin details");
        self.profiles.update_admin(user_id, request).await
    }
}
