//! Authentication service implementation
//!
//! This service handles account sign-up and sign-in, bearer token issuing
//! and validation, and the reauthentication step required before sensitive
//! writes (event deletion, event registration).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::database::repositories::{AccountRepository, ProfileRepository};
use crate::models::account::{Account, CreateAccountRequest, UpdateAccountRequest};
use crate::models::profile::{CreateStudentRequest, Student};
use crate::utils::errors::{CommitteeHubError, Result};
use crate::utils::helpers;

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

/// Short-lived claims proving a completed reauthentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReauthClaims {
    pub sub: Uuid,
    pub purpose: String,
    pub iat: u64,
    pub exp: u64,
}

const REAUTH_PURPOSE: &str = "reauth";

/// The two ways a signed-in user can re-prove their identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ReauthProof {
    /// Re-submit the account password
    Password { password: String },
    /// Present a recently issued bearer token (the silent path)
    Provider { token: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub roll_no: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CommitteeHubError::Authentication(e.to_string()))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| CommitteeHubError::Authentication(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issue a bearer token for an account
pub fn generate_token(secret: &str, account_id: Uuid, email: &str, ttl_seconds: u64) -> Result<String> {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = Claims {
        sub: account_id,
        email: email.to_string(),
        iat: now,
        exp: now + ttl_seconds,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CommitteeHubError::Authentication(e.to_string()))
}

/// Decode and validate a bearer token
pub fn validate_token(secret: &str, token: &str) -> Result<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CommitteeHubError::Authentication("Invalid or expired token".to_string()))
}

/// Issue a short-lived reauthentication grant
pub fn issue_reauth_grant(secret: &str, user_id: Uuid, ttl_seconds: u64) -> Result<String> {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = ReauthClaims {
        sub: user_id,
        purpose: REAUTH_PURPOSE.to_string(),
        iat: now,
        exp: now + ttl_seconds,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CommitteeHubError::Authentication(e.to_string()))
}

/// Check a reauthentication grant against the acting user
pub fn verify_reauth_grant(secret: &str, user_id: Uuid, grant: &str) -> Result<()> {
    let claims = jsonwebtoken::decode::<ReauthClaims>(
        grant,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| {
        CommitteeHubError::Reauthentication("Reauthentication required".to_string())
    })?;

    if claims.purpose != REAUTH_PURPOSE || claims.sub != user_id {
        return Err(CommitteeHubError::Reauthentication(
            "Reauthentication required".to_string(),
        ));
    }

    Ok(())
}

/// Authentication service for accounts and reauthentication
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
    profiles: ProfileRepository,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(accounts: AccountRepository, profiles: ProfileRepository, settings: Settings) -> Self {
        Self {
            accounts,
            profiles,
            settings,
        }
    }

    /// Register a new account with its student record
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<(Account, Student, String)> {
        if !helpers::is_valid_email(&request.email) {
            return Err(CommitteeHubError::InvalidInput(
                "A valid email address is required".to_string(),
            ));
        }
        if request.password.len() < 8 {
            return Err(CommitteeHubError::InvalidInput(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if request.password != request.confirm_password {
            return Err(CommitteeHubError::InvalidInput(
                "Passwords do not match".to_string(),
            ));
        }
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(CommitteeHubError::InvalidInput(
                "First and last name are required".to_string(),
            ));
        }

        if self.accounts.email_exists(&request.email).await? {
            return Err(CommitteeHubError::InvalidInput(
                "An account with this email already exists".to_string(),
            ));
        }

        let account = self
            .accounts
            .create(CreateAccountRequest {
                email: request.email.clone(),
                password_hash: hash_password(&request.password)?,
                display_name: format!("{} {}", request.first_name, request.last_name),
            })
            .await?;

        let student = self
            .profiles
            .create_student(CreateStudentRequest {
                id: account.id,
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                roll_no: request.roll_no,
                branch: request.branch,
                year: request.year,
            })
            .await?;

        let token = self.token_for(&account)?;
        info!(user_id = %account.id, "New account registered");

        Ok((account, student, token))
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(Account, String)> {
        let account = self.accounts.find_by_email(email).await?.ok_or_else(|| {
            CommitteeHubError::Authentication("Invalid email or password".to_string())
        })?;

        if !verify_password(password, &account.password_hash)? {
            crate::utils::logging::log_auth_event(Some(account.id), "sign_in", false, None);
            return Err(CommitteeHubError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.token_for(&account)?;
        crate::utils::logging::log_auth_event(Some(account.id), "sign_in", true, None);

        Ok((account, token))
    }

    /// Validate a bearer token
    pub fn validate(&self, token: &str) -> Result<Claims> {
        validate_token(&self.settings.auth.jwt_secret, token)
    }

    /// Re-prove the caller's identity immediately before a sensitive write.
    /// Each path keeps its own failure message so the client can tell them
    /// apart; either failure leaves the caller free to retry.
    pub async fn reauthenticate(&self, user_id: Uuid, proof: ReauthProof) -> Result<String> {
        match proof {
            ReauthProof::Password { password } => {
                let account = self
                    .accounts
                    .find_by_id(user_id)
                    .await?
                    .ok_or(CommitteeHubError::AccountNotFound { user_id })?;

                if !verify_password(&password, &account.password_hash)? {
                    crate::utils::logging::log_auth_event(
                        Some(user_id),
                        "reauthenticate_password",
                        false,
                        None,
                    );
                    return Err(CommitteeHubError::Reauthentication(
                        "Incorrect password".to_string(),
                    ));
                }
            }
            ReauthProof::Provider { token } => {
                let claims = self.validate(&token).map_err(|_| {
                    CommitteeHubError::Reauthentication(
                        "Reauthentication expired, sign in again".to_string(),
                    )
                })?;

                let now = jsonwebtoken::get_current_timestamp();
                let window = self.settings.auth.reauth_window_seconds;
                if claims.sub != user_id || now.saturating_sub(claims.iat) > window {
                    crate::utils::logging::log_auth_event(
                        Some(user_id),
                        "reauthenticate_provider",
                        false,
                        Some("token outside reauthentication window"),
                    );
                    return Err(CommitteeHubError::Reauthentication(
                        "Reauthentication expired, sign in again".to_string(),
                    ));
                }
            }
        }

        crate::utils::logging::log_auth_event(Some(user_id), "reauthenticate", true, None);
        issue_reauth_grant(
            &self.settings.auth.jwt_secret,
            user_id,
            self.settings.auth.reauth_grant_ttl_seconds,
        )
    }

    /// Check a previously issued reauthentication grant
    pub fn check_reauth_grant(&self, user_id: Uuid, grant: &str) -> Result<()> {
        verify_reauth_grant(&self.settings.auth.jwt_secret, user_id, grant)
    }

    /// Update the account display name
    pub async fn update_display_name(&self, user_id: Uuid, display_name: String) -> Result<Account> {
        self.accounts
            .update(
                user_id,
                UpdateAccountRequest {
                    display_name: Some(display_name),
                    password_hash: None,
                },
            )
            .await
    }

    fn token_for(&self, account: &Account) -> Result<String> {
        generate_token(
            &self.settings.auth.jwt_secret,
            account.id,
            &account.email,
            self.settings.auth.token_ttl_seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = generate_token(SECRET, user_id, "a@b.co", 3600).unwrap();
        let claims = validate_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@b.co");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = generate_token(SECRET, Uuid::new_v4(), "a@b.co", 3600).unwrap();
        assert!(validate_token("another-secret-another-secret!!", &token).is_err());
    }

    #[test]
    fn test_reauth_grant_bound_to_user() {
        let user_id = Uuid::new_v4();
        let grant = issue_reauth_grant(SECRET, user_id, 300).unwrap();

        assert!(verify_reauth_grant(SECRET, user_id, &grant).is_ok());
        assert!(verify_reauth_grant(SECRET, Uuid::new_v4(), &grant).is_err());
    }

    #[test]
    fn test_bearer_token_is_not_a_reauth_grant() {
        let user_id = Uuid::new_v4();
        let token = generate_token(SECRET, user_id, "a@b.co", 3600).unwrap();
        assert!(verify_reauth_grant(SECRET, user_id, &token).is_err());
    }
}
