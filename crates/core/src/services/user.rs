//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;
use voxpop_common::{
    AppError, AppResult, IdGenerator,
    validation::{validate_accept_terms, validate_password_strength, validate_username},
};
use voxpop_db::{
    entities::{user, user_profile},
    repositories::{UserProfileRepository, UserRepository},
};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    id_gen: IdGenerator,
}

/// An authenticated session: the user plus the bearer token that proves it.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub token: String,
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(
        length(min = 3, max = 30, message = "Username must be 3-30 characters"),
        custom(function = validate_username)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters"),
        custom(function = validate_password_strength)
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[serde(default)]
    pub confirm_password: String,

    #[validate(custom(function = validate_accept_terms))]
    #[serde(default)]
    pub accept_terms: bool,

    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Input for updating the profile of the authenticated user.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 256))]
    pub location: Option<String>,

    #[validate(url(message = "Invalid URL"))]
    pub website: Option<String>,

    #[validate(url(message = "Invalid URL"))]
    pub avatar_url: Option<String>,

    #[validate(url(message = "Invalid URL"))]
    pub cover_image_url: Option<String>,

    pub interests: Option<Vec<String>>,
}

/// Input for changing the password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters"),
        custom(function = validate_password_strength)
    )]
    pub new_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, profile_repo: UserProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account and open a session for it.
    pub async fn register(&self, input: RegisterInput) -> AppResult<Session> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username.to_lowercase())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            email: Set(input.email),
            token: Set(Some(token.clone())),
            display_name: Set(Some(input.full_name)),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let user = self.user_repo.create(user_model).await?;

        let profile_model = user_profile::ActiveModel {
            user_id: Set(user_id),
            password: Set(Some(password_hash)),
            interests: Set(json!([])),
            ..Default::default()
        };
        self.profile_repo.create(profile_model).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");

        Ok(Session { user, token })
    }

    /// Authenticate with email and password, opening a session.
    pub async fn login(&self, input: LoginInput) -> AppResult<Session> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if user.is_suspended {
            return Err(AppError::Forbidden("Account is suspended".to_string()));
        }

        let profile = self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .ok_or_else(|| AppError::Internal("User has no profile".to_string()))?;

        let hash = profile
            .password
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(&input.password, &hash)? {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        // Reuse the stored token; issue one if the account has none
        let (user, token) = match user.token.clone() {
            Some(token) => (user, token),
            None => {
                let token = self.id_gen.generate_token();
                let mut active: user::ActiveModel = user.into();
                active.token = Set(Some(token.clone()));
                (self.user_repo.update(active).await?, token)
            }
        };

        Ok(Session { user, token })
    }

    /// Resolve a bearer token to its user. Suspended accounts are rejected.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        if user.is_suspended {
            return Err(AppError::Forbidden("Account is suspended".to_string()));
        }

        Ok(user)
    }

    /// Invalidate the current token and issue a new one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<Session> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        let user = self.user_repo.update(active).await?;

        Ok(Session { user, token })
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Get a user by username (case-insensitive).
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_username(&username.to_lowercase())
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    /// Get a user's extended profile.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    /// Update the authenticated user's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(full_name) = input.full_name {
            active.display_name = Set(Some(full_name));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(cover_image_url) = input.cover_image_url {
            active.cover_image_url = Set(Some(cover_image_url));
        }
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        let profile = self.get_profile(user_id).await?;
        let mut active: user_profile::ActiveModel = profile.into();

        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(interests) = input.interests {
            if interests.len() > 10 {
                return Err(AppError::BadRequest(
                    "At most 10 interests are allowed".to_string(),
                ));
            }
            active.interests = Set(json!(interests));
        }
        active.updated_at = Set(Some(Utc::now().into()));
        self.profile_repo.update(active).await?;

        Ok(user)
    }

    /// Change the password, verifying the current one first.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        let profile = self.get_profile(user_id).await?;
        let hash = profile
            .password
            .clone()
            .ok_or_else(|| AppError::Unauthorized("No password set".to_string()))?;

        if !verify_password(&input.current_password, &hash)? {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let mut active: user_profile::ActiveModel = profile.into();
        active.password = Set(Some(hash_password(&input.new_password)?));
        active.updated_at = Set(Some(Utc::now().into()));
        self.profile_repo.update(active).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Search users by username or display name.
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.search(query, limit, offset).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use voxpop_common::validation::collect_field_errors;

    fn valid_registration() -> RegisterInput {
        RegisterInput {
            username: "abc".to_string(),
            email: "a@b.com".to_string(),
            password: "Abcdef1!".to_string(),
            confirm_password: "Abcdef1!".to_string(),
            accept_terms: true,
            full_name: "A B".to_string(),
        }
    }

    #[test]
    fn test_registration_input_valid() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn test_registration_requires_terms_acceptance() {
        let input = RegisterInput {
            accept_terms: false,
            ..valid_registration()
        };
        let errors = input.validate().unwrap_err();
        let fields = collect_field_errors(&errors);
        assert!(fields.contains_key("accept_terms"));
    }

    #[test]
    fn test_registration_omitted_terms_defaults_to_rejection() {
        // acceptTerms missing from the payload deserializes as false
        let input: RegisterInput = serde_json::from_value(serde_json::json!({
            "username": "abc",
            "email": "a@b.com",
            "password": "Abcdef1!",
            "confirmPassword": "Abcdef1!",
            "fullName": "A B",
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        let fields = collect_field_errors(&errors);
        assert!(fields.contains_key("accept_terms"));
    }

    #[test]
    fn test_registration_password_mismatch() {
        let input = RegisterInput {
            confirm_password: "Different1!".to_string(),
            ..valid_registration()
        };
        let errors = input.validate().unwrap_err();
        let fields = collect_field_errors(&errors);
        assert_eq!(
            fields.get("confirm_password").map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_registration_weak_password() {
        let input = RegisterInput {
            password: "abcdefgh".to_string(),
            confirm_password: "abcdefgh".to_string(),
            ..valid_registration()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_registration_username_charset() {
        let input = RegisterInput {
            username: "bad name!".to_string(),
            ..valid_registration()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("Abcdef1!").unwrap();
        assert!(verify_password("Abcdef1!", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
