//! User Service - registration, login and profile

use serde::{Deserialize, Serialize};

use crate::domain::validation::{validate_email, validate_phone, validate_text};
use crate::domain::{DomainError, NewUser, User, Validate};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{self, ROLE_USER};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

impl Validate for RegisterInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_email(self.email.trim())?;
        validate_username(&self.username)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        validate_text("full_name", &self.full_name, 1, 100)?;
        if let Some(phone) = &self.phone {
            validate_phone("phone", phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Email or username
    pub identifier: String,
    pub password: String,
}

impl Validate for LoginInput {
    fn validate(&self) -> Result<(), DomainError> {
        if self.identifier.trim().is_empty() || self.password.is_empty() {
            return Err(DomainError::validation(
                "identifier and password are required",
            ));
        }
        Ok(())
    }
}

/// Profile changes. An empty `phone` clears the stored number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(full_name) = &self.full_name {
            validate_text("full_name", full_name, 1, 100)?;
        }
        if let Some(phone) = &self.phone
            && !phone.trim().is_empty()
        {
            validate_phone("phone", phone.trim())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// 3 to 30 chars of ASCII letters, digits, `_` or `.`
fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(3..=30).contains(&len)
        || !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(DomainError::validation(
            "username must be 3 to 30 letters, digits, '_' or '.'",
        ));
    }
    Ok(())
}

fn issue_token(state: &AppState, user: &User) -> Result<String, DomainError> {
    auth::create_jwt(&state.jwt_secret, user.id, &user.username, &user.role)
        .map_err(DomainError::Internal)
}

pub async fn register(state: &AppState, input: RegisterInput) -> Result<AuthResponse, DomainError> {
    input.validate()?;

    let email = input.email.trim().to_lowercase();
    if state.user_repo.email_exists(&email).await? {
        return Err(DomainError::conflict("email is already registered"));
    }
    if state.user_repo.username_exists(&input.username).await? {
        return Err(DomainError::conflict("username is already taken"));
    }

    let password_hash = auth::hash_password(&input.password).map_err(DomainError::Internal)?;
    let user = state
        .user_repo
        .create(NewUser {
            email,
            username: input.username,
            password_hash,
            full_name: input.full_name.trim().to_string(),
            phone: input.phone,
            role: ROLE_USER.to_string(),
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    let token = issue_token(state, &user)?;
    Ok(AuthResponse { token, user })
}

pub async fn login(state: &AppState, input: LoginInput) -> Result<AuthResponse, DomainError> {
    input.validate()?;

    let credentials = state
        .user_repo
        .find_credentials(&input.identifier)
        .await?
        .ok_or(DomainError::Unauthorized)?;

    let valid = auth::verify_password(&input.password, &credentials.password_hash)
        .map_err(DomainError::Internal)?;
    if !valid {
        tracing::warn!("Failed login for {}", input.identifier);
        return Err(DomainError::Unauthorized);
    }

    let token = issue_token(state, &credentials.user)?;
    Ok(AuthResponse {
        token,
        user: credentials.user,
    })
}

pub async fn get_profile(state: &AppState, user_id: i32) -> Result<User, DomainError> {
    state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn update_profile(
    state: &AppState,
    user_id: i32,
    input: ProfileUpdate,
) -> Result<User, DomainError> {
    input.validate()?;

    let phone = input.phone.map(|p| {
        let p = p.trim().to_string();
        if p.is_empty() { None } else { Some(p) }
    });
    state
        .user_repo
        .update_profile(
            user_id,
            input.full_name.map(|n| n.trim().to_string()),
            phone,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("budi_s").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("budi santoso").is_err());
    }

    #[test]
    fn register_input_rejects_short_password() {
        let input = RegisterInput {
            email: "budi@example.com".to_string(),
            username: "budi".to_string(),
            password: "short".to_string(),
            full_name: "Budi".to_string(),
            phone: None,
        };
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn empty_phone_in_profile_update_is_allowed() {
        let update = ProfileUpdate {
            full_name: None,
            phone: Some(String::new()),
        };
        assert!(update.validate().is_ok());
    }
}
