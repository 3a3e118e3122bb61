use std::sync::Arc;

use axum::{Json, extract::State};
use thiserror::Error;
use tracing::info;

use tasklist_db::{CredentialStore, DbError};
use tasklist_types::api::{IdResponse, SignInRequest, SignUpRequest, TokenResponse};

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::password::{HashError, SaltedHasher};
use crate::state::{AppState, blocking};
use crate::token::{TokenError, TokenService};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} must not be empty")]
    Validation(&'static str),

    #[error("{0}")]
    Duplicate(String),

    #[error("incorrect login or password")]
    InvalidCredentials,

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(DbError),
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(msg) => AuthError::Duplicate(msg),
            other => AuthError::Store(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) => ApiError::Validation(err.to_string()),
            AuthError::InvalidCredentials | AuthError::Token(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Duplicate(_) | AuthError::Hash(_) | AuthError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Sign-up and sign-in on top of a credential store, the password hasher
/// and the token service.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: SaltedHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: SaltedHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Creates the account and returns its id. Empty fields are rejected
    /// before anything is hashed or stored.
    pub fn sign_up(&self, name: &str, username: &str, password: &str) -> Result<i64, AuthError> {
        for (field, value) in [("name", name), ("username", username), ("password", password)] {
            if value.is_empty() {
                return Err(AuthError::Validation(field));
            }
        }

        let password_hash = self.hasher.hash(password)?;
        let id = self.store.create_user(name, username, &password_hash)?;

        info!(user_id = id, username, "user signed up");
        Ok(id)
    }

    /// Returns a fresh token for the matching account.
    pub fn sign_in(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let password_hash = self.hasher.hash(password)?;

        let user = self
            .store
            .get_user(username, &password_hash)
            .map_err(|e| match e {
                DbError::NotFound => AuthError::InvalidCredentials,
                other => AuthError::from(other),
            })?;

        let token = self.tokens.issue(user.id)?;

        info!(user_id = user.id, "user signed in");
        Ok(token)
    }

    pub fn parse_token(&self, token: &str) -> Result<i64, TokenError> {
        self.tokens.parse(token)
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignUpRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = blocking(move || state.auth.sign_up(&req.name, &req.username, &req.password)).await?;
    Ok(Json(IdResponse { id }))
}

pub async fn sign_in(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignInRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = blocking(move || state.auth.sign_in(&req.username, &req.password)).await?;
    Ok(Json(TokenResponse { token }))
}
