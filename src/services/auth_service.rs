//! Authentication service: signin, signup, username checks

use crate::{
    auth::{jwt::TokenCodec, password::PasswordHasher},
    config::AppConfig,
    error::AppError,
    models::{
        auth::SigninResponse,
        user::{Account, NewAccount, Profile, Role, SignupRequest},
    },
    repository::AccountStore,
};
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
    config: Arc<AppConfig>,
    // verified against when the username is unknown, so both failure paths cost the same
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        codec: Arc<TokenCodec>,
        hasher: PasswordHasher,
        config: Arc<AppConfig>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash("clearaid-unknown-account")?;

        Ok(Self {
            accounts,
            codec,
            hasher,
            config,
            dummy_hash,
        })
    }

    /// Exchange credentials for a token.
    /// Unknown user and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<SigninResponse, AppError> {
        let Some(account) = self.accounts.find_by_username(username).await? else {
            let _ = self.hasher.verify(password, &self.dummy_hash);
            tracing::warn!(username = %username, "Signin failed");
            return Err(AppError::InvalidCredentials);
        };

        if let Err(e) = self.hasher.verify(password, &account.password_hash) {
            tracing::warn!(username = %username, "Signin failed");
            return Err(e);
        }

        let token = self.codec.issue(&account.username, account.id, account.role)?;

        tracing::info!(user_id = account.id, role = %account.role, "User signed in");

        Ok(SigninResponse {
            token,
            role: account.role,
        })
    }

    /// Create an account with its role profile
    pub async fn register(&self, req: SignupRequest) -> Result<Account, AppError> {
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.config)?;

        if req.role == Role::Admin && !self.config.security.allow_admin_signup {
            tracing::warn!(username = %req.username, "Rejected self-service admin signup");
            return Err(AppError::Forbidden);
        }

        let profile = req.profile();
        let password_hash = self.hasher.hash(&req.password)?;

        let account = self
            .accounts
            .create(
                NewAccount {
                    username: req.username,
                    password_hash,
                    role: req.role,
                },
                profile,
            )
            .await?;

        tracing::info!(user_id = account.id, role = %account.role, "User registered");

        Ok(account)
    }

    /// `true` when the username is already taken
    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        self.accounts.exists_by_username(username).await
    }

    pub async fn account(&self, user_id: i64) -> Result<(Account, Option<Profile>), AppError> {
        let account = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        let profile = self.accounts.find_profile(user_id).await?;

        Ok((account, profile))
    }
}
