//! User repository

use crate::{
    error::AppError,
    models::user::{Account, NewAccount, NgoProfile, Profile, Role, VolunteerProfile},
    repository::AccountStore,
};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

const USERNAME_CONSTRAINT: &str = "users_username_key";

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, AppError> {
    let role: String = row.try_get("role")?;
    let role = role.parse::<Role>().map_err(|e| {
        tracing::error!("Corrupt role column: {}", e);
        AppError::Internal(e)
    })?;

    Ok(Account {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role,
    })
}

/// The unique constraint is the source of truth for username uniqueness
fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_CONSTRAINT) {
            return AppError::DuplicateUsername;
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl AccountStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let row = sqlx::query("SELECT id, username, password_hash, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.db)
            .await?
            .try_get(0)?;

        Ok(exists)
    }

    async fn create(&self, account: NewAccount, profile: Option<Profile>) -> Result<Account, AppError> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        let created = account_from_row(&row)?;

        match profile {
            Some(Profile::Ngo(ngo)) => {
                sqlx::query(
                    r#"
                    INSERT INTO ngo_details
                        (user_id, organization_name, registration_number, address, description, logo_url)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(created.id)
                .bind(&ngo.organization_name)
                .bind(&ngo.registration_number)
                .bind(&ngo.address)
                .bind(&ngo.description)
                .bind(&ngo.logo_url)
                .execute(&mut *tx)
                .await?;
            }
            Some(Profile::Volunteer(volunteer)) => {
                sqlx::query(
                    r#"
                    INSERT INTO volunteer_details
                        (user_id, full_name, phone, interests, profile_pic_url)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(created.id)
                .bind(&volunteer.full_name)
                .bind(&volunteer.phone)
                .bind(&volunteer.interests)
                .bind(&volunteer.profile_pic_url)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn find_profile(&self, user_id: i64) -> Result<Option<Profile>, AppError> {
        let ngo = sqlx::query_as::<_, NgoProfile>(
            r#"
            SELECT organization_name, registration_number, address, description, logo_url
            FROM ngo_details
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        if let Some(ngo) = ngo {
            return Ok(Some(Profile::Ngo(ngo)));
        }

        let volunteer = sqlx::query_as::<_, VolunteerProfile>(
            r#"
            SELECT full_name, phone, interests, profile_pic_url
            FROM volunteer_details
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(volunteer.map(Profile::Volunteer))
    }
}
