use serde_json::Value;
use sqlx::PgPool;

use crate::core::database::contains_pattern;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{SyncUserDto, UserListQuery, UserResponseDto};
use crate::features::users::models::User;

/// Driver profiles and moderation
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or refresh the caller's profile. The blocked flag is never touched here.
    pub async fn sync(&self, user: &AuthenticatedUser, dto: SyncUserDto) -> Result<UserResponseDto> {
        let phonenumbers = Value::from(dto.phonenumbers);

        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, username, firstname, lastname, imageurl, phonenumbers)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                firstname = EXCLUDED.firstname,
                lastname = EXCLUDED.lastname,
                imageurl = EXCLUDED.imageurl,
                phonenumbers = EXCLUDED.phonenumbers,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&user.sub)
        .bind(dto.username)
        .bind(dto.firstname)
        .bind(dto.lastname)
        .bind(dto.imageurl)
        .bind(phonenumbers)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sync user {}: {:?}", user.sub, e);
            AppError::Database(e)
        })?;

        tracing::info!("User profile synced: user_id={}", row.user_id);
        Ok(row.into())
    }

    /// Newest first, optionally narrowed by a search term
    pub async fn list(&self, query: &UserListQuery) -> Result<(Vec<UserResponseDto>, i64)> {
        let pattern = query.search_term().map(contains_pattern);
        let pagination = query.pagination();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE $1::text IS NULL
               OR user_id ILIKE $1 OR username ILIKE $1
               OR firstname ILIKE $1 OR lastname ILIKE $1
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count users: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE $1::text IS NULL
               OR user_id ILIKE $1 OR username ILIKE $1
               OR firstname ILIKE $1 OR lastname ILIKE $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Flip the blocked flag and return the updated profile
    pub async fn toggle_block(&self, user_id: &str) -> Result<UserResponseDto> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET is_blocked = NOT is_blocked, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to toggle block for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", user_id)))?;

        tracing::info!(
            "User {} is now {}",
            row.user_id,
            if row.is_blocked { "blocked" } else { "unblocked" }
        );
        Ok(row.into())
    }

    /// Reject blocked users. Drivers without a synced profile are let through.
    pub async fn ensure_not_blocked(&self, user_id: &str) -> Result<()> {
        let blocked: Option<bool> =
            sqlx::query_scalar("SELECT is_blocked FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        if blocked == Some(true) {
            tracing::warn!("Blocked user {} attempted a write", user_id);
            return Err(AppError::Forbidden(
                "Your account has been blocked. Contact an administrator.".to_string(),
            ));
        }
        Ok(())
    }
}
