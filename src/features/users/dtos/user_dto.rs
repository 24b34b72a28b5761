use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::users::models::User;
use crate::shared::types::PaginationQuery;

/// Profile fields pushed by the client after sign-in
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SyncUserDto {
    #[validate(length(max = 128, message = "Username must not exceed 128 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 128, message = "First name must not exceed 128 characters"))]
    pub firstname: Option<String>,

    #[validate(length(max = 128, message = "Last name must not exceed 128 characters"))]
    pub lastname: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub imageurl: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 phone numbers"))]
    pub phonenumbers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponseDto {
    pub user_id: String,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub full_name: Option<String>,
    pub imageurl: Option<String>,
    pub phonenumbers: Vec<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            phonenumbers: user.phone_numbers(),
            user_id: user.user_id,
            username: user.username,
            firstname: user.firstname,
            lastname: user.lastname,
            imageurl: user.imageurl,
            is_blocked: user.is_blocked,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Query params for the super-admin user list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Matched against user id, username, first and last name
    pub search: Option<String>,
    /// Page number (1-indexed, default: 1)
    #[param(minimum = 1)]
    pub page: Option<i64>,
    /// Items per page (default: 20, max: 100)
    #[param(minimum = 1, maximum = 100)]
    pub page_size: Option<i64>,
}

impl UserListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        let defaults = PaginationQuery::default();
        PaginationQuery {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_huge_page() {
        let query = UserListQuery {
            search: Some("  ".to_string()),
            page: None,
            page_size: None,
        };
        assert_eq!(query.pagination().offset(), 0);
        assert!(query.search_term().is_none());

        let query = UserListQuery {
            search: None,
            page: Some(i64::MAX),
            page_size: Some(20),
        };
        assert_eq!(query.pagination().offset(), i64::MAX);
    }
}
