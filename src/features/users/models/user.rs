use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// Database model for a driver profile
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub imageurl: Option<String>,
    /// JSON array of strings
    pub phonenumbers: Value,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `"First Last"`, falling back to the username
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            self.username.clone()
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn phone_numbers(&self) -> Vec<String> {
        self.phonenumbers
            .as_array()
            .map(|numbers| {
                numbers
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
