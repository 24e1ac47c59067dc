//! User entity - an account that joins challenges and checks in

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserTimezone};

/// User account. Password-less accounts sign in through an external identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub display_name: String,
    pub google_id: Option<String>,
    pub profile_photo: Option<String>,
    pub timezone: UserTimezone,
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User. Username and email are stored lowercased.
    pub fn new(id: Snowflake, username: &str, email: Option<&str>) -> Self {
        let now = Utc::now();
        let username = username.trim().to_lowercase();
        Self {
            id,
            display_name: username.clone(),
            username,
            email: email.map(|e| e.trim().to_lowercase()),
            password_hash: None,
            google_id: None,
            profile_photo: None,
            timezone: UserTimezone::UTC,
            total_points: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// First letter of the display name, uppercased, for avatar placeholders
    pub fn initial(&self) -> String {
        safe_initial(&self.display_name)
    }

    pub fn set_display_name(&mut self, display_name: String) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    pub fn set_timezone(&mut self, timezone: UserTimezone) {
        self.timezone = timezone;
        self.updated_at = Utc::now();
    }

    pub fn set_profile_photo(&mut self, url: Option<String>) {
        self.profile_photo = url;
        self.updated_at = Utc::now();
    }

    /// Attach an external identity, filling in the email when none is known yet.
    pub fn link_google(&mut self, subject: String, email: Option<&str>) {
        self.google_id = Some(subject);
        if self.email.is_none() {
            self.email = email.map(str::to_lowercase);
        }
        self.updated_at = Utc::now();
    }
}

/// First character of `name` uppercased, or `?` for an empty name
pub fn safe_initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes() {
        let user = User::new(Snowflake::new(1), " Alice ", Some("Alice@Example.COM"));
        assert_eq!(user.username, "alice");
        assert_eq!(user.display_name, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert!(!user.has_password());
        assert!(user.timezone.is_utc());
    }

    #[test]
    fn test_safe_initial() {
        assert_eq!(safe_initial("bob"), "B");
        assert_eq!(safe_initial("  émile"), "É");
        assert_eq!(safe_initial(""), "?");
    }

    #[test]
    fn test_link_google_keeps_existing_email() {
        let mut user = User::new(Snowflake::new(1), "carol", Some("carol@a.io"));
        user.link_google("sub-1".into(), Some("other@b.io"));
        assert_eq!(user.google_id.as_deref(), Some("sub-1"));
        assert_eq!(user.email.as_deref(), Some("carol@a.io"));

        let mut no_mail = User::new(Snowflake::new(2), "dave", None);
        no_mail.link_google("sub-2".into(), Some("Dave@B.io"));
        assert_eq!(no_mail.email.as_deref(), Some("dave@b.io"));
    }
}
