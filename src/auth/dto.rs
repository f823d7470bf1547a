use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{User, UserRole};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration. Fields are optional so missing
/// input is reported as a 400, not a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Base64 or data-URI encoded avatar image.
    pub photo_file: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            photo: u.photo,
        }
    }
}

/// Profile view, role included.
#[derive(Debug, Serialize)]
pub struct MeUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: UserRole,
}

impl From<User> for MeUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            photo: u.photo,
            role: u.role,
        }
    }
}

/// Response returned after registration. The token also travels in the
/// session cookie; it is echoed here for non-browser clients.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: MeUser,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            photo: "https://img.local/alice.png".into(),
            password_hash: "$argon2id$secret".into(),
            role: UserRole::User,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn accepts_common_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn register_request_accepts_partial_bodies() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.c"));
        assert!(req.name.is_none());
        assert!(req.password.is_none());
        assert!(req.photo_file.is_none());
    }

    #[test]
    fn register_request_reads_camel_case_photo_field() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"photoFile":"data:image/png;base64,aGk="}"#).unwrap();
        assert!(req.photo_file.is_some());
    }

    #[test]
    fn public_user_never_contains_password_hash() {
        let json = serde_json::to_string(&PublicUser::from(sample_user())).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn me_user_includes_role() {
        let json = serde_json::to_value(MeUser::from(sample_user())).unwrap();
        assert_eq!(json["role"], "user");
        assert!(!json.to_string().contains("password"));
    }
}
