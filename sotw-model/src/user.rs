use serde::{Deserialize, Serialize};

use crate::ids::{SotwId, UserId};

/// Identity returned by the login, registration and current-user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub spotify_linked: bool,
    #[serde(default)]
    pub playlists: Option<Vec<UserPlaylist>>,
    /// Groups this user belongs to. The server sends full group objects;
    /// only the id (and name, when present) matter to the client.
    #[serde(default, alias = "memberList")]
    pub sotw_list: Vec<Membership>,
}

impl User {
    /// Whether the membership list contains `sotw_id`.
    pub fn is_member_of(&self, sotw_id: SotwId) -> bool {
        self.sotw_list.iter().any(|membership| membership.id == sotw_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: SotwId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPlaylist {
    pub id: String,
    pub playlist_link: String,
    pub sotw_id: SotwId,
    pub user_id: UserId,
}

/// Registration form. The same e-mail/password pair is reused for the
/// automatic login that follows a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterForm {
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials {
            username: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// OAuth2 password-form credentials; `username` carries the e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: email.into(),
            password: password.into(),
        }
    }

    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

/// Partial user update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify_linked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub new_password: String,
}

/// Authorization-code callback forwarded to the server to link Spotify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyAuthPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_membership_from_full_group_objects() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "email": "ada@example.com",
            "name": "Ada",
            "is_superuser": false,
            "spotify_linked": true,
            "playlists": null,
            "sotw_list": [
                {"id": 42, "name": "Office", "share_id": "abc", "created_at": "2024-01-01T00:00:00"}
            ]
        }))
        .unwrap();

        assert!(user.is_member_of(SotwId(42)));
        assert!(!user.is_member_of(SotwId(7)));
        assert_eq!(user.sotw_list[0].name.as_deref(), Some("Office"));
    }

    #[test]
    fn test_member_list_alias_with_string_ids() {
        let user: User = serde_json::from_value(json!({
            "id": "3",
            "email": "ada@example.com",
            "name": "Ada",
            "memberList": [{"id": "42"}]
        }))
        .unwrap();

        assert!(user.is_member_of(SotwId(42)));
    }

    #[test]
    fn test_user_update_skips_absent_fields() {
        let update = UserUpdate {
            name: Some("Grace".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"name": "Grace"}));
    }
}
