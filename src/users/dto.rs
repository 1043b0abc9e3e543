use serde::{Deserialize, Serialize};

use crate::{
    auth::services::{is_valid_email, normalize_email},
    error::{AppError, AppResult},
    users::repo_types::{PublicUser, UserChanges, UserStatus},
};

/// Account update. Anything besides name, email and status is ignored;
/// passwords cannot be changed here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> AppResult<UserChanges> {
        let name = match self.name {
            Some(n) if n.trim().is_empty() => {
                return Err(AppError::validation("Name cannot be empty"));
            }
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        let email = match self.email.as_deref().map(normalize_email) {
            Some(e) if !is_valid_email(&e) => return Err(AppError::validation("Invalid email")),
            other => other,
        };
        Ok(UserChanges {
            name,
            email,
            status: self.status,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_and_unknown_fields_are_ignored() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"name":"Ann","password":"hunter2","age":40}"#).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.name.as_deref(), Some("Ann"));
        assert!(changes.email.is_none());
        assert!(changes.status.is_none());
    }

    #[test]
    fn email_is_normalized_and_validated() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"email":" Ann@X.COM "}"#).unwrap();
        assert_eq!(req.into_changes().unwrap().email.as_deref(), Some("ann@x.com"));

        let req: UpdateUserRequest = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        assert!(matches!(req.into_changes(), Err(AppError::Validation(_))));
    }

    #[test]
    fn unknown_status_is_rejected_at_parse_time() {
        assert!(serde_json::from_str::<UpdateUserRequest>(r#"{"status":"banned"}"#).is_err());
    }
}
