use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    auth::dto::required,
    error::{AppError, AppResult},
    individuals::repo_types::{
        Individual, IndividualChanges, NewIndividual, TextColumn, DEFAULT_STATUS, STATUS_MAX_LEN,
    },
};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Empty strings are stored as NULL on create.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_length(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::validation(format!(
            "{field} is too long (at most {max} characters)"
        ))),
        _ => Ok(()),
    }
}

fn check_column(column: TextColumn, value: Option<&str>) -> AppResult<()> {
    match column.max_len() {
        Some(max) => check_length(column.field(), value, max),
        None => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndividualRequest {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub user_id: Option<i32>,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<String>,
    pub relationship_status: Option<String>,
    pub trust_reputation: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub occupation: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<String>,
    pub social_media_links: Option<String>,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
}

impl CreateIndividualRequest {
    pub fn into_new(self) -> AppResult<NewIndividual> {
        let (Some(name), Some(contact_info)) = (required(&self.name), required(&self.contact_info))
        else {
            return Err(AppError::validation("Name and contact info are required"));
        };
        let new = NewIndividual {
            name: name.to_string(),
            contact_info: contact_info.to_string(),
            user_id: self.user_id,
            profile_image_url: non_empty(self.profile_image_url),
            age: self.age,
            date_of_birth: non_empty(self.date_of_birth),
            relationship_status: non_empty(self.relationship_status),
            trust_reputation: non_empty(self.trust_reputation),
            status: non_empty(self.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            address: non_empty(self.address),
            city: non_empty(self.city),
            country: non_empty(self.country),
            phone: non_empty(self.phone),
            occupation: non_empty(self.occupation),
            bio: non_empty(self.bio),
            interests: non_empty(self.interests),
            social_media_links: non_empty(self.social_media_links),
            emergency_contact: non_empty(self.emergency_contact),
            notes: non_empty(self.notes),
        };

        check_length("status", Some(&new.status), STATUS_MAX_LEN)?;
        for (column, value) in [
            (TextColumn::DateOfBirth, &new.date_of_birth),
            (TextColumn::Phone, &new.phone),
            (TextColumn::RelationshipStatus, &new.relationship_status),
            (TextColumn::TrustReputation, &new.trust_reputation),
            (TextColumn::City, &new.city),
            (TextColumn::Country, &new.country),
        ] {
            check_column(column, value.as_deref())?;
        }
        Ok(new)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIndividualRequest {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub user_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profile_image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub relationship_status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub trust_reputation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub occupation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub interests: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub social_media_links: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub emergency_contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateIndividualRequest {
    pub fn into_changes(self) -> AppResult<IndividualChanges> {
        let non_blank = |field: &str, value: Option<String>| match value {
            Some(v) if v.trim().is_empty() => {
                Err(AppError::validation(format!("{field} cannot be empty")))
            }
            Some(v) => Ok(Some(v.trim().to_string())),
            None => Ok(None),
        };

        let text: Vec<_> = [
            (TextColumn::ProfileImageUrl, self.profile_image_url),
            (TextColumn::DateOfBirth, self.date_of_birth),
            (TextColumn::RelationshipStatus, self.relationship_status),
            (TextColumn::TrustReputation, self.trust_reputation),
            (TextColumn::Address, self.address),
            (TextColumn::City, self.city),
            (TextColumn::Country, self.country),
            (TextColumn::Phone, self.phone),
            (TextColumn::Occupation, self.occupation),
            (TextColumn::Bio, self.bio),
            (TextColumn::Interests, self.interests),
            (TextColumn::SocialMediaLinks, self.social_media_links),
            (TextColumn::EmergencyContact, self.emergency_contact),
            (TextColumn::Notes, self.notes),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect();
        for (column, value) in &text {
            check_column(*column, value.as_deref())?;
        }

        let status = non_blank("Status", self.status)?;
        check_length("status", status.as_deref(), STATUS_MAX_LEN)?;

        Ok(IndividualChanges {
            name: non_blank("Name", self.name)?,
            contact_info: non_blank("Contact info", self.contact_info)?,
            status,
            age: self.age,
            user_id: self.user_id,
            text,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IndividualResponse {
    pub message: String,
    pub individual: Individual,
}

#[derive(Debug, Default, Deserialize)]
pub struct DraftMessageRequest {
    /// What the message is for, e.g. "invite to dinner".
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedText {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_and_contact_info() {
        let req: CreateIndividualRequest = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert!(matches!(req.into_new(), Err(AppError::Validation(_))));

        let req: CreateIndividualRequest =
            serde_json::from_str(r#"{"name":"  ","contactInfo":"bob@x.com"}"#).unwrap();
        assert!(matches!(req.into_new(), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_defaults_status_and_nulls_empty_strings() {
        let req: CreateIndividualRequest = serde_json::from_str(
            r#"{"name":"Bob","contactInfo":"bob@x.com","city":"","age":31,"userId":4}"#,
        )
        .unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.status, "active");
        assert_eq!(new.city, None);
        assert_eq!(new.age, Some(31));
        assert_eq!(new.user_id, Some(4));
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let req: UpdateIndividualRequest =
            serde_json::from_str(r#"{"notes":"x","city":null}"#).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(
            changes.text,
            vec![
                (TextColumn::City, None),
                (TextColumn::Notes, Some("x".to_string())),
            ]
        );
        assert!(changes.name.is_none());
        assert!(changes.age.is_none());
        assert!(changes.user_id.is_none());
    }

    #[test]
    fn over_long_values_are_rejected() {
        let req: CreateIndividualRequest = serde_json::from_str(
            r#"{"name":"Bob","contactInfo":"b","phone":"+1 (555) 123-4567 ext. 890"}"#,
        )
        .unwrap();
        let err = req.into_new().unwrap_err();
        assert!(err.to_string().contains("phone"));

        let req: CreateIndividualRequest = serde_json::from_str(
            r#"{"name":"Bob","contactInfo":"b","status":"a-very-long-status-value"}"#,
        )
        .unwrap();
        assert!(matches!(req.into_new(), Err(AppError::Validation(_))));

        let req: UpdateIndividualRequest =
            serde_json::from_str(r#"{"dateOfBirth":"1990-01-01T00:00:00Z"}"#).unwrap();
        let err = req.into_changes().unwrap_err();
        assert!(err.to_string().contains("dateOfBirth"));
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        // 10 characters, 15 bytes
        let value = "Đà Nẵng ĐN";
        assert_eq!(value.chars().count(), 10);
        let req: UpdateIndividualRequest =
            serde_json::from_str(&format!(r#"{{"dateOfBirth":"{value}"}}"#)).unwrap();
        assert!(req.into_changes().is_ok());
    }

    #[test]
    fn update_can_unlink_owner() {
        let req: UpdateIndividualRequest = serde_json::from_str(r#"{"userId":null}"#).unwrap();
        assert_eq!(req.into_changes().unwrap().user_id, Some(None));
    }

    #[test]
    fn update_rejects_blank_required_fields() {
        let req: UpdateIndividualRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(matches!(req.into_changes(), Err(AppError::Validation(_))));
    }
}
