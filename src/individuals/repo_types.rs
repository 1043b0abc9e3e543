use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Individual (contact) profile as stored and returned.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub contact_info: String,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<String>, // YYYY-MM-DD
    pub relationship_status: Option<String>,
    pub trust_reputation: Option<String>,
    pub status: String,
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
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated insert payload.
#[derive(Debug, Clone, Default)]
pub struct NewIndividual {
    pub user_id: Option<i32>,
    pub name: String,
    pub contact_info: String,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<String>,
    pub relationship_status: Option<String>,
    pub trust_reputation: Option<String>,
    pub status: String,
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

/// Nullable text columns of `individuals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColumn {
    ProfileImageUrl,
    DateOfBirth,
    RelationshipStatus,
    TrustReputation,
    Address,
    City,
    Country,
    Phone,
    Occupation,
    Bio,
    Interests,
    SocialMediaLinks,
    EmergencyContact,
    Notes,
}

impl TextColumn {
    pub fn column(self) -> &'static str {
        match self {
            Self::ProfileImageUrl => "profile_image_url",
            Self::DateOfBirth => "date_of_birth",
            Self::RelationshipStatus => "relationship_status",
            Self::TrustReputation => "trust_reputation",
            Self::Address => "address",
            Self::City => "city",
            Self::Country => "country",
            Self::Phone => "phone",
            Self::Occupation => "occupation",
            Self::Bio => "bio",
            Self::Interests => "interests",
            Self::SocialMediaLinks => "social_media_links",
            Self::EmergencyContact => "emergency_contact",
            Self::Notes => "notes",
        }
    }

    /// Name used in request bodies.
    pub fn field(self) -> &'static str {
        match self {
            Self::ProfileImageUrl => "profileImageUrl",
            Self::DateOfBirth => "dateOfBirth",
            Self::RelationshipStatus => "relationshipStatus",
            Self::TrustReputation => "trustReputation",
            Self::Address => "address",
            Self::City => "city",
            Self::Country => "country",
            Self::Phone => "phone",
            Self::Occupation => "occupation",
            Self::Bio => "bio",
            Self::Interests => "interests",
            Self::SocialMediaLinks => "socialMediaLinks",
            Self::EmergencyContact => "emergencyContact",
            Self::Notes => "notes",
        }
    }

    /// Character limit of the `VARCHAR(n)` columns; `None` for `TEXT`.
    pub fn max_len(self) -> Option<usize> {
        match self {
            Self::DateOfBirth => Some(10),
            Self::Phone => Some(20),
            Self::RelationshipStatus | Self::TrustReputation => Some(50),
            Self::City | Self::Country => Some(100),
            _ => None,
        }
    }
}

/// Partial update. Only the fields carried here are written; a present
/// `None` clears the column.
#[derive(Debug, Clone, Default)]
pub struct IndividualChanges {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub status: Option<String>,
    pub age: Option<Option<i32>>,
    pub user_id: Option<Option<i32>>,
    pub text: Vec<(TextColumn, Option<String>)>,
}

/// Columns matched by `?search=`.
pub const SEARCHABLE_COLUMNS: [&str; 10] = [
    "name",
    "contact_info",
    "address",
    "notes",
    "city",
    "country",
    "occupation",
    "interests",
    "social_media_links",
    "emergency_contact",
];

pub const DEFAULT_STATUS: &str = "active";
pub const STATUS_MAX_LEN: usize = 20;
