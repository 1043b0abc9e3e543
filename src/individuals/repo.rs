use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    db::{like_pattern, PgStore},
    error::AppResult,
    individuals::repo_types::{Individual, IndividualChanges, NewIndividual, SEARCHABLE_COLUMNS},
};

/// Profile store.
///
/// Mutations take the caller's user id: a profile linked to a user can only
/// be changed by that user, an unlinked profile by anyone. A refused
/// mutation looks exactly like a missing row.
#[async_trait]
pub trait IndividualStore: Send + Sync {
    /// All profiles, or those with `search` in any searchable column
    /// (case-insensitive, literal).
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<Individual>>;
    async fn get(&self, id: i32) -> AppResult<Option<Individual>>;
    /// Fails with `Conflict` when `user_id` names no existing user.
    async fn create(&self, new: NewIndividual) -> AppResult<Individual>;
    async fn update(
        &self,
        id: i32,
        caller: i32,
        changes: IndividualChanges,
    ) -> AppResult<Option<Individual>>;
    async fn delete(&self, id: i32, caller: i32) -> AppResult<bool>;
}

const INDIVIDUAL_COLUMNS: &str = "id, user_id, name, contact_info, profile_image_url, age, \
     date_of_birth, relationship_status, trust_reputation, status, address, city, country, \
     phone, occupation, bio, interests, social_media_links, emergency_contact, notes, \
     created_at, updated_at";

const OWNED_BY_CALLER_OR_UNOWNED: &str = "(user_id IS NULL OR user_id = ";

fn search_clause() -> String {
    SEARCHABLE_COLUMNS
        .iter()
        .map(|c| format!("{c} ILIKE $1"))
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[async_trait]
impl IndividualStore for PgStore {
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<Individual>> {
        let rows = match search {
            Some(term) => {
                sqlx::query_as::<_, Individual>(&format!(
                    "SELECT {INDIVIDUAL_COLUMNS} FROM individuals WHERE {} ORDER BY id",
                    search_clause()
                ))
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Individual>(&format!(
                    "SELECT {INDIVIDUAL_COLUMNS} FROM individuals ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Individual>> {
        let row = sqlx::query_as::<_, Individual>(&format!(
            "SELECT {INDIVIDUAL_COLUMNS} FROM individuals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, new: NewIndividual) -> AppResult<Individual> {
        let row = sqlx::query_as::<_, Individual>(&format!(
            r#"
            INSERT INTO individuals (
                user_id, name, contact_info, profile_image_url, age, date_of_birth,
                relationship_status, trust_reputation, status, address, city, country,
                phone, occupation, bio, interests, social_media_links, emergency_contact, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {INDIVIDUAL_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.name)
        .bind(new.contact_info)
        .bind(new.profile_image_url)
        .bind(new.age)
        .bind(new.date_of_birth)
        .bind(new.relationship_status)
        .bind(new.trust_reputation)
        .bind(new.status)
        .bind(new.address)
        .bind(new.city)
        .bind(new.country)
        .bind(new.phone)
        .bind(new.occupation)
        .bind(new.bio)
        .bind(new.interests)
        .bind(new.social_media_links)
        .bind(new.emergency_contact)
        .bind(new.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        caller: i32,
        changes: IndividualChanges,
    ) -> AppResult<Option<Individual>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE individuals SET updated_at = now()");

        if let Some(name) = changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(contact_info) = changes.contact_info {
            qb.push(", contact_info = ").push_bind(contact_info);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ").push_bind(status);
        }
        if let Some(age) = changes.age {
            qb.push(", age = ").push_bind(age);
        }
        if let Some(user_id) = changes.user_id {
            qb.push(", user_id = ").push_bind(user_id);
        }
        for (column, value) in changes.text {
            qb.push(", ").push(column.column()).push(" = ").push_bind(value);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND ")
            .push(OWNED_BY_CALLER_OR_UNOWNED)
            .push_bind(caller)
            .push(")");
        qb.push(" RETURNING ").push(INDIVIDUAL_COLUMNS);

        let row = qb
            .build_query_as::<Individual>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32, caller: i32) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM individuals WHERE id = $1 AND {OWNED_BY_CALLER_OR_UNOWNED}$2)"
        ))
        .bind(id)
        .bind(caller)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
