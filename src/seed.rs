use tracing::{error, info};

use crate::{
    auth::{password::hash_password, services::normalize_email},
    config::SeedConfig,
    error::AppResult,
    users::{
        repo::UserStore,
        repo_types::{NewUser, UserStatus},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

/// Creates the bootstrap admin account unless it already exists.
pub async fn seed_admin(users: &dyn UserStore, cfg: &SeedConfig) -> AppResult<SeedOutcome> {
    let email = normalize_email(&cfg.admin_email);
    if users.find_by_email(&email).await?.is_some() {
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let password_hash = hash_password(&cfg.admin_password)?;
    users
        .create(NewUser {
            name: cfg.admin_name.clone(),
            email,
            password_hash,
            status: UserStatus::Active,
        })
        .await?;
    Ok(SeedOutcome::Created)
}

/// Startup wrapper: a failed seed is logged and never stops the server.
pub async fn run(users: &dyn UserStore, cfg: &SeedConfig) {
    match seed_admin(users, cfg).await {
        Ok(SeedOutcome::Created) => info!(email = %cfg.admin_email, "admin account created"),
        Ok(SeedOutcome::AlreadyPresent) => {
            info!(email = %cfg.admin_email, "admin account already present")
        }
        Err(e) => error!(error = %e, "admin seed failed; continuing"),
    }
}
