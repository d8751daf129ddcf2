//! Administrator bootstrap.
//!
//! Accounts come from configuration and their passwords from the environment.
//! Seeding is idempotent: running it again skips every account whose email
//! already exists instead of duplicating or overwriting it.

use std::collections::BTreeMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::config::AdminSeed;
use crate::record::{NewAccount, Role, UserAccount};
use crate::store::{MemoryStore, StoreError};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("No password provided for {email}: environment variable {var} is unset or empty")]
    MissingSecret { email: String, var: String },
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Where bootstrap passwords come from.
pub trait SecretSource {
    fn secret(&self, name: &str) -> Option<String>;
}

/// Reads secrets from process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn secret(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl SecretSource for BTreeMap<String, String> {
    fn secret(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

pub fn hash_password(password: &str) -> Result<String, BootstrapError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BootstrapError::Hash(e.to_string()))
}

pub fn verify_password(account: &UserAccount, candidate: &str) -> bool {
    match PasswordHash::new(&account.password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Create the configured administrators that do not exist yet.
///
/// Every missing account's secret is checked before the first one is
/// written, so a misconfiguration leaves the store untouched.
pub fn seed_admins(
    store: &MemoryStore,
    admins: &[AdminSeed],
    secrets: &dyn SecretSource,
    now: NaiveDateTime,
) -> Result<SeedReport, BootstrapError> {
    let mut report = SeedReport::default();
    let mut pending = Vec::new();

    for admin in admins {
        if store.find_user_by_email(&admin.email).is_some() {
            report.skipped.push(admin.email.clone());
            continue;
        }
        let password = secrets
            .secret(&admin.password_env)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| BootstrapError::MissingSecret {
                email: admin.email.clone(),
                var: admin.password_env.clone(),
            })?;
        pending.push((admin, password));
    }

    for (admin, password) in pending {
        let account = NewAccount {
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: Role::Admin,
            password_hash: hash_password(&password)?,
            email_verified_at: Some(now),
        };
        store.create_user(account)?;
        report.created.push(admin.email.clone());
    }

    info!(
        created = report.created.len(),
        skipped = report.skipped.len(),
        "admin bootstrap finished"
    );
    Ok(report)
}
