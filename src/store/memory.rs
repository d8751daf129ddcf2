use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::debug;

use crate::record::{
    Abbreviation, AbbreviationId, AbbreviationPatch, NewAbbreviation, NewAccount,
    UniquenessCheck, UserAccount, UserId, UserSummary, ValidationErrors,
};
use crate::store::record_store::{sort_catalogue, RecordPredicate, RecordStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Abbreviation {0} not found")]
    NotFound(AbbreviationId),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Duplicate abbreviation id: {0}")]
    DuplicateId(AbbreviationId),
    #[error("Duplicate user id: {0}")]
    DuplicateUserId(UserId),
    #[error("Duplicate abbreviation: {0}")]
    DuplicateAbbreviation(String),
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),
    #[error("Identifier {0} is outside the issuable range")]
    IdOutOfRange(u64),
    #[error("No identifiers left to issue")]
    IdSpaceExhausted,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct Tables {
    abbreviations: BTreeMap<AbbreviationId, Abbreviation>,
    users: BTreeMap<UserId, UserAccount>,
    next_abbreviation_id: u64,
    next_user_id: u64,
}

impl Tables {
    fn issue_abbreviation_id(&mut self) -> Result<AbbreviationId, StoreError> {
        let raw = self.next_abbreviation_id.max(1);
        self.next_abbreviation_id = raw.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
        Ok(AbbreviationId::new(raw))
    }

    fn issue_user_id(&mut self) -> Result<UserId, StoreError> {
        let raw = self.next_user_id.max(1);
        self.next_user_id = raw.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
        Ok(UserId::new(raw))
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|account| account.email.eq_ignore_ascii_case(email))
    }
}

fn next_after(raw: u64) -> Result<u64, StoreError> {
    raw.checked_add(1).ok_or(StoreError::IdOutOfRange(raw))
}

// Uniqueness follows the catalogue's case-insensitive collation.
impl UniquenessCheck for Tables {
    fn abbreviation_taken(&self, text: &str, except: Option<AbbreviationId>) -> bool {
        let needle = text.to_lowercase();
        self.abbreviations
            .values()
            .any(|record| Some(record.id) != except && record.abbreviation.to_lowercase() == needle)
    }
}

/// In-process record store.
///
/// Reads take a shared lock, so concurrent exports never wait on each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().abbreviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: AbbreviationId) -> Option<Abbreviation> {
        self.read().abbreviations.get(&id).cloned()
    }

    /// Validate and store a new record owned by `owner`.
    pub fn create(
        &self,
        input: NewAbbreviation,
        owner: UserSummary,
    ) -> Result<Abbreviation, StoreError> {
        let mut tables = self.write();
        input.validate(&*tables)?;

        let id = tables.issue_abbreviation_id()?;
        let record = Abbreviation {
            id,
            abbreviation: input.abbreviation,
            meaning: input.meaning,
            description: input.description,
            category: input.category,
            user: owner,
            votes: Vec::new(),
            comments: Vec::new(),
        };
        tables.abbreviations.insert(id, record.clone());

        debug!(id = %id, "created abbreviation");
        Ok(record)
    }

    /// Apply a validated partial update; absent fields stay untouched.
    pub fn update(
        &self,
        id: AbbreviationId,
        patch: AbbreviationPatch,
    ) -> Result<Abbreviation, StoreError> {
        let mut tables = self.write();
        if !tables.abbreviations.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        patch.validate(id, &*tables)?;

        let record = tables
            .abbreviations
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        if let Some(abbreviation) = patch.abbreviation {
            record.abbreviation = abbreviation;
        }
        if let Some(meaning) = patch.meaning {
            record.meaning = meaning;
        }
        if let Some(category) = patch.category {
            record.category = category;
        }

        debug!(id = %id, "updated abbreviation");
        Ok(record.clone())
    }

    pub fn delete(&self, id: AbbreviationId) -> Result<Abbreviation, StoreError> {
        let removed = self
            .write()
            .abbreviations
            .remove(&id)
            .ok_or(StoreError::NotFound(id))?;
        debug!(id = %id, "deleted abbreviation");
        Ok(removed)
    }

    /// Load an existing, fully populated record (snapshots, fixtures).
    pub fn insert(&self, record: Abbreviation) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.abbreviations.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        if tables.abbreviation_taken(&record.abbreviation, None) {
            return Err(StoreError::DuplicateAbbreviation(record.abbreviation));
        }
        // The counter must stay above every loaded id.
        let after = next_after(record.id.get())?;
        tables.next_abbreviation_id = tables.next_abbreviation_id.max(after);
        tables.abbreviations.insert(record.id, record);
        Ok(())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<UserAccount> {
        self.read()
            .users
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn create_user(&self, account: NewAccount) -> Result<UserAccount, StoreError> {
        let mut tables = self.write();
        if tables.email_taken(&account.email) {
            return Err(StoreError::DuplicateEmail(account.email));
        }

        let id = tables.issue_user_id()?;
        let stored = UserAccount {
            id,
            name: account.name,
            email: account.email,
            role: account.role,
            password_hash: account.password_hash,
            email_verified_at: account.email_verified_at,
        };
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    /// Load an existing account row (snapshots, fixtures).
    pub fn insert_user(&self, account: UserAccount) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.users.contains_key(&account.id) {
            return Err(StoreError::DuplicateUserId(account.id));
        }
        if tables.email_taken(&account.email) {
            return Err(StoreError::DuplicateEmail(account.email));
        }
        let after = next_after(account.id.get())?;
        tables.next_user_id = tables.next_user_id.max(after);
        tables.users.insert(account.id, account);
        Ok(())
    }

    pub fn users(&self) -> Vec<UserAccount> {
        self.read().users.values().cloned().collect()
    }

    /// All records in id order.
    pub fn records(&self) -> Vec<Abbreviation> {
        self.read().abbreviations.values().cloned().collect()
    }
}

impl RecordStore for MemoryStore {
    fn query_abbreviations(&self, predicate: Option<RecordPredicate<'_>>) -> Vec<Abbreviation> {
        let tables = self.read();
        let mut matched: Vec<Abbreviation> = tables
            .abbreviations
            .values()
            .filter(|record| predicate.map_or(true, |p| p(*record)))
            .cloned()
            .collect();
        drop(tables);

        sort_catalogue(&mut matched);
        matched
    }

    fn categories(&self) -> Vec<String> {
        let categories: BTreeSet<String> = self
            .read()
            .abbreviations
            .values()
            .map(|record| record.category.clone())
            .collect();
        categories.into_iter().collect()
    }
}
