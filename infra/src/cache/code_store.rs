//! In-memory verification code store
//!
//! Holds two tables under one `tokio::sync::RwLock`:
//! - pending codes, replaced on every issuance and dropped on consumption
//! - issuance marks, which outlive the pending code so the resend cooldown
//!   still applies after a failed delivery or a consumed code
//!
//! Both tables are bounded by `max_entries`. Expired codes and marks whose
//! cooldown has elapsed are pruned whenever a save would hit that bound.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use nb_core::domain::entities::{CodeType, VerificationCode};
use nb_core::services::verification::CodeStore;

use crate::InfrastructureError;

/// Default upper bound on pending codes and on issuance marks
pub const DEFAULT_MAX_ENTRIES: usize = 100_000;

#[derive(Debug, Default)]
struct Tables {
    codes: HashMap<String, VerificationCode>,
    issued: HashMap<String, (CodeType, DateTime<Utc>)>,
}

impl Tables {
    /// Returns the number of pending codes removed
    fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.codes.len();
        self.codes.retain(|_, code| !code.is_expired_at(now));
        self.issued
            .retain(|_, (code_type, at)| *at + code_type.policy().rate_limit() > now);
        before - self.codes.len()
    }

    fn is_full(&self, key: &str, max_entries: usize) -> bool {
        (!self.codes.contains_key(key) && self.codes.len() >= max_entries)
            || (!self.issued.contains_key(key) && self.issued.len() >= max_entries)
    }
}

/// Process-local [`CodeStore`]
#[derive(Debug)]
pub struct InMemoryCodeStore {
    tables: RwLock<Tables>,
    max_entries: usize,
}

impl Default for InMemoryCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store refusing new recipients once `max_entries` live codes or
    /// cooldown marks are held
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            max_entries,
        }
    }

    /// Number of pending codes
    pub async fn len(&self) -> usize {
        self.tables.read().await.codes.len()
    }

    /// Number of issuance marks held for the resend cooldown
    pub async fn issued_len(&self) -> usize {
        self.tables.read().await.issued.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop expired codes and issuance marks whose cooldown has elapsed
    ///
    /// Returns the number of pending codes removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let removed = self.tables.write().await.prune(now);
        if removed > 0 {
            debug!(removed, "Purged expired verification codes");
        }
        removed
    }

    fn key(code_type: CodeType, recipient: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code_type.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(recipient.as_bytes());
        format!("vc:{:x}", hasher.finalize())
    }
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn save(&self, code: &VerificationCode) -> Result<(), String> {
        let key = Self::key(code.code_type, &code.recipient);
        let mut tables = self.tables.write().await;

        if tables.is_full(&key, self.max_entries) {
            let removed = tables.prune(Utc::now());
            debug!(removed, "Pruned verification code store at capacity");
        }
        if tables.is_full(&key, self.max_entries) {
            warn!(
                max_entries = self.max_entries,
                event = "code_store_full",
                "Refusing to store verification code"
            );
            return Err(InfrastructureError::Store(format!(
                "code store is full ({} entries)",
                self.max_entries
            ))
            .to_string());
        }

        tables
            .issued
            .insert(key.clone(), (code.code_type, code.created_at));
        tables.codes.insert(key, code.clone());
        Ok(())
    }

    async fn load(
        &self,
        code_type: CodeType,
        recipient: &str,
    ) -> Result<Option<VerificationCode>, String> {
        let tables = self.tables.read().await;
        Ok(tables.codes.get(&Self::key(code_type, recipient)).cloned())
    }

    async fn record_attempt(
        &self,
        code_type: CodeType,
        recipient: &str,
        id: Uuid,
    ) -> Result<Option<u32>, String> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .codes
            .get_mut(&Self::key(code_type, recipient))
            .filter(|code| code.id == id)
            .map(|code| {
                code.attempts = code.attempts.saturating_add(1);
                code.attempts
            }))
    }

    async fn consume(&self, code_type: CodeType, recipient: &str, id: Uuid) -> Result<bool, String> {
        let key = Self::key(code_type, recipient);
        let mut tables = self.tables.write().await;
        if tables.codes.get(&key).is_some_and(|code| code.id == id) {
            tables.codes.remove(&key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn remove(&self, code_type: CodeType, recipient: &str) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        tables.codes.remove(&Self::key(code_type, recipient));
        Ok(())
    }

    async fn last_issued_at(
        &self,
        code_type: CodeType,
        recipient: &str,
    ) -> Result<Option<DateTime<Utc>>, String> {
        let tables = self.tables.read().await;
        Ok(tables
            .issued
            .get(&Self::key(code_type, recipient))
            .map(|(_, at)| *at))
    }
}
