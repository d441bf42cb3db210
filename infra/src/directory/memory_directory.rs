//! In-memory account directory

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use nb_core::domain::entities::Channel;
use nb_core::services::verification::UserDirectory;
use nb_shared::email::normalize_email;
use nb_shared::phone::normalize_phone_number;

/// Registered emails and phone numbers, normalized on insert and lookup
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    emails: RwLock<HashSet<String>>,
    phones: RwLock<HashSet<String>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_email(&self, email: &str) {
        self.emails.write().await.insert(normalize_email(email));
    }

    pub async fn add_phone(&self, phone: &str) {
        self.phones.write().await.insert(normalize_phone_number(phone));
    }

    pub async fn remove_email(&self, email: &str) -> bool {
        self.emails.write().await.remove(&normalize_email(email))
    }

    pub async fn remove_phone(&self, phone: &str) -> bool {
        self.phones.write().await.remove(&normalize_phone_number(phone))
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn recipient_exists(&self, channel: Channel, recipient: &str) -> Result<bool, String> {
        let exists = match channel {
            Channel::Email => self.emails.read().await.contains(&normalize_email(recipient)),
            Channel::Sms => self
                .phones
                .read()
                .await
                .contains(&normalize_phone_number(recipient)),
        };
        Ok(exists)
    }
}
