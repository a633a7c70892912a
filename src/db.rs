// src/db.rs
use async_trait::async_trait;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

use crate::{
    config::{AppConfig, StoreBackend},
    errors::StoreError,
    models::member::Member,
};

/// Seluruh data keluarga disimpan di bawah satu key ini.
pub const FAMILY_KEY: &str = "family";

/// Whole-collection persistence. Every save replaces the stored list.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Member>, StoreError>;
    async fn save(&self, members: &[Member]) -> Result<(), StoreError>;
}

pub async fn establish_store(config: &AppConfig) -> Result<Arc<dyn MemberStore>, StoreError> {
    match &config.store {
        StoreBackend::Firebase {
            database_url,
            auth_token,
        } => {
            let store =
                FirebaseStore::new(database_url, auth_token.clone(), config.store_timeout)?;
            log::info!("memakai Firebase store di {}", database_url);
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            log::warn!("memakai in-memory store, data hilang saat restart");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

/// Firebase Realtime Database over its REST API.
pub struct FirebaseStore {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl FirebaseStore {
    pub fn new(
        database_url: &str,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Http)?;

        Ok(Self {
            client,
            url: format!("{}/{}.json", database_url.trim_end_matches('/'), FAMILY_KEY),
            auth_token,
            timeout,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, &self.url);
        match &self.auth_token {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        }
    }

    fn map_http(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout.as_secs())
        } else {
            StoreError::Http(err)
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::error!("Firebase membalas {}: {}", status, body);
        Err(StoreError::Status {
            code: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MemberStore for FirebaseStore {
    async fn load(&self) -> Result<Vec<Member>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .send()
            .await
            .map_err(|e| self.map_http(e))?;
        let response = self.check(response).await?;
        let text = response.text().await.map_err(|e| self.map_http(e))?;

        decode_family(serde_json::from_str(&text)?)
    }

    async fn save(&self, members: &[Member]) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::PUT)
            .json(members)
            .send()
            .await
            .map_err(|e| self.map_http(e))?;
        self.check(response).await?;
        log::debug!("{} anggota tersimpan ke Firebase", members.len());
        Ok(())
    }
}

/// Decodes the raw value stored under [`FAMILY_KEY`].
///
/// Firebase returns `null` for an empty node, may leave `null` holes in
/// arrays, and turns sparse arrays into objects keyed by index.
pub fn decode_family(value: Value) -> Result<Vec<Member>, StoreError> {
    let entries: Vec<Value> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.cmp(b),
            });
            pairs.into_iter().map(|(_, v)| v).collect()
        }
        other => {
            return Err(StoreError::Decode(serde::de::Error::custom(format!(
                "expected a list of members, got {}",
                other
            ))));
        }
    };

    entries
        .into_iter()
        .filter(|entry| !entry.is_null())
        .map(|entry| serde_json::from_value(entry).map_err(StoreError::from))
        .collect()
}

/// In-process store, used when `STORE_BACKEND=memory` and in tests.
#[derive(Default)]
pub struct MemoryStore {
    members: RwLock<Vec<Member>>,
}

impl MemoryStore {
    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members: RwLock::new(members),
        }
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.members.read().await.clone())
    }

    async fn save(&self, members: &[Member]) -> Result<(), StoreError> {
        *self.members.write().await = members.to_vec();
        Ok(())
    }
}
