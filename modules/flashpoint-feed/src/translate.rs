use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use flashpoint_common::FlashpointError;

/// On-demand text translation collaborator. Single request/response; the
/// caller treats any failure as "keep the original text".
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
        -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate-style HTTP translator.
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranslator {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        info!(source_lang, target_lang, chars = text.len(), "Translating");

        let body = serde_json::json!({
            "q": text,
            "source": source_lang,
            "target": target_lang,
            "format": "text",
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("Translation request failed")?;

        if !resp.status().is_success() {
            return Err(FlashpointError::Translation(format!(
                "upstream returned {}",
                resp.status()
            ))
            .into());
        }

        let data: TranslateResponse = resp
            .json()
            .await
            .context("Failed to parse translation response")?;

        Ok(data.translated_text)
    }
}

/// Rejects a second translation request for the same event while one is
/// still pending. Duplicates are dropped, never queued.
///
/// `begin` hands out an RAII permit and the id is released when the permit
/// drops, so a handler cancelled mid-request cannot leave its id stuck in
/// the pending set.
#[derive(Default)]
pub struct PendingGuard {
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl PendingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns None while a request for this id is already pending.
    pub fn begin(&self, id: &str) -> Option<PendingPermit> {
        let mut inflight = match self.inflight.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        if inflight.insert(id.to_string()) {
            Some(PendingPermit {
                inflight: Arc::clone(&self.inflight),
                id: id.to_string(),
            })
        } else {
            None
        }
    }
}

/// Marks one translation request as in flight until dropped.
pub struct PendingPermit {
    inflight: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for PendingPermit {
    fn drop(&mut self) {
        let mut inflight = match self.inflight.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        inflight.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_for_same_id_is_rejected_while_pending() {
        let guard = PendingGuard::new();
        let permit = guard.begin("evt-1");
        assert!(permit.is_some());
        assert!(guard.begin("evt-1").is_none());
        assert!(guard.begin("evt-2").is_some());

        drop(permit);
        assert!(guard.begin("evt-1").is_some());
    }

    #[tokio::test]
    async fn cancelled_request_releases_its_pending_id() {
        let guard = Arc::new(PendingGuard::new());

        let (acquired_tx, acquired_rx) = tokio::sync::oneshot::channel();
        let task_guard = Arc::clone(&guard);
        let task = tokio::spawn(async move {
            let _permit = task_guard.begin("evt-1").unwrap();
            let _ = acquired_tx.send(());
            std::future::pending::<()>().await;
        });

        acquired_rx.await.unwrap();
        assert!(guard.begin("evt-1").is_none());

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(guard.begin("evt-1").is_some());
    }
}
