//! HTTP implementation of [`EntryRepository`].
//!
//! Maps each operation onto the store's REST surface (`/entries`, `/entries/search`,
//! `/entries/{id}`) and folds transport and status failures into [`BabelError`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{EntryRepository, StoreStatus};
use crate::config::RemoteConfig;
use crate::entry::{Entry, EntryDraft, EntryId, TypeFilter};
use crate::error::{BabelError, Result};

/// Whether a 400/422 should read as a rejected payload (`Write`) or not (`Read`).
/// `DELETE` carries no payload, so it counts as `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Read,
    Write,
}

/// Entry store reached over HTTP.
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    /// Build a client bounded by `config.timeout_secs`.
    pub fn new(config: &RemoteConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid store URL: {}", config.base_url))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "store URL cannot carry paths: {}",
            config.base_url
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        tracing::info!(
            url = %base_url,
            timeout_secs = config.timeout_secs,
            "entry store client ready"
        );

        Ok(Self { client, base_url })
    }

    /// `base_url` extended by `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn entry_url(&self, id: &EntryId) -> Url {
        self.endpoint(&["entries", id.as_str()])
    }
}

fn transport_error(err: reqwest::Error) -> BabelError {
    if err.is_timeout() {
        BabelError::Transport(format!("request timed out: {err}"))
    } else {
        BabelError::Transport(err.to_string())
    }
}

/// Pull FastAPI-style `{"detail": ...}` out of an error body, else return it raw.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.trim().to_string(),
    }
}

/// Turn a non-2xx response into the matching [`BabelError`].
async fn check_status(response: Response, op: Op, target: Option<&EntryId>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(status = status.as_u16(), %message, "store rejected request");

    match (status, target) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(BabelError::NotFound(id.clone())),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) if op == Op::Write => {
            Err(BabelError::Validation(message))
        }
        _ => Err(BabelError::Server {
            status: status.as_u16(),
            message,
        }),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            transport_error(e)
        } else {
            BabelError::Server {
                status,
                message: format!("malformed response body: {e}"),
            }
        }
    })
}

#[async_trait]
impl EntryRepository for HttpRepository {
    #[instrument(skip(self), fields(component = "repository", op = "list"))]
    async fn list_all(&self) -> Result<Vec<Entry>> {
        let response = self
            .client
            .get(self.endpoint(&["entries"]))
            .send()
            .await
            .map_err(transport_error)?;
        let entries: Vec<Entry> = decode(check_status(response, Op::Read, None).await?).await?;
        debug!(count = entries.len(), "listed entries");
        Ok(entries)
    }

    #[instrument(skip(self), fields(component = "repository", op = "search"))]
    async fn search(&self, term: &str, filter: TypeFilter) -> Result<Vec<Entry>> {
        let mut url = self.endpoint(&["entries", "search"]);
        url.query_pairs_mut()
            .append_pair("q", term)
            .append_pair("type_filter", filter.as_str());

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let entries: Vec<Entry> = decode(check_status(response, Op::Read, None).await?).await?;
        debug!(count = entries.len(), "searched entries");
        Ok(entries)
    }

    #[instrument(skip(self, draft), fields(component = "repository", op = "create", entry_type = %draft.entry_type))]
    async fn create(&self, draft: &EntryDraft) -> Result<Entry> {
        let response = self
            .client
            .post(self.endpoint(&["entries"]))
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        let entry: Entry = decode(check_status(response, Op::Write, None).await?).await?;
        debug!(id = %entry.id, "created entry");
        Ok(entry)
    }

    #[instrument(skip(self, draft), fields(component = "repository", op = "update"))]
    async fn update(&self, id: &EntryId, draft: &EntryDraft) -> Result<Entry> {
        let response = self
            .client
            .put(self.entry_url(id))
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        decode(check_status(response, Op::Write, Some(id)).await?).await
    }

    #[instrument(skip(self), fields(component = "repository", op = "delete"))]
    async fn delete(&self, id: &EntryId) -> Result<()> {
        let response = self
            .client
            .delete(self.entry_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, Op::Read, Some(id)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(component = "repository", op = "health"))]
    async fn health(&self) -> Result<StoreStatus> {
        let root = self.base_url.join("/").unwrap_or_else(|_| self.base_url.clone());
        let response = self.client.get(root).send().await.map_err(transport_error)?;
        decode(check_status(response, Op::Read, None).await?).await
    }
}
