//! crates/achameupet_core/src/community.rs
//!
//! Community board messages and per-user alerts. Both are thin lifecycles
//! over the document store: create with defaults, list newest first.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::{Alert, AlertKind, BoardPost, Caller};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::{DocumentStore, Filter, OrderBy, Query};
use crate::record::{from_document, to_record};

pub const BOARD_COLLECTION: &str = "mural";
pub const ALERT_COLLECTION: &str = "alertas";

pub const PUBLIC_VISIBILITY: &str = "publico";

#[derive(Debug, Clone, Default)]
pub struct BoardPostDraft {
    pub title: Option<String>,
    pub body: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn DocumentStore>,
}

impl BoardService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn post(&self, caller: &Caller, draft: &BoardPostDraft) -> ServiceResult<BoardPost> {
        let mut errors = Vec::new();
        let title = match draft.title.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("titulo is required".to_string());
                String::new()
            }
            Some(s) => s.to_string(),
        };
        let body = match draft.body.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("conteudo is required".to_string());
                String::new()
            }
            Some(s) => s.to_string(),
        };
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let mut post = BoardPost {
            id: String::new(),
            title,
            body,
            owner_id: caller.id.clone(),
            posted_at: Utc::now(),
            visibility: draft
                .visibility
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(PUBLIC_VISIBILITY)
                .to_string(),
        };

        post.id = self.store.add(BOARD_COLLECTION, to_record(&post)?).await?;
        Ok(post)
    }

    /// All messages, newest first, optionally narrowed to one author.
    pub async fn list(&self, owner_id: Option<&str>) -> ServiceResult<Vec<BoardPost>> {
        let filters = match owner_id {
            Some(owner) => vec![Filter::eq("usuarioId", json!(owner))],
            None => Vec::new(),
        };

        let docs = self
            .store
            .query(
                BOARD_COLLECTION,
                Query {
                    filters,
                    order_by: Some(OrderBy::desc("dataPostagem")),
                    limit: None,
                },
            )
            .await?;

        docs.into_iter().map(from_document).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertDraft {
    pub kind: Option<String>,
    pub message: Option<String>,
    pub listing_id: Option<String>,
}

#[derive(Clone)]
pub struct AlertService {
    store: Arc<dyn DocumentStore>,
}

impl AlertService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &Caller, draft: &AlertDraft) -> ServiceResult<Alert> {
        let mut errors = Vec::new();
        let kind = match draft.kind.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("tipo is required".to_string());
                AlertKind::Security
            }
            Some(s) => AlertKind::parse(s).unwrap_or_else(|| {
                errors.push("tipo must be one of: Seguranca, PossivelMatch".to_string());
                AlertKind::Security
            }),
        };
        let message = match draft.message.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("mensagem is required".to_string());
                String::new()
            }
            Some(s) => s.to_string(),
        };
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let mut alert = Alert {
            id: String::new(),
            kind,
            message,
            listing_id: draft
                .listing_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            owner_id: caller.id.clone(),
            created_at: Utc::now(),
            read: false,
        };

        alert.id = self.store.add(ALERT_COLLECTION, to_record(&alert)?).await?;
        Ok(alert)
    }

    /// The caller's alerts, newest first.
    pub async fn list_for(&self, owner_id: &str) -> ServiceResult<Vec<Alert>> {
        let docs = self
            .store
            .query(
                ALERT_COLLECTION,
                Query {
                    filters: vec![Filter::eq("usuarioId", json!(owner_id))],
                    order_by: Some(OrderBy::desc("data")),
                    limit: None,
                },
            )
            .await?;

        docs.into_iter().map(from_document).collect()
    }
}
