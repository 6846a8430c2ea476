//! crates/achameupet_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture: the core
//! never talks to the managed platform directly, only through these ports.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Failure modes shared by all port operations. Each concrete adapter maps its
/// own transport errors into these variants.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("email already in use: {0}")]
    EmailInUse(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Document Store
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Inclusive lower bound.
    Gte,
    /// Inclusive upper bound.
    Lte,
}

/// One predicate over a top-level document field.
///
/// `Gte`/`Lte` applied to a geo-point field bound both coordinates
/// independently, so a pair of them forms a conjunctive bounding box rather
/// than a circle.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &str, value: Value) -> Self {
        Self { field: field.to_string(), op: FilterOp::Eq, value }
    }

    pub fn gte(field: &str, value: Value) -> Self {
        Self { field: field.to_string(), op: FilterOp::Gte, value }
    }

    pub fn lte(field: &str, value: Value) -> Self {
        Self { field: field.to_string(), op: FilterOp::Lte, value }
    }
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(field: &str) -> Self {
        Self { field: field.to_string(), descending: true }
    }
}

/// A collection query: filters are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

/// A record together with its store-assigned identifier.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub record: Value,
}

/// Collection-scoped CRUD against the managed document database. Records are
/// plain JSON objects; single-document writes are applied atomically by the
/// store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a record and returns the assigned identifier.
    async fn add(&self, collection: &str, record: Value) -> PortResult<String>;

    /// Writes a record at a caller-chosen identifier, replacing any previous
    /// content.
    async fn set(&self, collection: &str, id: &str, record: Value) -> PortResult<()>;

    async fn get(&self, collection: &str, id: &str) -> PortResult<Value>;

    async fn query(&self, collection: &str, query: Query) -> PortResult<Vec<Document>>;

    /// Merges the given top-level fields into an existing record. Fails with
    /// `NotFound` when the record does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> PortResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> PortResult<()>;

    /// Server-side atomic counter increment. Never read-modify-write: the
    /// store applies the delta, so concurrent increments cannot be lost.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> PortResult<()>;
}

//=========================================================================================
// Object Store
//=========================================================================================

/// Binary blob persistence. Returns a public URL per stored object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn store(
        &self,
        data: Bytes,
        content_type: &str,
        suggested_name: &str,
    ) -> PortResult<String>;
}

//=========================================================================================
// Identity Provider
//=========================================================================================

/// The identity resolved from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub subject_id: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    /// Custom claims attached via `set_claims`.
    pub claims: serde_json::Map<String, Value>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a bearer token and returns the identity it carries. Fails
    /// with `InvalidToken` for missing, malformed, or expired tokens.
    async fn verify_token(&self, token: &str) -> PortResult<AuthIdentity>;

    /// Creates a new identity and returns its subject id. Fails with
    /// `EmailInUse` when the address is already registered.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        photo_url: Option<&str>,
    ) -> PortResult<String>;

    /// Attaches custom claims to an identity; they surface in subsequently
    /// issued tokens.
    async fn set_claims(&self, subject_id: &str, claims: Value) -> PortResult<()>;
}
