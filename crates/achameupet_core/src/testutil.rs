//! crates/achameupet_core/src/testutil.rs
//!
//! In-memory fakes for the three collaborator ports, used by the service
//! tests in this crate.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::ports::{
    AuthIdentity, Document, DocumentStore, Filter, FilterOp, IdentityProvider, ObjectStore,
    PortError, PortResult, Query,
};

//=========================================================================================
// Document store fake
//=========================================================================================

#[derive(Default)]
pub(crate) struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self, collection: &str) -> bool {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(true, BTreeMap::is_empty)
    }
}

fn geo_pair(value: &Value) -> Option<(f64, f64)> {
    let lat = value.get("latitude")?.as_f64()?;
    let lng = value.get("longitude")?.as_f64()?;
    Some((lat, lng))
}

fn compare_scalars(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
        return a.partial_cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
        return Some(a.cmp(b));
    }
    None
}

fn matches(record: &Value, filter: &Filter) -> bool {
    let Some(actual) = record.get(&filter.field) else {
        return false;
    };

    match filter.op {
        FilterOp::Eq => actual == &filter.value,
        FilterOp::Gte | FilterOp::Lte => {
            // Geo-point bounds apply to both coordinates independently.
            if let (Some((lat, lng)), Some((bound_lat, bound_lng))) =
                (geo_pair(actual), geo_pair(&filter.value))
            {
                return match filter.op {
                    FilterOp::Gte => lat >= bound_lat && lng >= bound_lng,
                    _ => lat <= bound_lat && lng <= bound_lng,
                };
            }
            match compare_scalars(actual, &filter.value) {
                Some(ord) => match filter.op {
                    FilterOp::Gte => ord != Ordering::Less,
                    _ => ord != Ordering::Greater,
                },
                None => false,
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, record: Value) -> PortResult<String> {
        let id = format!("doc-{}", self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1);
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, record: Value) -> PortResult<()> {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> PortResult<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("{collection}/{id}")))
    }

    async fn query(&self, collection: &str, query: Query) -> PortResult<Vec<Document>> {
        let collections = self.collections.lock().unwrap();
        let mut docs: Vec<Document> = collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|(_, record)| query.filters.iter().all(|f| matches(record, f)))
            .map(|(id, record)| Document {
                id: id.clone(),
                record: record.clone(),
            })
            .collect();

        if let Some(order) = &query.order_by {
            docs.sort_by(|a, b| {
                let ord = match (a.record.get(&order.field), b.record.get(&order.field)) {
                    (Some(a), Some(b)) => compare_scalars(a, b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> PortResult<()> {
        let mut collections = self.collections.lock().unwrap();
        let record = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| PortError::NotFound(format!("{collection}/{id}")))?;

        if let (Some(target), Some(updates)) = (record.as_object_mut(), fields.as_object()) {
            for (key, value) in updates {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> PortResult<()> {
        self.collections
            .lock()
            .unwrap()
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("{collection}/{id}")))
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> PortResult<()> {
        let mut collections = self.collections.lock().unwrap();
        let record = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| PortError::NotFound(format!("{collection}/{id}")))?;

        if let Some(map) = record.as_object_mut() {
            let current = map.get(field).and_then(Value::as_i64).unwrap_or(0);
            map.insert(field.to_string(), json!(current + delta));
        }
        Ok(())
    }
}

//=========================================================================================
// Object store fake
//=========================================================================================

#[derive(Default)]
pub(crate) struct MemoryObjects {
    fail_everything: AtomicBool,
    fail_names: Mutex<HashSet<String>>,
}

impl MemoryObjects {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_all(&self) {
        self.fail_everything.store(true, AtomicOrdering::SeqCst);
    }

    pub(crate) fn fail_for(&self, name: &str) {
        self.fail_names.lock().unwrap().insert(name.to_string());
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn store(
        &self,
        _data: Bytes,
        _content_type: &str,
        suggested_name: &str,
    ) -> PortResult<String> {
        if self.fail_everything.load(AtomicOrdering::SeqCst)
            || self.fail_names.lock().unwrap().contains(suggested_name)
        {
            return Err(PortError::Upload(format!("simulated failure: {suggested_name}")));
        }
        Ok(format!("https://objects.test/{suggested_name}"))
    }
}

//=========================================================================================
// Identity provider fake
//=========================================================================================

#[derive(Default)]
pub(crate) struct MemoryIdentity {
    emails: Mutex<HashMap<String, String>>,
    tokens: Mutex<HashMap<String, AuthIdentity>>,
    claims: Mutex<HashMap<String, Value>>,
    next_id: AtomicU64,
}

impl MemoryIdentity {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mints a token the fake will accept for `subject_id`.
    pub(crate) fn issue_token(
        &self,
        subject_id: &str,
        display_name: Option<&str>,
        phone: Option<&str>,
    ) -> String {
        let token = format!("token-{}", self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1);
        let claims = self
            .claims
            .lock()
            .unwrap()
            .get(subject_id)
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();
        self.tokens.lock().unwrap().insert(
            token.clone(),
            AuthIdentity {
                subject_id: subject_id.to_string(),
                display_name: display_name.map(str::to_string),
                phone: phone.map(str::to_string),
                claims,
            },
        );
        token
    }

    pub(crate) fn claims_for(&self, subject_id: &str) -> Option<Value> {
        self.claims.lock().unwrap().get(subject_id).cloned()
    }

    pub(crate) fn identity_count(&self) -> usize {
        self.emails.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn verify_token(&self, token: &str) -> PortResult<AuthIdentity> {
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| PortError::InvalidToken("unknown token".to_string()))
    }

    async fn create_identity(
        &self,
        email: &str,
        _password: &str,
        _display_name: &str,
        _photo_url: Option<&str>,
    ) -> PortResult<String> {
        let mut emails = self.emails.lock().unwrap();
        if emails.contains_key(email) {
            return Err(PortError::EmailInUse(email.to_string()));
        }
        let subject_id = format!(
            "subject-{}",
            self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1
        );
        emails.insert(email.to_string(), subject_id.clone());
        Ok(subject_id)
    }

    async fn set_claims(&self, subject_id: &str, claims: Value) -> PortResult<()> {
        self.claims
            .lock()
            .unwrap()
            .insert(subject_id.to_string(), claims);
        Ok(())
    }
}
