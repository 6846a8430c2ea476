//! services/api/src/adapters/firestore.rs
//!
//! This module contains the document-database adapter, the concrete
//! implementation of the `DocumentStore` port against the managed platform's
//! Firestore REST API. It translates between plain JSON records and the
//! API's typed value encoding, builds structured queries for the bounding-box
//! filters, and issues field-transform commits for atomic increments.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use achameupet_core::ports::{
    Document, DocumentStore, FilterOp, PortError, PortResult, Query,
};

const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

/// A document-store adapter backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    /// `projects/{project}/databases/(default)/documents`
    root: String,
    /// `{endpoint}/{root}`
    base_url: String,
    token: Option<String>,
}

impl FirestoreStore {
    pub fn new(client: reqwest::Client, project_id: &str, token: Option<String>) -> Self {
        Self::with_endpoint(client, project_id, token, DEFAULT_ENDPOINT)
    }

    /// Points the adapter at a different endpoint (a local emulator).
    pub fn with_endpoint(
        client: reqwest::Client,
        project_id: &str,
        token: Option<String>,
        endpoint: &str,
    ) -> Self {
        let root = format!("projects/{project_id}/databases/(default)/documents");
        let base_url = format!("{endpoint}/{root}");
        Self {
            client,
            root,
            base_url,
            token,
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn read_response(resp: reqwest::Response, context: &str) -> PortResult<Value> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PortError::Unavailable(format!("{context}: {e}")))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(context.to_string()));
        }
        // Conditional writes against a missing document surface as a failed
        // precondition rather than a plain 404.
        if !status.is_success() && body.contains("FAILED_PRECONDITION") {
            return Err(PortError::NotFound(context.to_string()));
        }
        if !status.is_success() {
            return Err(PortError::Unavailable(format!("{context}: {status} {body}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| PortError::Unavailable(format!("{context}: bad response body: {e}")))
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.base_url)
    }

    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.root)
    }
}

//=========================================================================================
// JSON <-> typed value encoding
//=========================================================================================

/// Returns the coordinates when a JSON object is a geo point
/// (`{latitude, longitude}` and nothing else).
fn as_geo_point(map: &Map<String, Value>) -> Option<(f64, f64)> {
    if map.len() != 2 {
        return None;
    }
    let lat = map.get("latitude")?.as_f64()?;
    let lng = map.get("longitude")?.as_f64()?;
    Some((lat, lng))
}

fn to_fire_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_fire_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => match as_geo_point(map) {
            Some((lat, lng)) => json!({
                "geoPointValue": { "latitude": lat, "longitude": lng }
            }),
            None => json!({
                "mapValue": { "fields": to_fire_fields(map) }
            }),
        },
    }
}

fn to_fire_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_fire_value(v)))
        .collect()
}

fn from_fire_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
        return json!(s);
    }
    if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
        return json!(b);
    }
    if let Some(i) = map.get("integerValue") {
        // Integers arrive as decimal strings.
        if let Some(parsed) = i.as_str().and_then(|s| s.parse::<i64>().ok()) {
            return json!(parsed);
        }
    }
    if let Some(d) = map.get("doubleValue").and_then(Value::as_f64) {
        return json!(d);
    }
    if let Some(ts) = map.get("timestampValue").and_then(Value::as_str) {
        return json!(ts);
    }
    if let Some(geo) = map.get("geoPointValue").and_then(Value::as_object) {
        return json!({
            "latitude": geo.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
            "longitude": geo.get("longitude").and_then(Value::as_f64).unwrap_or(0.0),
        });
    }
    if let Some(items) = map
        .get("arrayValue")
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
    {
        return Value::Array(items.iter().map(from_fire_value).collect());
    }
    if let Some(fields) = map
        .get("mapValue")
        .and_then(|m| m.get("fields"))
        .and_then(Value::as_object)
    {
        return Value::Object(from_fire_fields(fields));
    }
    Value::Null
}

fn from_fire_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), from_fire_value(v)))
        .collect()
}

fn record_to_fields(record: &Value) -> Map<String, Value> {
    record.as_object().map(to_fire_fields).unwrap_or_default()
}

fn document_record(doc: &Value) -> Value {
    doc.get("fields")
        .and_then(Value::as_object)
        .map(|fields| Value::Object(from_fire_fields(fields)))
        .unwrap_or_else(|| json!({}))
}

fn document_id(doc: &Value) -> Option<String> {
    doc.get("name")?
        .as_str()?
        .rsplit('/')
        .next()
        .map(str::to_string)
}

fn filter_op_name(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "EQUAL",
        FilterOp::Gte => "GREATER_THAN_OR_EQUAL",
        FilterOp::Lte => "LESS_THAN_OR_EQUAL",
    }
}

fn structured_query(collection: &str, query: &Query) -> Value {
    let mut body = json!({
        "from": [{ "collectionId": collection }],
    });

    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|f| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": f.field },
                    "op": filter_op_name(f.op),
                    "value": to_fire_value(&f.value),
                }
            })
        })
        .collect();
    match filters.len() {
        0 => {}
        1 => body["where"] = filters.into_iter().next().unwrap_or_default(),
        _ => {
            body["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": filters }
            })
        }
    }

    if let Some(order) = &query.order_by {
        body["orderBy"] = json!([{
            "field": { "fieldPath": order.field },
            "direction": if order.descending { "DESCENDING" } else { "ASCENDING" },
        }]);
    }
    if let Some(limit) = query.limit {
        body["limit"] = json!(limit);
    }

    json!({ "structuredQuery": body })
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn add(&self, collection: &str, record: Value) -> PortResult<String> {
        let url = format!("{}/{collection}", self.base_url);
        let resp = self
            .authorize(self.client.post(&url))
            .json(&json!({ "fields": record_to_fields(&record) }))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("add {collection}: {e}")))?;

        let doc = Self::read_response(resp, &format!("add {collection}")).await?;
        document_id(&doc)
            .ok_or_else(|| PortError::Unavailable(format!("add {collection}: no document name")))
    }

    async fn set(&self, collection: &str, id: &str, record: Value) -> PortResult<()> {
        let resp = self
            .authorize(self.client.patch(self.doc_url(collection, id)))
            .json(&json!({ "fields": record_to_fields(&record) }))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("set {collection}/{id}: {e}")))?;

        Self::read_response(resp, &format!("set {collection}/{id}")).await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> PortResult<Value> {
        let resp = self
            .authorize(self.client.get(self.doc_url(collection, id)))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("get {collection}/{id}: {e}")))?;

        let doc = Self::read_response(resp, &format!("get {collection}/{id}")).await?;
        Ok(document_record(&doc))
    }

    async fn query(&self, collection: &str, query: Query) -> PortResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.base_url);
        let resp = self
            .authorize(self.client.post(&url))
            .json(&structured_query(collection, &query))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("query {collection}: {e}")))?;

        let rows = Self::read_response(resp, &format!("query {collection}")).await?;
        let rows = rows.as_array().cloned().unwrap_or_default();

        // Rows without a `document` entry are progress markers from the
        // streaming API.
        Ok(rows
            .iter()
            .filter_map(|row| {
                let doc = row.get("document")?;
                Some(Document {
                    id: document_id(doc)?,
                    record: document_record(doc),
                })
            })
            .collect())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> PortResult<()> {
        let mut params: Vec<(&str, String)> = fields
            .as_object()
            .map(|map| {
                map.keys()
                    .map(|k| ("updateMask.fieldPaths", k.clone()))
                    .collect()
            })
            .unwrap_or_default();
        params.push(("currentDocument.exists", "true".to_string()));

        let resp = self
            .authorize(self.client.patch(self.doc_url(collection, id)))
            .query(&params)
            .json(&json!({ "fields": record_to_fields(&fields) }))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("update {collection}/{id}: {e}")))?;

        Self::read_response(resp, &format!("update {collection}/{id}")).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> PortResult<()> {
        let resp = self
            .authorize(self.client.delete(self.doc_url(collection, id)))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("delete {collection}/{id}: {e}")))?;

        Self::read_response(resp, &format!("delete {collection}/{id}")).await?;
        Ok(())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> PortResult<()> {
        let url = format!("{}:commit", self.base_url);
        let body = json!({
            "writes": [{
                "transform": {
                    "document": self.doc_name(collection, id),
                    "fieldTransforms": [{
                        "fieldPath": field,
                        "increment": { "integerValue": delta.to_string() },
                    }],
                },
                "currentDocument": { "exists": true },
            }]
        });

        let resp = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("increment {collection}/{id}: {e}")))?;

        Self::read_response(resp, &format!("increment {collection}/{id}")).await?;
        Ok(())
    }
}
