//! services/api/src/web/listings.rs
//!
//! Axum handlers for the `/api/animais` endpoints: create, proximity search,
//! fetch-by-id, update, delete, and the caller's own listings.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use achameupet_core::listing::PhotoUpload;
use achameupet_core::validate::{
    validate_proximity, ListingDraft, ProximityDraft, MAX_PHOTOS,
};
use achameupet_core::ServiceError;

use crate::web::envelope;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_PHOTO_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

//=========================================================================================
// Multipart parsing
//=========================================================================================

/// Collects the text fields into a draft and the `fotos` parts into photo
/// uploads, enforcing the transport limits (count, size, content type).
/// Unknown fields are ignored.
async fn read_listing_form(
    mut multipart: Multipart,
) -> Result<(ListingDraft, Vec<PhotoUpload>), Response> {
    let mut draft = ListingDraft::default();
    let mut photos = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(envelope::failure(
                    StatusCode::BAD_REQUEST,
                    json!(format!("malformed multipart body: {e}")),
                ))
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == "fotos" {
            if photos.len() == MAX_PHOTOS {
                return Err(envelope::failure(
                    StatusCode::BAD_REQUEST,
                    json!(format!("at most {MAX_PHOTOS} photos are allowed")),
                ));
            }

            let content_type = field.content_type().unwrap_or_default().to_string();
            if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
                return Err(envelope::failure(
                    StatusCode::BAD_REQUEST,
                    json!("unsupported file type, only JPEG and PNG are accepted"),
                ));
            }

            let file_name = field.file_name().unwrap_or("foto").to_string();
            let data = match field.bytes().await {
                Ok(data) => data,
                Err(e) => {
                    return Err(envelope::failure(
                        StatusCode::BAD_REQUEST,
                        json!(format!("failed to read uploaded file: {e}")),
                    ))
                }
            };
            if data.len() > MAX_PHOTO_BYTES {
                return Err(envelope::failure(
                    StatusCode::BAD_REQUEST,
                    json!(format!(
                        "file exceeds the {} MB limit",
                        MAX_PHOTO_BYTES / 1024 / 1024
                    )),
                ));
            }

            photos.push(PhotoUpload {
                data,
                content_type,
                file_name,
            });
            continue;
        }

        let text = match field.text().await {
            Ok(text) => text,
            Err(e) => {
                return Err(envelope::failure(
                    StatusCode::BAD_REQUEST,
                    json!(format!("failed to read field {name}: {e}")),
                ))
            }
        };
        match name.as_str() {
            "nome" => draft.name = Some(text),
            "tipo" => draft.species = Some(text),
            "raca" => draft.breed = Some(text),
            "cor" => draft.color = Some(text),
            "porte" => draft.size = Some(text),
            "sexo" => draft.sex = Some(text),
            "descricao" => draft.description = Some(text),
            "cidade" => draft.city = Some(text),
            "bairro" => draft.neighborhood = Some(text),
            "latitude" => draft.latitude = Some(text),
            "longitude" => draft.longitude = Some(text),
            "caracteristicas" => draft.marks.push(text),
            "telefoneContato" => draft.contact_phone = Some(text),
            _ => {}
        }
    }

    Ok((draft, photos))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Create a listing from a multipart form with up to five photos.
#[utoipa::path(
    post,
    path = "/api/animais",
    request_body(content_type = "multipart/form-data", description = "Listing fields plus 1-5 `fotos` files (JPEG/PNG, 5 MB each)."),
    responses(
        (status = 201, description = "Listing created"),
        (status = 400, description = "Validation failure or no photo stored"),
        (status = 401, description = "Missing bearer token"),
    ),
    tag = "animais"
)]
pub async fn create_listing_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Response {
    let (draft, photos) = match read_listing_form(multipart).await {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    match state.listings.create(&user.caller(), &draft, photos).await {
        Ok(listing) => envelope::created(listing),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProximityParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub raio: Option<String>,
    pub limite: Option<String>,
}

/// Proximity search: bounding-box pre-filter, exact distance ranking.
#[utoipa::path(
    get,
    path = "/api/animais/proximos",
    params(
        ("latitude" = f64, Query, description = "Query-point latitude"),
        ("longitude" = f64, Query, description = "Query-point longitude"),
        ("raio" = Option<f64>, Query, description = "Radius in km (default 10)"),
        ("limite" = Option<u32>, Query, description = "Maximum results (default 20)"),
    ),
    responses(
        (status = 200, description = "Listings sorted by distance, each with a `distancia` field"),
        (status = 400, description = "Missing or non-numeric coordinates"),
    ),
    tag = "animais"
)]
pub async fn nearby_listings_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProximityParams>,
) -> Response {
    let draft = ProximityDraft {
        latitude: params.latitude,
        longitude: params.longitude,
        radius_km: params.raio,
        limit: params.limite,
    };
    let query = match validate_proximity(&draft) {
        Ok(query) => query,
        Err(errors) => {
            return envelope::service_error(state.config.dev_mode, ServiceError::Validation(errors))
        }
    };

    match state.listings.find_nearby(query).await {
        Ok(hits) => {
            let total = hits.len();
            let data: Vec<Value> = hits
                .into_iter()
                .map(|hit| {
                    let mut value = serde_json::to_value(&hit.listing).unwrap_or_default();
                    if let Some(map) = value.as_object_mut() {
                        map.insert("distancia".to_string(), json!(hit.distance_km));
                    }
                    value
                })
                .collect();

            envelope::ok_with_meta(
                data,
                json!({
                    "total": total,
                    "raio": query.radius_km,
                    "localizacao": {
                        "latitude": query.center.latitude,
                        "longitude": query.center.longitude,
                    },
                }),
            )
        }
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// The caller's own listings, newest first.
#[utoipa::path(
    get,
    path = "/api/animais/meus",
    responses(
        (status = 200, description = "Listings owned by the caller"),
        (status = 401, description = "Missing bearer token"),
    ),
    tag = "animais"
)]
pub async fn my_listings_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.listings.list_by_owner(&user.id).await {
        Ok(listings) => envelope::ok(listings),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// Fetch one listing; each successful fetch counts one view.
#[utoipa::path(
    get,
    path = "/api/animais/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "The listing"),
        (status = 404, description = "No such listing"),
    ),
    tag = "animais"
)]
pub async fn get_listing_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.listings.get(&id).await {
        Ok(listing) => envelope::ok(listing),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// Update a listing. New photos replace the list; omitting photos keeps it.
#[utoipa::path(
    put,
    path = "/api/animais/{id}",
    params(("id" = String, Path, description = "Listing id")),
    request_body(content_type = "multipart/form-data", description = "Same fields as create; `fotos` files optional."),
    responses(
        (status = 200, description = "Updated listing"),
        (status = 403, description = "Listing belongs to another user"),
        (status = 404, description = "No such listing"),
    ),
    tag = "animais"
)]
pub async fn update_listing_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let (draft, photos) = match read_listing_form(multipart).await {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    match state
        .listings
        .update(&id, &user.caller(), &draft, photos)
        .await
    {
        Ok(listing) => envelope::ok(listing),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// Hard-delete a listing.
#[utoipa::path(
    delete,
    path = "/api/animais/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing removed"),
        (status = 403, description = "Listing belongs to another user"),
        (status = 404, description = "No such listing"),
    ),
    tag = "animais"
)]
pub async fn delete_listing_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Response {
    match state.listings.delete(&id, &user.caller()).await {
        Ok(()) => envelope::ok(json!({ "id": id })),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}
