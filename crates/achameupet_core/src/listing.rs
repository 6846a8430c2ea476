//! crates/achameupet_core/src/listing.rs
//!
//! The listing directory service: lifecycle of animal reports plus the
//! proximity query. All persistence goes through the injected document-store
//! and object-store ports.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::future::join_all;
use serde_json::json;
use tracing::warn;

use crate::domain::{Caller, Listing, ListingStatus};
use crate::error::{ServiceError, ServiceResult};
use crate::geo;
use crate::ports::{Document, DocumentStore, Filter, ObjectStore, OrderBy, Query};
use crate::record::{from_document, to_record};
use crate::validate::{self, ListingDraft, ProximityQuery};

pub const COLLECTION: &str = "animais";

/// One photo file as received from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: String,
}

/// A proximity-search hit: the listing and its great-circle distance from the
/// query point, rounded to one decimal.
#[derive(Debug, Clone)]
pub struct NearbyListing {
    pub listing: Listing,
    pub distance_km: f64,
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn ObjectStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn DocumentStore>, media: Arc<dyn ObjectStore>) -> Self {
        Self { store, media }
    }

    /// Validates, uploads the photos, and writes the record once. The record
    /// is only written when at least one photo URL survived the uploads.
    pub async fn create(
        &self,
        caller: &Caller,
        draft: &ListingDraft,
        photos: Vec<PhotoUpload>,
    ) -> ServiceResult<Listing> {
        let fields = validate::validate_listing(draft).map_err(ServiceError::Validation)?;

        if photos.is_empty() {
            return Err(ServiceError::Validation(vec![
                "at least one photo is required".to_string(),
            ]));
        }
        if photos.len() > validate::MAX_PHOTOS {
            return Err(ServiceError::Validation(vec![format!(
                "at most {} photos are allowed",
                validate::MAX_PHOTOS
            )]));
        }

        let photo_urls = self.upload_photos(photos).await;
        if photo_urls.is_empty() {
            return Err(ServiceError::UploadFailure);
        }

        let now = Utc::now();
        let mut listing = Listing {
            id: String::new(),
            name: fields.name,
            species: fields.species,
            breed: fields.breed,
            color: fields.color,
            size: fields.size,
            sex: fields.sex,
            description: fields.description,
            city: fields.city,
            neighborhood: fields.neighborhood,
            marks: fields.marks,
            contact_phone: fields.contact_phone,
            owner_id: caller.id.clone(),
            owner_info: caller.contact(),
            position: Some(fields.position),
            photos: photo_urls,
            status: ListingStatus::Lost,
            active: true,
            views: 0,
            contacts: 0,
            posted_at: now,
            updated_at: now,
        };

        let id = self.store.add(COLLECTION, to_record(&listing)?).await?;
        listing.id = id;
        Ok(listing)
    }

    /// Uploads every photo concurrently and keeps whichever succeeded. One
    /// rejected upload does not cancel the others; failures are logged and
    /// dropped from the result.
    async fn upload_photos(&self, photos: Vec<PhotoUpload>) -> Vec<String> {
        let uploads = photos.into_iter().map(|photo| {
            let media = Arc::clone(&self.media);
            async move {
                let name = photo.file_name.clone();
                let result = media
                    .store(photo.data, &photo.content_type, &photo.file_name)
                    .await;
                (name, result)
            }
        });

        let mut urls = Vec::new();
        for (name, result) in join_all(uploads).await {
            match result {
                Ok(url) => urls.push(url),
                Err(err) => warn!(file = %name, error = %err, "photo upload failed"),
            }
        }
        urls
    }

    /// Bounding-box query at the store, exact haversine ranking in memory.
    ///
    /// The box is a rectangle, not a circle: hits near its corners can lie
    /// beyond the requested radius and are still returned.
    pub async fn find_nearby(&self, query: ProximityQuery) -> ServiceResult<Vec<NearbyListing>> {
        let bbox = geo::bounding_box(query.center, query.radius_km);

        let docs = self
            .store
            .query(
                COLLECTION,
                Query {
                    filters: vec![
                        Filter::eq("status", json!(ListingStatus::Lost.as_wire())),
                        Filter::eq("ativo", json!(true)),
                        Filter::gte("localizacao", json!(bbox.min)),
                        Filter::lte("localizacao", json!(bbox.max)),
                    ],
                    order_by: None,
                    limit: Some(query.limit),
                },
            )
            .await?;

        Ok(rank_candidates(query, docs))
    }

    /// Fetch-by-id, with a best-effort server-side view-count increment. The
    /// returned record carries the count as it was read.
    pub async fn get(&self, id: &str) -> ServiceResult<Listing> {
        let value = self.store.get(COLLECTION, id).await?;
        let listing: Listing = from_document(Document {
            id: id.to_string(),
            record: value,
        })?;

        if let Err(err) = self
            .store
            .increment(COLLECTION, id, "visualizacoes", 1)
            .await
        {
            warn!(listing = %id, error = %err, "view counter increment failed");
        }

        Ok(listing)
    }

    /// Re-validates with the create schema and rewrites the record. New
    /// photos replace the list; no photos preserves the existing list.
    /// Counters, status, and ownership fields are never touched.
    pub async fn update(
        &self,
        id: &str,
        caller: &Caller,
        draft: &ListingDraft,
        photos: Vec<PhotoUpload>,
    ) -> ServiceResult<Listing> {
        let fields = validate::validate_listing(draft).map_err(ServiceError::Validation)?;
        if photos.len() > validate::MAX_PHOTOS {
            return Err(ServiceError::Validation(vec![format!(
                "at most {} photos are allowed",
                validate::MAX_PHOTOS
            )]));
        }

        let current: Listing = from_document(Document {
            id: id.to_string(),
            record: self.store.get(COLLECTION, id).await?,
        })?;
        if current.owner_id != caller.id {
            return Err(ServiceError::Forbidden(
                "listing belongs to another user".to_string(),
            ));
        }

        let photo_urls = if photos.is_empty() {
            current.photos.clone()
        } else {
            let urls = self.upload_photos(photos).await;
            if urls.is_empty() {
                return Err(ServiceError::UploadFailure);
            }
            urls
        };

        let updated = Listing {
            id: id.to_string(),
            name: fields.name,
            species: fields.species,
            breed: fields.breed,
            color: fields.color,
            size: fields.size,
            sex: fields.sex,
            description: fields.description,
            city: fields.city,
            neighborhood: fields.neighborhood,
            marks: fields.marks,
            contact_phone: fields.contact_phone,
            owner_id: current.owner_id,
            owner_info: current.owner_info,
            position: Some(fields.position),
            photos: photo_urls,
            status: current.status,
            active: current.active,
            views: current.views,
            contacts: current.contacts,
            posted_at: current.posted_at,
            updated_at: Utc::now(),
        };

        self.store
            .update(COLLECTION, id, to_record(&updated)?)
            .await?;
        Ok(updated)
    }

    /// Hard delete after an existence and ownership check.
    pub async fn delete(&self, id: &str, caller: &Caller) -> ServiceResult<()> {
        let current: Listing = from_document(Document {
            id: id.to_string(),
            record: self.store.get(COLLECTION, id).await?,
        })?;
        if current.owner_id != caller.id {
            return Err(ServiceError::Forbidden(
                "listing belongs to another user".to_string(),
            ));
        }

        self.store.delete(COLLECTION, id).await?;
        Ok(())
    }

    /// All listings posted by one user, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> ServiceResult<Vec<Listing>> {
        let docs = self
            .store
            .query(
                COLLECTION,
                Query {
                    filters: vec![Filter::eq("usuarioId", json!(owner_id))],
                    order_by: Some(OrderBy::desc("dataPostagem")),
                    limit: None,
                },
            )
            .await?;

        docs.into_iter().map(from_document).collect()
    }
}

/// Computes distances, drops candidates without a position, sorts ascending,
/// and truncates. Malformed records are skipped rather than failing the whole
/// query.
fn rank_candidates(query: ProximityQuery, docs: Vec<Document>) -> Vec<NearbyListing> {
    let mut hits: Vec<NearbyListing> = docs
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match from_document::<Listing>(doc) {
                Ok(listing) => Some(listing),
                Err(err) => {
                    warn!(listing = %id, error = %err, "skipping unreadable record");
                    None
                }
            }
        })
        .filter_map(|listing| {
            let position = listing.position?;
            let distance_km = geo::round_km(geo::haversine_km(query.center, position));
            Some(NearbyListing {
                listing,
                distance_km,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hits.truncate(query.limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, OwnerContact, Sex, SizeClass, Species};
    use crate::testutil::{MemoryObjects, MemoryStore};
    use crate::validate::{ProximityDraft, DEFAULT_LIMIT};

    fn caller() -> Caller {
        Caller {
            id: "user-1".to_string(),
            name: Some("Maria".to_string()),
            phone: Some("11987654321".to_string()),
        }
    }

    fn draft() -> ListingDraft {
        ListingDraft {
            name: Some("Rex".to_string()),
            species: Some("Cachorro".to_string()),
            breed: Some("Vira-lata".to_string()),
            color: Some("Caramelo".to_string()),
            size: Some("Medio".to_string()),
            sex: Some("Macho".to_string()),
            description: None,
            city: Some("São Paulo".to_string()),
            neighborhood: Some("Sé".to_string()),
            latitude: Some("-23.55".to_string()),
            longitude: Some("-46.63".to_string()),
            marks: Vec::new(),
            contact_phone: None,
        }
    }

    fn photo(name: &str) -> PhotoUpload {
        PhotoUpload {
            data: Bytes::from_static(b"\xff\xd8\xff"),
            content_type: "image/jpeg".to_string(),
            file_name: name.to_string(),
        }
    }

    fn service(store: &Arc<MemoryStore>, media: &Arc<MemoryObjects>) -> ListingService {
        ListingService::new(
            Arc::clone(store) as Arc<dyn DocumentStore>,
            Arc::clone(media) as Arc<dyn ObjectStore>,
        )
    }

    fn stored_listing(id: &str, owner: &str, position: Option<GeoPoint>) -> Listing {
        let now = Utc::now();
        Listing {
            id: id.to_string(),
            name: "Rex".to_string(),
            species: Species::Dog,
            breed: "Vira-lata".to_string(),
            color: "Caramelo".to_string(),
            size: SizeClass::Medium,
            sex: Sex::Male,
            description: None,
            city: "São Paulo".to_string(),
            neighborhood: "Sé".to_string(),
            marks: None,
            contact_phone: None,
            owner_id: owner.to_string(),
            owner_info: OwnerContact {
                name: "Maria".to_string(),
                phone: String::new(),
            },
            position,
            photos: vec!["https://objects.test/a.jpg".to_string()],
            status: ListingStatus::Lost,
            active: true,
            views: 0,
            contacts: 0,
            posted_at: now,
            updated_at: now,
        }
    }

    async fn seed(store: &Arc<MemoryStore>, listing: &Listing) -> String {
        store
            .add(COLLECTION, to_record(listing).unwrap())
            .await
            .unwrap()
    }

    fn proximity(lat: f64, lng: f64, radius: f64, limit: usize) -> ProximityQuery {
        crate::validate::validate_proximity(&ProximityDraft {
            latitude: Some(lat.to_string()),
            longitude: Some(lng.to_string()),
            radius_km: Some(radius.to_string()),
            limit: Some(limit.to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn create_initializes_lifecycle_fields() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let listing = svc
            .create(&caller(), &draft(), vec![photo("a.jpg"), photo("b.jpg")])
            .await
            .unwrap();

        assert!(!listing.id.is_empty());
        assert_eq!(listing.status, ListingStatus::Lost);
        assert!(listing.active);
        assert_eq!(listing.views, 0);
        assert_eq!(listing.contacts, 0);
        assert_eq!(listing.photos.len(), 2);
        assert_eq!(listing.owner_id, "user-1");
        assert_eq!(listing.owner_info.name, "Maria");
        assert_eq!(
            listing.position,
            Some(GeoPoint {
                latitude: -23.55,
                longitude: -46.63
            })
        );

        // The stored record does not carry the id field.
        let raw = store.get(COLLECTION, &listing.id).await.unwrap();
        assert!(raw.get("id").is_none());
        assert_eq!(raw["status"], "Perdido");
    }

    #[tokio::test]
    async fn create_without_photos_is_a_validation_error() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let err = svc.create(&caller(), &draft(), Vec::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.is_empty(COLLECTION));
    }

    #[tokio::test]
    async fn create_tolerates_partial_upload_failure() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        media.fail_for("bad.jpg");
        let svc = service(&store, &media);

        let listing = svc
            .create(&caller(), &draft(), vec![photo("a.jpg"), photo("bad.jpg")])
            .await
            .unwrap();

        assert_eq!(listing.photos.len(), 1);
        assert!(listing.photos[0].contains("a.jpg"));
    }

    #[tokio::test]
    async fn create_fails_when_every_upload_fails() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        media.fail_all();
        let svc = service(&store, &media);

        let err = svc
            .create(&caller(), &draft(), vec![photo("a.jpg"), photo("b.jpg")])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UploadFailure));
        assert!(store.is_empty(COLLECTION));
    }

    #[tokio::test]
    async fn create_rejects_more_than_five_photos() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let photos = (0..6).map(|i| photo(&format!("{i}.jpg"))).collect();
        let err = svc.create(&caller(), &draft(), photos).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    // Query point and fixtures from a city-scale scenario: one record ~2.1 km
    // away, one ~8.4 km away.
    const CENTER: GeoPoint = GeoPoint {
        latitude: -23.55,
        longitude: -46.63,
    };

    fn offset_north(km: f64) -> GeoPoint {
        GeoPoint {
            latitude: CENTER.latitude + km / 111.1949,
            longitude: CENTER.longitude,
        }
    }

    #[tokio::test]
    async fn find_nearby_returns_only_records_within_radius_box() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let near = seed(&store, &stored_listing("", "u", Some(offset_north(2.1)))).await;
        seed(&store, &stored_listing("", "u", Some(offset_north(8.4)))).await;

        let hits = svc
            .find_nearby(proximity(CENTER.latitude, CENTER.longitude, 5.0, 10))
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].listing.id, near);
        assert_eq!(hits[0].distance_km, 2.1);
    }

    #[tokio::test]
    async fn find_nearby_sorts_ascending() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        seed(&store, &stored_listing("", "u", Some(offset_north(4.0)))).await;
        seed(&store, &stored_listing("", "u", Some(offset_north(1.0)))).await;
        seed(&store, &stored_listing("", "u", Some(offset_north(3.0)))).await;

        let hits = svc
            .find_nearby(proximity(CENTER.latitude, CENTER.longitude, 5.0, 10))
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        assert!(hits.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        assert_eq!(hits[0].distance_km, 1.0);
    }

    #[tokio::test]
    async fn find_nearby_truncates_to_limit() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        for km in [1.0, 2.0, 3.0] {
            seed(&store, &stored_listing("", "u", Some(offset_north(km)))).await;
        }

        let hits = svc
            .find_nearby(proximity(CENTER.latitude, CENTER.longitude, 5.0, 2))
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance_km <= hits[1].distance_km);
    }

    #[tokio::test]
    async fn find_nearby_reported_distance_matches_recomputation() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        seed(&store, &stored_listing("", "u", Some(offset_north(2.1)))).await;
        seed(&store, &stored_listing("", "u", Some(offset_north(4.7)))).await;

        let hits = svc
            .find_nearby(proximity(CENTER.latitude, CENTER.longitude, 5.0, 10))
            .await
            .unwrap();

        for hit in hits {
            let recomputed = geo::haversine_km(CENTER, hit.listing.position.unwrap());
            assert!((recomputed - hit.distance_km).abs() <= 0.1);
        }
    }

    #[tokio::test]
    async fn find_nearby_excludes_found_and_inactive_records() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let mut found = stored_listing("", "u", Some(offset_north(1.0)));
        found.status = ListingStatus::Found;
        seed(&store, &found).await;

        let mut inactive = stored_listing("", "u", Some(offset_north(1.5)));
        inactive.active = false;
        seed(&store, &inactive).await;

        let visible = seed(&store, &stored_listing("", "u", Some(offset_north(2.0)))).await;

        let hits = svc
            .find_nearby(proximity(CENTER.latitude, CENTER.longitude, 5.0, 10))
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].listing.id, visible);
    }

    #[tokio::test]
    async fn find_nearby_includes_box_corner_false_positives() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        // Inside the 5 km box on both axes, but past 5 km of true distance.
        let corner = GeoPoint {
            latitude: CENTER.latitude + 0.044,
            longitude: CENTER.longitude + 0.048,
        };
        seed(&store, &stored_listing("", "u", Some(corner))).await;

        let hits = svc
            .find_nearby(proximity(CENTER.latitude, CENTER.longitude, 5.0, 10))
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance_km > 5.0);
    }

    #[test]
    fn rank_candidates_skips_records_without_position() {
        let with_position = stored_listing("a", "u", Some(offset_north(1.0)));
        let without_position = stored_listing("b", "u", None);

        let docs = vec![
            Document {
                id: "a".to_string(),
                record: to_record(&with_position).unwrap(),
            },
            Document {
                id: "b".to_string(),
                record: to_record(&without_position).unwrap(),
            },
        ];

        let query = proximity(CENTER.latitude, CENTER.longitude, 5.0, DEFAULT_LIMIT);
        let hits = rank_candidates(query, docs);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].listing.id, "a");
    }

    #[tokio::test]
    async fn get_returns_record_and_increments_views() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let id = seed(&store, &stored_listing("", "u", Some(CENTER))).await;

        let listing = svc.get(&id).await.unwrap();
        assert_eq!(listing.views, 0);

        let raw = store.get(COLLECTION, &id).await.unwrap();
        assert_eq!(raw["visualizacoes"], 1);
    }

    #[tokio::test]
    async fn concurrent_gets_do_not_lose_view_increments() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let id = seed(&store, &stored_listing("", "u", Some(CENTER))).await;

        join_all((0..20).map(|_| svc.get(&id))).await;

        let raw = store.get(COLLECTION, &id).await.unwrap();
        assert_eq!(raw["visualizacoes"], 20);
    }

    #[tokio::test]
    async fn get_missing_id_is_not_found_and_touches_nothing() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let err = svc.get("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(store.is_empty(COLLECTION));
    }

    #[tokio::test]
    async fn update_without_photos_preserves_photo_list() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let mut seeded = stored_listing("", "user-1", Some(CENTER));
        seeded.photos = vec![
            "https://objects.test/old1.jpg".to_string(),
            "https://objects.test/old2.jpg".to_string(),
        ];
        let id = seed(&store, &seeded).await;

        let mut changed = draft();
        changed.name = Some("Rex II".to_string());
        let updated = svc
            .update(&id, &caller(), &changed, Vec::new())
            .await
            .unwrap();

        assert_eq!(updated.name, "Rex II");
        assert_eq!(updated.photos, seeded.photos);
        assert!(updated.updated_at >= seeded.updated_at);
    }

    #[tokio::test]
    async fn update_with_photos_replaces_photo_list() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let id = seed(&store, &stored_listing("", "user-1", Some(CENTER))).await;

        let updated = svc
            .update(&id, &caller(), &draft(), vec![photo("new.jpg")])
            .await
            .unwrap();

        assert_eq!(updated.photos.len(), 1);
        assert!(updated.photos[0].contains("new.jpg"));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let id = seed(&store, &stored_listing("", "someone-else", Some(CENTER))).await;

        let err = svc
            .update(&id, &caller(), &draft(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let id = seed(&store, &stored_listing("", "user-1", Some(CENTER))).await;

        svc.delete(&id, &caller()).await.unwrap();
        assert!(matches!(
            svc.get(&id).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_missing_record_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let err = svc.delete("missing", &caller()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let id = seed(&store, &stored_listing("", "someone-else", Some(CENTER))).await;
        let err = svc.delete(&id, &caller()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        assert!(svc.get(&id).await.is_ok());
    }

    #[tokio::test]
    async fn list_by_owner_returns_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryObjects::new());
        let svc = service(&store, &media);

        let mut older = stored_listing("", "user-1", Some(CENTER));
        older.posted_at = Utc::now() - chrono::Duration::days(2);
        let older_id = seed(&store, &older).await;

        let newer_id = seed(&store, &stored_listing("", "user-1", Some(CENTER))).await;
        seed(&store, &stored_listing("", "someone-else", Some(CENTER))).await;

        let listings = svc.list_by_owner("user-1").await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, newer_id);
        assert_eq!(listings[1].id, older_id);
    }
}
