//! crates/achameupet_core/src/user.rs
//!
//! Registration and login. Credentials live entirely inside the external
//! identity provider; this service only writes the profile document and the
//! custom claims that later surface in verified tokens.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::User;
use crate::error::{ServiceError, ServiceResult};
use crate::ports::{AuthIdentity, Document, DocumentStore, IdentityProvider};
use crate::record::from_document;
use crate::validate::{self, RegistrationDraft};

pub const COLLECTION: &str = "usuarios";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Creates the identity, writes the profile document at the subject id,
    /// and attaches the claims that listings later denormalize from tokens.
    pub async fn register(&self, draft: &RegistrationDraft) -> ServiceResult<User> {
        let reg = validate::validate_registration(draft).map_err(ServiceError::Validation)?;

        let photo_url = (!reg.photo_url.is_empty()).then_some(reg.photo_url.as_str());
        let subject_id = self
            .identity
            .create_identity(&reg.email, &reg.password, &reg.name, photo_url)
            .await?;

        let user = User {
            id: subject_id.clone(),
            name: reg.name,
            email: reg.email,
            whatsapp: reg.whatsapp,
            photo_url: reg.photo_url,
            city: reg.city,
            neighborhood: reg.neighborhood,
            marketing_opt_in: reg.marketing_opt_in,
            kind: reg.kind,
            registered_at: Utc::now(),
        };

        let record = serde_json::to_value(&user)
            .map_err(|e| ServiceError::Collaborator(format!("record serialization failed: {e}")))?;
        self.store.set(COLLECTION, &subject_id, record).await?;

        self.identity
            .set_claims(
                &subject_id,
                json!({
                    "tipoUsuario": user.kind.as_wire(),
                    "whatsapp": user.whatsapp,
                }),
            )
            .await?;

        Ok(user)
    }

    /// Verifies a bearer token and loads the matching profile.
    pub async fn login(&self, token: &str) -> ServiceResult<(AuthIdentity, User)> {
        let identity = self.identity.verify_token(token).await?;

        let value = self.store.get(COLLECTION, &identity.subject_id).await?;
        let user = from_document(Document {
            id: identity.subject_id.clone(),
            record: value,
        })?;

        Ok((identity, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserKind;
    use crate::testutil::{MemoryIdentity, MemoryStore};

    fn draft() -> RegistrationDraft {
        RegistrationDraft {
            name: Some("Maria Silva".to_string()),
            email: Some("maria@example.com".to_string()),
            password: Some("segredo1".to_string()),
            whatsapp: Some("11987654321".to_string()),
            photo_url: None,
            city: Some("São Paulo".to_string()),
            neighborhood: Some("Pinheiros".to_string()),
            marketing_opt_in: Some(false),
            kind: Some("Encontrador".to_string()),
        }
    }

    fn service(store: &Arc<MemoryStore>, identity: &Arc<MemoryIdentity>) -> UserService {
        UserService::new(
            Arc::clone(store) as Arc<dyn DocumentStore>,
            Arc::clone(identity) as Arc<dyn IdentityProvider>,
        )
    }

    #[tokio::test]
    async fn register_creates_identity_profile_and_claims() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let svc = service(&store, &identity);

        let user = svc.register(&draft()).await.unwrap();

        assert!(!user.id.is_empty());
        assert_eq!(user.kind, UserKind::Finder);
        assert!(!user.marketing_opt_in);

        // Profile stored at the subject id, with the id inside the record.
        let raw = store.get(COLLECTION, &user.id).await.unwrap();
        assert_eq!(raw["id"], user.id.as_str());
        assert_eq!(raw["nome"], "Maria Silva");

        let claims = identity.claims_for(&user.id).unwrap();
        assert_eq!(claims["tipoUsuario"], "Encontrador");
        assert_eq!(claims["whatsapp"], "11987654321");
    }

    #[tokio::test]
    async fn register_duplicate_email_is_a_conflict() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let svc = service(&store, &identity);

        svc.register(&draft()).await.unwrap();
        let err = svc.register(&draft()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_invalid_draft_never_reaches_collaborators() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let svc = service(&store, &identity);

        let err = svc
            .register(&RegistrationDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.is_empty(COLLECTION));
        assert_eq!(identity.identity_count(), 0);
    }

    #[tokio::test]
    async fn login_returns_identity_and_profile() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let svc = service(&store, &identity);

        let user = svc.register(&draft()).await.unwrap();
        let token = identity.issue_token(&user.id, Some("Maria Silva"), Some("11987654321"));

        let (auth, profile) = svc.login(&token).await.unwrap();
        assert_eq!(auth.subject_id, user.id);
        assert_eq!(profile.email, "maria@example.com");
    }

    #[tokio::test]
    async fn login_with_bad_token_is_unauthorized() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let svc = service(&store, &identity);

        let err = svc.login("garbage").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_without_profile_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let svc = service(&store, &identity);

        let token = identity.issue_token("ghost", None, None);
        let err = svc.login(&token).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
