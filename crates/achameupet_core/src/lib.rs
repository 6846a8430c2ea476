//! crates/achameupet_core/src/lib.rs
//!
//! The central domain logic and interface definitions for the AchaMeuPet
//! backend: data structures, collaborator ports, validation, the geo routine,
//! and the services that operate purely over the ports.

pub mod community;
pub mod domain;
pub mod error;
pub mod geo;
pub mod listing;
pub mod ports;
mod record;
pub mod user;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exporting for easier access in other crates
pub use domain::{
    Alert, AlertKind, BoardPost, Caller, GeoPoint, Listing, ListingStatus, OwnerContact, Sex,
    SizeClass, Species, User, UserKind,
};
pub use error::{ServiceError, ServiceResult};
pub use ports::{
    AuthIdentity, Document, DocumentStore, Filter, FilterOp, IdentityProvider, ObjectStore,
    OrderBy, PortError, PortResult, Query,
};
