//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use achameupet_core::community::{AlertService, BoardService};
use achameupet_core::listing::ListingService;
use achameupet_core::ports::IdentityProvider;
use achameupet_core::user::UserService;

use crate::config::Config;

/// The shared application state, created once at startup and passed to all
/// handlers. The services hold the collaborator ports; the identity provider
/// is also exposed directly for the auth middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityProvider>,
    pub listings: ListingService,
    pub users: UserService,
    pub board: BoardService,
    pub alerts: AlertService,
}
