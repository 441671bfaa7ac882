use std::sync::Arc;

use lumiere_catalog::{Catalog, CatalogError};
use lumiere_session::{InMemorySessionStore, SessionStore};

use crate::config::ApiConfig;

/// Catalogue bundled with the binary, served when no path is configured.
pub const SEED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Shared state handed to every handler.
pub struct AppServices {
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppServices {
    pub fn new(catalog: Catalog, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions,
        }
    }

    /// Services over the seed catalogue with an empty in-memory session store.
    pub fn seeded() -> Result<Self, CatalogError> {
        Ok(Self::new(
            Catalog::from_json(SEED_CATALOG)?,
            Arc::new(InMemorySessionStore::new()),
        ))
    }
}

pub fn build_services(config: &ApiConfig) -> Result<AppServices, CatalogError> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalogue from file");
            Catalog::from_path(path)?
        }
        None => {
            tracing::info!("loading bundled seed catalogue");
            Catalog::from_json(SEED_CATALOG)?
        }
    };
    let sessions = InMemorySessionStore::with_idle_ttl(config.session_idle_ttl);
    Ok(AppServices::new(catalog, Arc::new(sessions)))
}
