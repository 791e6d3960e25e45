//! formgate
//!
//! Validation of form-encoded requests before they reach application code.
//!
//! - Parameters named `jdk`, `os` and `arch` must carry a value from the
//!   allowed-value catalog, which is seeded from a switch record file.
//! - Every other parameter must not contain a blocklisted substring.
//! - A parameter supplied more than once rejects the whole request.
//!
//! Accepted requests continue with their original body bytes. Rejected
//! requests are answered with `400 Bad Request` and an error page.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod filter;
pub mod telemetry;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use catalog::{AllowedValues, CatalogError, RecordStore};
use config::GateConfig;
use filter::{
    Blocklist, CachedBlocklist, ErrorPageSource, FileBlocklist, FileErrorPage,
    RequestValidationFilter, StaticErrorPage,
};

/// Errors raised while wiring the filter at startup.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// A wired filter together with the catalog it was built from.
pub struct Gate {
    pub catalog: Arc<AllowedValues>,
    pub filter: RequestValidationFilter,
}

impl Gate {
    /// Build the filter described by `config`.
    ///
    /// The catalog file is read once here. The blocklist is only recorded;
    /// it is read per request, so a missing blocklist setting surfaces on
    /// the first validation.
    pub fn from_config(config: &GateConfig) -> Result<Self, GateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let records = RecordStore::load(path)?;
                let catalog = AllowedValues::from_records(&records);
                info!(
                    path = %path.display(),
                    records = records.len(),
                    runtimes = catalog.runtimes().count(),
                    platforms = catalog.platforms().count(),
                    architectures = catalog.architectures().count(),
                    "Catalog loaded"
                );
                catalog
            }
            None => AllowedValues::new(),
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Build the filter around an already assembled catalog.
    pub fn with_catalog(config: &GateConfig, catalog: AllowedValues) -> Self {
        let catalog = Arc::new(catalog);

        let file_blocklist = FileBlocklist::new(config.blocklist_path.clone());
        let blocklist: Arc<dyn Blocklist> = if config.blocklist_cache_ttl.is_zero() {
            Arc::new(file_blocklist)
        } else {
            Arc::new(CachedBlocklist::new(file_blocklist, config.blocklist_cache_ttl))
        };

        let error_page: Arc<dyn ErrorPageSource> = match &config.error_page_path {
            Some(path) => Arc::new(FileErrorPage::new(path.clone())),
            None => Arc::new(StaticErrorPage::default()),
        };

        let filter = RequestValidationFilter::new(
            catalog.clone(),
            blocklist,
            error_page,
            config.filter.clone(),
        );

        Self { catalog, filter }
    }
}
