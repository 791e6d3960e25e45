//! Switch record catalog.
//!
//! Records are persisted one per line by [`RecordStore`] and folded into
//! an [`AllowedValues`] catalog that the request filter queries.

pub mod allowed;
pub mod codec;
pub mod error;
pub mod record;
pub mod store;

pub use allowed::{AllowedValueCatalog, AllowedValues, Category};
pub use error::CatalogError;
pub use record::{SwitchKind, SwitchRecord};
pub use store::RecordStore;
