//! Product catalog for the vitrine tools.
//!
//! - [`ProductRecord`] with the GS1 attributes a registration needs
//! - [`RecordStore`] with a whole-file JSON implementation and an in-memory one
//! - Completeness filters and search as used by the catalog list
//! - NCM formatting and Drive thumbnail resolution
//!
//! ```no_run
//! use vitrine_catalog::{Filter, JsonFileStore, ProductFields, RecordStore};
//!
//! # fn example() -> vitrine_catalog::CatalogResult<()> {
//! let store = JsonFileStore::new("products.json");
//! store.create(ProductFields::new("Caneca Cerâmica 350ml"))?;
//!
//! let missing_ean = Filter::NoEan.apply(store.list()?);
//! println!("{} products without EAN", missing_ean.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod format;
pub mod record;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use filter::{search, Filter};
pub use format::{drive_thumbnail_url, format_ncm};
pub use record::{ProductFields, ProductPatch, ProductRecord};
pub use store::{JsonFileStore, MemoryStore, RecordStore};
