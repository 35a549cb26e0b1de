mod engine;
mod error;
mod name_catalog;
mod types;

pub use engine::{Engine, Session};
pub use error::{ClassificationFault, CoreError, CoreErrorCode};
pub use name_catalog::NameCatalog;
pub use types::Snapshot;
