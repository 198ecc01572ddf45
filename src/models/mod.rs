pub mod catalog;
pub mod loaders;
pub mod outcome;

pub use catalog::{Catalog, ScopeKey};
pub use loaders::load_catalog;
pub use outcome::Outcome;
