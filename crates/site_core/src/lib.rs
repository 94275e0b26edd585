pub mod config;
pub mod featured;
pub mod form;
pub mod loader;
pub mod normalizer;
pub mod view_model;

pub use config::{load_settings, Settings};
pub use form::{FormKind, FormMachine, SubmitOutcome};
pub use loader::{load_campaigns, load_home, load_products, CollectionView, HomePage};
pub use view_model::build_view_model;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
