pub mod aggregates;
pub mod artists;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod notifier;
pub mod options;
pub mod session;
pub mod store;

pub use aggregates::*;
pub use artists::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use filters::*;
pub use notifier::*;
pub use options::*;
pub use session::*;
pub use store::*;
