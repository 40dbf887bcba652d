//! Application context: single-owner initialization and shared resources

pub mod bootstrap;
pub mod context;

pub use bootstrap::{bootstrap, bootstrap_with};
pub use context::{AppContext, ContextState, Resources};
