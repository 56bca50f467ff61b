//! Application bootstrap.
//!
//! [`MosaicApp`] turns a [`ConfigFile`](crate::config::ConfigFile) into a
//! ready-to-use [`MosaicSession`](crate::session::MosaicSession). Every
//! component is constructed here and injected into the next; nothing is
//! looked up globally.

mod bootstrap;
mod error;

pub use bootstrap::{AppProvider, AppSession, MosaicApp};
pub use error::AppError;
