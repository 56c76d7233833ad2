//! UniCompass student client.
//!
//! [`session`] hydrates the signed-in state from disk, [`client`] talks to the
//! API with it, and [`views`] turn API data into the dashboard, catalog and
//! application pages the binary prints.

pub mod cli;
pub mod client;
pub mod envelope;
pub mod error;
pub mod session;
pub mod views;

pub use client::{ApiClient, CatalogFilters};
pub use error::ClientError;
pub use session::{Session, SessionStore};
