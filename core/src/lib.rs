//! Domain and persistence core for the client service.
//!
//! # Overview
//! Holds the `Client` record, the `ClientStore` persistence gateway with its
//! SQLite implementation, and the `ClientService` the HTTP layer calls into.
//!
//! # Design
//! - The store assigns ids; drafts never carry one.
//! - Absence is reported as `None` / `false`, never as an error.
//! - No HTTP types leak into this crate.

pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use model::{Client, ClientDraft, ClientFields, ClientId, FieldValue};
pub use service::ClientService;
pub use store::{ClientStore, SqliteClientStore};
