//! Access to the hosted campaign store and the per-viewer board session.
//!
//! Everything goes through the [`RemoteStore`](remote::RemoteStore)
//! contract. [`rest::PostgrestStore`] talks to the hosted PostgREST
//! interface; [`memory::MemoryStore`] keeps tables in process for tests and
//! local development. Accounts are managed through the
//! [`AuthAdmin`](auth_admin::AuthAdmin) contract.

pub mod auth_admin;
pub mod board;
pub mod connector;
pub mod error;
pub mod memory;
pub mod models;
pub mod remote;
pub mod repositories;
pub mod rest;

pub use auth_admin::{AuthAdmin, AuthUser, NewAuthUser};
pub use board::{Board, BoardError, DragOutcome};
pub use connector::{PostgrestConnector, StaticConnector, StoreConnector};
pub use error::StoreError;
pub use remote::{Filter, Query, RemoteStore};
