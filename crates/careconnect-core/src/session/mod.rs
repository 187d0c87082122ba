//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: identity, session id and navigation types
//! - `store`: key-value persistence trait and the in-memory store
//! - `error`: operation errors and validation failures
//! - `pending`: busy indicator released on every exit path
//! - `controller`: session lifecycle, chat and upload (`SessionController`)
//!
//! # Usage
//!
//! ```ignore
//! use careconnect_core::session::{SessionController, ControllerSettings, MemorySessionStore};
//! ```

mod controller;
mod error;
mod model;
mod pending;
mod store;

pub use controller::{ChatOutcome, ControllerSettings, SessionController};
pub use error::{MIN_PASSWORD_LEN, SessionError, ValidationError};
pub use model::{
    AuthForm, GUEST_EMAIL, GUEST_NAME, Identity, Notice, PersistenceScope, SessionId, User, View,
};
pub use pending::{BusyIndicator, PendingGuard};
pub use store::{MemorySessionStore, SessionStore, StoreKey};
