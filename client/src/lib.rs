//! Homeroom client: remote API access, chat-assist, page controllers and
//! local preference storage.
//!
//! The `forms` crate holds the data model and every pure transformation;
//! this crate adds the I/O around it.

pub mod config;
pub mod net;
pub mod state;
pub mod store;

pub use config::{ClientConfig, Timeouts};
pub use net::{ApiClient, ApiError, ChatClient, ChatError};
pub use state::ControllerError;
