//! Network clients: the remote API and the chat-assist proxy.

pub mod api;
pub mod chat;

#[cfg(test)]
pub(crate) mod mock;

pub use api::{Action, ApiClient, ApiError, Envelope, HttpTransport, Transport};
pub use chat::{ChatClient, ChatError};
