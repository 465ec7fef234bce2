//! Reference implementations of the collaborator traits.
//!
//! The pipeline core only knows the traits in [`crate::clients`]; these
//! adapters make the crate usable end-to-end without a hosting platform:
//! a directory-backed file store, a one-document-per-key record store,
//! and an Anthropic Messages-API vision client. Hosts with real backends
//! (object storage, Redis, a managed AI gateway) implement the same
//! traits and ignore this module.

pub mod anthropic;
pub mod dir_kv;
pub mod local_store;

pub use anthropic::AnthropicFeedbackClient;
pub use dir_kv::DirKvStore;
pub use local_store::LocalFileStore;
