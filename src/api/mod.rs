//! API clients for external services
//!
//! - Invidious: video search and adaptive format lookup

pub mod invidious;

pub use invidious::{InvidiousClient, LookupError};
