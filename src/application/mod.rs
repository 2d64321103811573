//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and expose the operations
//! the HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::short_link_service::ShortLinkService`] - Short link creation, resolution and removal

pub mod services;
