//! Core domain entities.
//!
//! - [`ShortLink`] - A shortened URL mapping with its click counter

pub mod short_link;

pub use short_link::ShortLink;
