//! Core types, validation, and escaping for the contact relay.

pub mod error;
pub mod escape;
pub mod limits;
pub mod submission;

pub use error::{Error, Result};
pub use escape::escape_html;
pub use submission::*;
