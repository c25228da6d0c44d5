//! Helper functions for templates and generated output
//!
//! These cover URL construction, date formatting and small HTML text
//! utilities shared by the template filters and the generator.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
