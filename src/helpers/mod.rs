//! Helper functions for presentation and feed output
//!
//! Pure, stateless functions that consume `PostRecord` fields: title and
//! date formatting, reading-time icons, and text escaping for HTML/XML.

mod date;
mod format;
mod html;

pub use date::*;
pub use format::*;
pub use html::*;
