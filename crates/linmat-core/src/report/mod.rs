//! Presentation of matrices: printf-style text and HTML tables.
mod html;
pub mod text;

pub use text::NumberFormat;
