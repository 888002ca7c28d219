//! Website preview-image extraction.
//!
//! The only part of the pipeline that touches the network.

mod html;
mod http;

pub use html::scan_preview_image;
pub use http::HttpPreviewExtractor;
