// src/extract/mod.rs
// =============================================================================
// Turning fetched pages into links.
//
// Submodules:
// - normalize: canonical form of a single href (the identity of a page)
// - html: finds every <a> on a page and normalizes its href
// =============================================================================

mod html;
mod normalize;

pub use html::extract_links;
pub use normalize::normalize;
