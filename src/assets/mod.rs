//! Image sources and how they become decoded pixels.
//!
//! Loading is front-loaded: the compositor resolves every image a request needs before any
//! drawing starts, so renderers never perform IO.

pub mod cache;
pub mod decode;
pub mod fetch;
pub mod fonts;
pub mod loader;
pub mod source;
