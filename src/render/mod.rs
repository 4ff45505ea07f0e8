//! CPU drawing and output encoding.
//!
//! All drawing takes base-canvas coordinates; [`surface::Surface`] applies the export scale.

pub mod encode;
pub mod frame;
pub mod surface;
pub mod text;
