/// Canvas, export and portrait geometry.
pub mod geometry;
/// Corner-anchored logo placement.
pub mod logo;
