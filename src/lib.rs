//! Postcard compositor: turns a designer template and a user portrait into a finished image.
//!
//! A [`Template`] declares a background, a normalized photo area, an optional corner logo and
//! a slogan. A [`ComposeRequest`] adds the user's portrait, how it is panned, zoomed and
//! rotated, which personal fields to print, a border style and an export scale.
//!
//! # Pipeline overview
//!
//! 1. **Load**: background, portrait and logo are fetched and decoded in parallel through an
//!    [`ImageLoader`] with a memoizing [`ImageCache`]. Any failure aborts the request.
//! 2. **Layout**: base canvas, capped output size, photo rectangle, cover-fit portrait
//!    transform and logo rectangle are resolved in base-canvas coordinates.
//! 3. **Draw**: background, clipped portrait, frame, logo, slogan and metadata line, in that
//!    order, on a `vello_cpu` surface scaled to the output size.
//! 4. **Encode**: JPEG (default) or PNG via [`encode_frame`].
//!
//! Pixels are **premultiplied RGBA8** until encoding.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod compose;
mod config;
mod foundation;
mod layout;
mod model;
mod render;

pub use assets::cache::{CacheStats, EvictionPolicy, ImageCache, LruEviction, NeverEvict};
pub use assets::decode::{DecodedImage, decode_image};
pub use assets::fetch::{DefaultFetcher, ImageFetcher, MemoryFetcher};
pub use assets::fonts::{FontFace, FontSet};
pub use assets::loader::ImageLoader;
pub use assets::source::{ImageSource, SourceKind, normalize_rel_path};
pub use compose::compositor::{CompositionLayout, Compositor};
pub use compose::hooks::{CompositionEvent, CompositionObserver, EventKind, RecordingObserver};
pub use config::{
    CompositorConfig, ENV_ASSETS_ROOT, ENV_DRAW_LOGO, ENV_JPEG_QUALITY, ENV_MAX_DIMENSION,
};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{PostcardError, PostcardResult};
pub use layout::geometry::{
    ExportGeometry, FALLBACK_CANVAS, MAX_EXPORT_DIMENSION, PortraitPlacement, cover_scale,
    resolve_base_canvas, resolve_export_geometry, resolve_photo_area, resolve_portrait,
};
pub use layout::logo::resolve_logo_placement;
pub use model::request::{ComposeRequest, FrameStyle, MetaInfo, PhotoTransform};
pub use model::template::{AspectRatio, LogoPosition, PhotoArea, Template, TemplateId};
pub use render::encode::{ComposedImage, DEFAULT_JPEG_QUALITY, ExportFormat, encode_frame};
pub use render::frame::{StampBump, stamp_border_path, stamp_bump_count, stamp_bumps};
pub use render::surface::RasterFrame;
pub use render::text::{META_SEPARATOR, compose_meta_line};
