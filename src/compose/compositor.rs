use std::sync::Arc;

use serde::Serialize;

use crate::{
    assets::cache::{ImageCache, LruEviction},
    assets::decode::DecodedImage,
    assets::fetch::{DefaultFetcher, ImageFetcher},
    assets::fonts::FontSet,
    assets::loader::ImageLoader,
    compose::hooks::{CompositionEvent, CompositionObserver, EventKind, dispatch},
    config::CompositorConfig,
    foundation::core::{Rect, Rgba8},
    foundation::error::PostcardResult,
    layout::geometry::{
        ExportGeometry, PortraitPlacement, resolve_base_canvas, resolve_export_geometry,
        resolve_photo_area, resolve_portrait,
    },
    layout::logo::resolve_logo_placement,
    model::request::ComposeRequest,
    render::encode::{ComposedImage, encode_frame},
    render::frame::draw_frame,
    render::surface::{RasterFrame, Surface},
    render::text::{META_ANCHOR, SLOGAN_ANCHOR, TextPainter, compose_meta_line, slogan_line},
};

/// Everything [`Compositor::render`] draws, resolved in base-canvas coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionLayout {
    /// Base and output sizes.
    pub export: ExportGeometry,
    /// Clip rectangle for the portrait, also the frame anchor.
    pub photo_area: Rect,
    /// Portrait scale, center and transform.
    pub portrait: PortraitPlacement,
    /// Logo rectangle, when a logo is drawn.
    pub logo: Option<Rect>,
    /// Slogan text, when drawn.
    pub slogan: Option<String>,
    /// Joined metadata line, when drawn.
    pub meta_line: Option<String>,
}

struct Prepared {
    background: Arc<DecodedImage>,
    portrait: Arc<DecodedImage>,
    logo: Option<Arc<DecodedImage>>,
    layout: CompositionLayout,
}

/// Composes postcards from templates and user portraits.
///
/// Owns the image loader (and its cache), lazily resolved fonts, and the observers that
/// receive [`CompositionEvent`]s. One compositor is meant to serve many requests.
pub struct Compositor {
    config: CompositorConfig,
    loader: ImageLoader,
    fonts: Option<Arc<FontSet>>,
    observers: Vec<Arc<dyn CompositionObserver>>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .field("fonts_resolved", &self.fonts.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

impl Compositor {
    /// Compositor reading sources through a [`DefaultFetcher`] rooted at `config.assets_root`.
    pub fn new(config: CompositorConfig) -> Self {
        let fetcher = match &config.assets_root {
            Some(root) => DefaultFetcher::with_assets_root(root),
            None => DefaultFetcher::new(),
        };
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Compositor reading sources through `fetcher`.
    pub fn with_fetcher(config: CompositorConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let cache = match config.cache_capacity {
            Some(capacity) => ImageCache::with_policy(LruEviction::new(capacity)),
            None => ImageCache::new(),
        };
        Self::with_loader(config, ImageLoader::with_cache(fetcher, cache))
    }

    /// Compositor using a preconfigured loader.
    pub fn with_loader(config: CompositorConfig, loader: ImageLoader) -> Self {
        Self {
            config,
            loader,
            fonts: None,
            observers: Vec::new(),
        }
    }

    /// Register an observer for [`CompositionEvent`]s.
    pub fn add_observer(&mut self, observer: Arc<dyn CompositionObserver>) {
        self.observers.push(observer);
    }

    /// Use `fonts` instead of resolving them from config and system fonts.
    pub fn set_fonts(&mut self, fonts: FontSet) {
        self.fonts = Some(Arc::new(fonts));
    }

    /// Active configuration.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Image loader, e.g. to inspect cache statistics.
    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Mutable image loader, e.g. to clear the cache.
    pub fn loader_mut(&mut self) -> &mut ImageLoader {
        &mut self.loader
    }

    fn fonts(&mut self) -> PostcardResult<Arc<FontSet>> {
        if let Some(fonts) = &self.fonts {
            return Ok(fonts.clone());
        }
        let fonts = Arc::new(FontSet::resolve(
            self.config.font_regular.as_deref(),
            self.config.font_bold.as_deref(),
        )?);
        self.fonts = Some(fonts.clone());
        Ok(fonts)
    }

    fn prepare(&mut self, request: &ComposeRequest) -> PostcardResult<Prepared> {
        let template = &request.template;
        let logo_source = template.logo_source().cloned();

        let mut sources = vec![template.background.clone(), request.user_image.clone()];
        sources.extend(logo_source.iter().cloned());
        let mut images = self.loader.load_all(&sources)?.into_iter();
        let (Some(background), Some(portrait)) = (images.next(), images.next()) else {
            return Err(request.user_image.load_error("loader returned too few images"));
        };
        let logo = images.next();

        let base = resolve_base_canvas(
            template.declared_canvas(),
            background.size(),
            self.config.fallback_canvas,
        );
        let export = resolve_export_geometry(base, request.export_scale, self.config.max_dimension);
        let photo_area = resolve_photo_area(&template.photo_area, base);
        let portrait_placement =
            resolve_portrait(photo_area, portrait.size(), base, &request.transform);

        let logo_rect = logo
            .as_ref()
            .filter(|_| self.config.draw_logo)
            .map(|img| resolve_logo_placement(template.logo_position, base, img.size()));

        let layout = CompositionLayout {
            export,
            photo_area,
            portrait: portrait_placement,
            logo: logo_rect,
            slogan: slogan_line(&request.meta, &template.slogan).map(str::to_string),
            meta_line: compose_meta_line(&request.meta),
        };

        Ok(Prepared {
            background,
            portrait,
            logo,
            layout,
        })
    }

    /// Load the request's images and resolve where everything goes, without drawing.
    pub fn layout(&mut self, request: &ComposeRequest) -> PostcardResult<CompositionLayout> {
        Ok(self.prepare(request)?.layout)
    }

    /// Draw the postcard for `request` into a premultiplied RGBA frame.
    ///
    /// Fails with [`crate::PostcardError::ImageLoad`] when any source cannot be loaded and
    /// with [`crate::PostcardError::RenderSurfaceUnavailable`] when no surface fits the
    /// target size.
    #[tracing::instrument(skip_all, fields(template = %request.template.id))]
    pub fn render(&mut self, request: &ComposeRequest) -> PostcardResult<RasterFrame> {
        let Prepared {
            background,
            portrait,
            logo,
            layout,
        } = self.prepare(request)?;
        let export = &layout.export;
        tracing::debug!(
            base_w = export.base.width,
            base_h = export.base.height,
            target_w = export.target.width,
            target_h = export.target.height,
            "resolved export geometry"
        );

        let mut surface = Surface::new(export.target, export.surface_transform())?;
        surface.draw_image_in_rect(&background, export.base.rect())?;

        surface.push_clip(layout.photo_area);
        surface.draw_image(&portrait, layout.portrait.transform)?;
        surface.pop_clip();

        draw_frame(&mut surface, layout.photo_area, request.frame_style);

        if let (Some(logo), Some(rect)) = (logo.as_deref(), layout.logo) {
            surface.draw_image_in_rect(logo, rect)?;
        }

        if layout.slogan.is_some() || layout.meta_line.is_some() {
            let fonts = self.fonts()?;
            let mut painter = TextPainter::new(&fonts);
            let base_h = f64::from(export.base.height);
            if let Some(slogan) = &layout.slogan {
                painter.draw_line(&mut surface, slogan, &SLOGAN_ANCHOR, base_h, Rgba8::WHITE);
            }
            if let Some(meta) = &layout.meta_line {
                painter.draw_line(&mut surface, meta, &META_ANCHOR, base_h, Rgba8::WHITE);
            }
        }

        Ok(surface.finish())
    }

    /// Render and encode the postcard, then emit a [`EventKind::Generate`] event.
    #[tracing::instrument(skip_all, fields(template = %request.template.id))]
    pub fn compose(&mut self, request: &ComposeRequest) -> PostcardResult<ComposedImage> {
        let frame = self.render(request)?;
        let image = encode_frame(&frame, self.config.format, self.config.jpeg_quality)?;
        tracing::info!(
            width = image.width,
            height = image.height,
            bytes = image.bytes.len(),
            format = ?image.format,
            "composed postcard"
        );
        self.emit(EventKind::Generate, request);
        Ok(image)
    }

    /// Report that the result of `request` was downloaded.
    pub fn notify_download(&self, request: &ComposeRequest) {
        self.emit(EventKind::Download, request);
    }

    fn emit(&self, kind: EventKind, request: &ComposeRequest) {
        if self.observers.is_empty() {
            return;
        }
        dispatch(&self.observers, &CompositionEvent::from_request(kind, request));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
