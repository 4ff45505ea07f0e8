use smallvec::SmallVec;

use crate::{
    assets::fonts::{FontFace, FontSet},
    foundation::core::{Point, Rgba8},
    model::request::MetaInfo,
    render::surface::Surface,
};

/// Separator between metadata fields.
pub const META_SEPARATOR: &str = " · ";

/// Where and how a line of overlay text is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextAnchor {
    /// Left edge of the text.
    pub x: f64,
    /// Baseline distance from the bottom of the base canvas.
    pub baseline_from_bottom: f64,
    /// Font size in base-canvas pixels.
    pub size_px: f32,
    /// Use the bold face.
    pub bold: bool,
}

impl TextAnchor {
    /// Baseline origin for a canvas of height `canvas_height`.
    pub fn baseline(&self, canvas_height: f64) -> Point {
        Point::new(self.x, canvas_height - self.baseline_from_bottom)
    }
}

/// Slogan line: bold, 56 px, baseline 160 px above the bottom edge.
pub const SLOGAN_ANCHOR: TextAnchor = TextAnchor {
    x: 56.0,
    baseline_from_bottom: 160.0,
    size_px: 56.0,
    bold: true,
};

/// Metadata line: regular, 36 px, baseline 100 px above the bottom edge.
pub const META_ANCHOR: TextAnchor = TextAnchor {
    x: 56.0,
    baseline_from_bottom: 100.0,
    size_px: 36.0,
    bold: false,
};

/// Slogan text to draw, if enabled and non-empty.
pub fn slogan_line<'a>(meta: &MetaInfo, slogan: &'a str) -> Option<&'a str> {
    (meta.show_slogan && !slogan.is_empty()).then_some(slogan)
}

/// Join the enabled, non-empty fields as `name · college · year`.
///
/// Returns `None` when nothing would be drawn.
pub fn compose_meta_line(meta: &MetaInfo) -> Option<String> {
    let fields: SmallVec<[&str; 3]> = [
        (meta.show_name, meta.display_name.as_str()),
        (meta.show_college, meta.college.as_str()),
        (meta.show_year, meta.graduation_year.as_str()),
    ]
    .into_iter()
    .filter(|(shown, value)| *shown && !value.is_empty())
    .map(|(_, value)| value)
    .collect();

    (!fields.is_empty()).then(|| fields.join(META_SEPARATOR))
}

/// Brush carried through Parley layout; the painter supplies the fill color itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Builds single-line Parley layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` with the first family registered from `font_bytes`.
    ///
    /// Returns `None` when the font data exposes no usable family.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
    ) -> Option<parley::Layout<TextBrushRgba8>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id)?;
        let family_name = self.font_ctx.collection.family_name(family_id)?.to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }
}

/// Draws overlay text with the faces in a [`FontSet`].
pub(crate) struct TextPainter<'a> {
    fonts: &'a FontSet,
    engine: TextLayoutEngine,
}

impl<'a> TextPainter<'a> {
    pub(crate) fn new(fonts: &'a FontSet) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
        }
    }

    /// Draw `text` with its first baseline at `anchor` on a canvas `canvas_height` tall.
    ///
    /// Missing fonts or unshapeable text leave the surface untouched.
    pub(crate) fn draw_line(
        &mut self,
        surface: &mut Surface,
        text: &str,
        anchor: &TextAnchor,
        canvas_height: f64,
        color: Rgba8,
    ) {
        let face = if anchor.bold {
            self.fonts.bold()
        } else {
            self.fonts.regular()
        };
        let Some(face) = face else {
            tracing::warn!(text, "no font available; skipping text overlay");
            return;
        };
        let Some(layout) = self.engine.layout_line(text, &face.bytes, anchor.size_px) else {
            tracing::warn!(text, "font has no usable family; skipping text overlay");
            return;
        };

        let first_baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        let baseline = anchor.baseline(canvas_height);
        let origin = Point::new(baseline.x, baseline.y - first_baseline);
        let font = font_data(face);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                surface.fill_glyphs(&font, run.run().font_size(), origin, color, glyphs);
            }
        }
    }
}

fn font_data(face: &FontFace) -> vello_cpu::peniko::FontData {
    vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
        face.index,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
