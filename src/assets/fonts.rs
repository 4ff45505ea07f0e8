use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::PostcardResult;

/// Font bytes plus the face index inside a collection file.
#[derive(Clone)]
pub struct FontFace {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index (non-zero only for `.ttc` collections).
    pub index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    /// Face from in-memory font data.
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index,
        }
    }

    /// Face read from a font file on disk.
    pub fn from_path(path: &Path) -> PostcardResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes, 0))
    }
}

/// Regular and bold faces used for the text overlays.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    /// Face for the metadata line.
    pub regular: Option<FontFace>,
    /// Face for the slogan; falls back to `regular`.
    pub bold: Option<FontFace>,
}

impl FontSet {
    /// Face for regular-weight text.
    pub fn regular(&self) -> Option<&FontFace> {
        self.regular.as_ref().or(self.bold.as_ref())
    }

    /// Face for bold text, falling back to the regular face.
    pub fn bold(&self) -> Option<&FontFace> {
        self.bold.as_ref().or(self.regular.as_ref())
    }

    /// `true` when no face is available and text drawing is skipped.
    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }

    /// Resolve faces: explicit files first, then sans-serif system fonts.
    pub fn resolve(regular: Option<&Path>, bold: Option<&Path>) -> PostcardResult<Self> {
        let mut set = Self {
            regular: regular.map(FontFace::from_path).transpose()?,
            bold: bold.map(FontFace::from_path).transpose()?,
        };
        if set.regular.is_some() && set.bold.is_some() {
            return Ok(set);
        }

        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");

        if set.regular.is_none() {
            set.regular = query_sans(&db, usvg::fontdb::Weight::NORMAL);
        }
        if set.bold.is_none() {
            set.bold = query_sans(&db, usvg::fontdb::Weight::BOLD);
        }
        if set.is_empty() {
            tracing::warn!("no usable fonts found; text overlays will be skipped");
        }
        Ok(set)
    }
}

fn query_sans(db: &usvg::fontdb::Database, weight: usvg::fontdb::Weight) -> Option<FontFace> {
    let families = [
        usvg::fontdb::Family::Name("PingFang SC"),
        usvg::fontdb::Family::Name("Inter"),
        usvg::fontdb::Family::SansSerif,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        weight,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };

    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, index| FontFace::from_bytes(data.to_vec(), index))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
