//! Vector font loading and glyph outline extraction
//!
//! Fonts are TrueType/OpenType files parsed with `ttf-parser`. Glyph outlines are
//! converted to `lyon` paths in world units so they can be tessellated and
//! extruded by [`crate::gfx::geometry::text`].

use std::path::{Path, PathBuf};

use lyon::math::point;
use lyon::path::Path as OutlinePath;

use super::AssetError;

/// A parsed font file kept as raw bytes
///
/// The bytes are validated once on load; [`VectorFont::face`] re-borrows them
/// whenever outlines are needed.
pub struct VectorFont {
    path: PathBuf,
    data: Vec<u8>,
}

impl VectorFont {
    /// Reads and validates a font file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref().to_path_buf();
        let data = std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_bytes(path, data)
    }

    /// Validates font bytes obtained elsewhere
    pub fn from_bytes(path: PathBuf, data: Vec<u8>) -> Result<Self, AssetError> {
        ttf_parser::Face::parse(&data, 0).map_err(|source| AssetError::Font {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded font {} ({} bytes)", path.display(), data.len());
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn face(&self) -> Result<ttf_parser::Face<'_>, AssetError> {
        ttf_parser::Face::parse(&self.data, 0).map_err(|source| AssetError::Font {
            path: self.path.clone(),
            source,
        })
    }

    /// Lays `text` out on a single baseline and returns the combined outline
    ///
    /// `size` is the em height in world units. Characters the font cannot map
    /// are skipped.
    pub fn text_outline(&self, text: &str, size: f32) -> Result<OutlinePath, AssetError> {
        let face = self.face()?;
        let scale = size / f32::from(face.units_per_em());

        let mut outline = PathOutline::new(scale);
        let mut glyphs_drawn = 0usize;

        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                log::debug!("Font {} has no glyph for {:?}", self.path.display(), ch);
                continue;
            };

            if face.outline_glyph(glyph, &mut outline).is_some() {
                glyphs_drawn += 1;
            }
            outline.advance(f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)));
        }

        if glyphs_drawn == 0 {
            return Err(AssetError::EmptyText(text.to_string()));
        }

        Ok(outline.build())
    }
}

/// Collects glyph contours into a `lyon` path, scaled and offset by the pen
pub struct PathOutline {
    builder: lyon::path::path::Builder,
    scale: f32,
    pen_x: f32,
    contour_open: bool,
}

impl PathOutline {
    pub fn new(scale: f32) -> Self {
        Self {
            builder: OutlinePath::builder(),
            scale,
            pen_x: 0.0,
            contour_open: false,
        }
    }

    /// Moves the pen right by an advance expressed in font units
    pub fn advance(&mut self, font_units: f32) {
        self.pen_x += font_units * self.scale;
    }

    pub fn build(mut self) -> OutlinePath {
        self.finish_contour(false);
        self.builder.build()
    }

    fn to_world(&self, x: f32, y: f32) -> lyon::math::Point {
        point(self.pen_x + x * self.scale, y * self.scale)
    }

    fn finish_contour(&mut self, close: bool) {
        if self.contour_open {
            self.builder.end(close);
            self.contour_open = false;
        }
    }
}

impl ttf_parser::OutlineBuilder for PathOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish_contour(true);
        let at = self.to_world(x, y);
        self.builder.begin(at);
        self.contour_open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.to_world(x, y);
        self.builder.line_to(to);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.to_world(x1, y1);
        let to = self.to_world(x, y);
        self.builder.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let ctrl1 = self.to_world(x1, y1);
        let ctrl2 = self.to_world(x2, y2);
        let to = self.to_world(x, y);
        self.builder.cubic_bezier_to(ctrl1, ctrl2, to);
    }

    fn close(&mut self) {
        self.finish_contour(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::path::PathEvent;
    use ttf_parser::OutlineBuilder;

    #[test]
    fn test_outline_scales_and_offsets_contours() {
        let mut outline = PathOutline::new(0.5);
        outline.advance(10.0);
        outline.move_to(0.0, 0.0);
        outline.line_to(2.0, 0.0);
        outline.line_to(2.0, 2.0);
        outline.close();

        let path = outline.build();
        let events: Vec<PathEvent> = path.iter().collect();

        match events.first() {
            Some(PathEvent::Begin { at }) => {
                assert_eq!(at.x, 5.0);
                assert_eq!(at.y, 0.0);
            }
            other => panic!("unexpected first event {:?}", other),
        }
        assert!(matches!(
            events.last(),
            Some(PathEvent::End { close: true, .. })
        ));
    }

    #[test]
    fn test_unclosed_contour_is_finished_on_build() {
        let mut outline = PathOutline::new(1.0);
        outline.move_to(0.0, 0.0);
        outline.quad_to(1.0, 1.0, 2.0, 0.0);

        let path = outline.build();
        let ends = path
            .iter()
            .filter(|event| matches!(event, PathEvent::End { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_invalid_font_bytes_are_rejected() {
        let result = VectorFont::from_bytes(PathBuf::from("bogus.ttf"), vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(AssetError::Font { .. })));
    }

    #[test]
    fn test_missing_font_file_reports_path() {
        let err = VectorFont::load("definitely/not/here.ttf")
            .err()
            .expect("loading a missing file must fail");
        assert!(err.to_string().contains("definitely/not/here.ttf"));
    }
}
