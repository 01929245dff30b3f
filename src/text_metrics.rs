//! System-font text metrics.
//!
//! The face is resolved through `fontdb` on first use and advances are read
//! with `ttf-parser`. When no face resolves, widths come from the calibrated
//! glyph table instead.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

use crate::layout::text::{GlyphTable, TextMeasure, char_width_factor};

pub struct FontMetrics {
    font_family: String,
    font_size: f32,
    face: OnceCell<Option<FontFace>>,
}

impl FontMetrics {
    pub fn new(font_family: &str, font_size: f32) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            face: OnceCell::new(),
        }
    }

    /// Whether a system face was found for the configured family.
    pub fn has_face(&self) -> bool {
        self.face().is_some()
    }

    fn face(&self) -> Option<&FontFace> {
        self.face
            .get_or_init(|| {
                let face = load_face(&self.font_family);
                if face.is_none() {
                    tracing::debug!(
                        family = %self.font_family,
                        "no system font resolved, using glyph table"
                    );
                }
                face
            })
            .as_ref()
    }
}

impl TextMeasure for FontMetrics {
    fn measure(&self, text: &str) -> f32 {
        if text.is_empty() || self.font_size <= 0.0 {
            return 0.0;
        }
        match self.face() {
            Some(face) => face.measure_width(text, self.font_size),
            None => GlyphTable::new(self.font_size).measure(text),
        }
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    glyph_cache: Mutex<HashMap<char, Option<u16>>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            glyph_cache: Mutex::new(HashMap::new()),
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let mut width = 0.0f32;
        for ch in text.chars() {
            let advance = match ch {
                '\n' => continue,
                '\t' => self.advance(' ').map(|space| space.saturating_mul(4)),
                _ => self.advance(ch),
            };
            width += match advance {
                Some(units) => units as f32 * scale,
                None => char_width_factor(ch) * font_size,
            };
        }
        width.max(0.0)
    }

    fn advance(&self, ch: char) -> Option<u16> {
        if ch.is_ascii() {
            return Some(self.ascii_advances[ch as usize]).filter(|advance| *advance > 0);
        }
        let mut cache = self.glyph_cache.lock().ok()?;
        if let Some(cached) = cache.get(&ch) {
            return *cached;
        }
        let advance = Face::parse(&self.data, self.index).ok().and_then(|face| {
            let glyph = face.glyph_index(ch)?;
            face.glyph_hor_advance(glyph)
        });
        cache.insert(ch, advance);
        advance
    }
}

fn load_face(font_family: &str) -> Option<FontFace> {
    let names = family_names(font_family);
    let families: Vec<Family<'_>> = names
        .iter()
        .map(|name| match generic_family(name) {
            Some(generic) => generic,
            None => Family::Name(name.as_str()),
        })
        .collect();

    let mut db = Database::new();
    db.load_system_fonts();
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
        .flatten()
}

/// Splits a CSS-style font stack, always ending on a generic sans face.
fn family_names(font_family: &str) -> Vec<String> {
    let mut names: Vec<String> = font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if !names.iter().any(|name| generic_family(name).is_some()) {
        names.push("sans-serif".to_string());
    }
    names
}

fn generic_family(name: &str) -> Option<Family<'static>> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Some(Family::Serif),
        "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Some(Family::SansSerif),
        "monospace" | "ui-monospace" => Some(Family::Monospace),
        "cursive" => Some(Family::Cursive),
        "fantasy" => Some(Family::Fantasy),
        _ => None,
    }
}
