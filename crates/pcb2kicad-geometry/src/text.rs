use pcb2kicad_core::{Coord, Text, MIL};

use crate::bbox::BoundingBox;

const MAX_FONT_POSITION: usize = 127;

/// Spacing added after every glyph, in mils.
const GLYPH_DELTA_MIL: Coord = 12;

/// Stroke font metrics in mils: (characters, advance width, height).
const GLYPH_TABLE: &[(&str, Coord, Coord)] = &[
    (" ", 18, 0),
    ("!", 5, 50),
    ("\"", 10, 50),
    ("#", 40, 50),
    ("$", 30, 60),
    ("%", 40, 50),
    ("&", 40, 50),
    ("'", 5, 50),
    ("()", 10, 60),
    ("*", 30, 40),
    ("+", 30, 40),
    (",.", 5, 55),
    ("-", 30, 30),
    ("/", 30, 50),
    ("023456789", 30, 50),
    ("1", 20, 50),
    (":;", 5, 45),
    ("<>", 20, 40),
    ("=", 30, 35),
    ("?", 20, 50),
    ("@", 40, 50),
    ("ABCDEFGHKLNOPRSTUVXYZ", 30, 50),
    ("I", 10, 50),
    ("J", 25, 50),
    ("MW", 40, 50),
    ("Q", 35, 55),
    ("[]", 10, 60),
    ("\\", 30, 50),
    ("^", 20, 20),
    ("_", 30, 50),
    ("`", 5, 15),
    ("acenorsuvxz", 20, 50),
    ("bdhk", 20, 50),
    ("fgjpqty", 20, 65),
    ("il", 5, 50),
    ("mw", 30, 50),
    ("{}", 15, 60),
    ("|", 5, 60),
    ("~", 30, 35),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub width: Coord,
    pub delta: Coord,
    pub height: Coord,
}

/// Glyph metrics indexed by byte value. Bytes without a glyph are measured with
/// the default symbol box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    glyphs: [Option<Glyph>; MAX_FONT_POSITION + 1],
    default_width: Coord,
    default_height: Coord,
}

impl Default for Font {
    fn default() -> Self {
        let mut glyphs = Vec::new();
        for &(chars, width, height) in GLYPH_TABLE {
            for ch in chars.bytes() {
                glyphs.push((
                    ch,
                    Glyph {
                        width: width * MIL,
                        delta: GLYPH_DELTA_MIL * MIL,
                        height: height * MIL,
                    },
                ));
            }
        }
        Font::from_glyphs(glyphs)
    }
}

impl Font {
    /// Build a font; the default symbol spans the widest and tallest glyph.
    #[must_use]
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = (u8, Glyph)>) -> Self {
        let mut table = [None; MAX_FONT_POSITION + 1];
        let mut default_width = 0;
        let mut default_height = 0;
        for (ch, glyph) in glyphs {
            if let Some(slot) = table.get_mut(ch as usize) {
                *slot = Some(glyph);
                default_width = default_width.max(glyph.width);
                default_height = default_height.max(glyph.height);
            }
        }
        Self {
            glyphs: table,
            default_width,
            default_height,
        }
    }

    #[must_use]
    pub fn glyph(&self, ch: u8) -> Option<Glyph> {
        self.glyphs.get(ch as usize).copied().flatten()
    }

    /// Unscaled (width, height) of `s`.
    #[must_use]
    pub fn measure(&self, s: &str) -> (Coord, Coord) {
        let mut width = 0;
        let mut height = 0;
        for ch in s.bytes() {
            match self.glyph(ch) {
                Some(g) => {
                    width += g.width + g.delta;
                    height = height.max(g.height);
                }
                None => {
                    width += self.default_width * 6 / 5;
                    height = height.max(self.default_height);
                }
            }
        }
        (width, height)
    }
}

/// Rotate `(x, y)` around `(cx, cy)` by `quadrants * 90°` in board orientation.
#[must_use]
pub fn rotate_point(x: Coord, y: Coord, cx: Coord, cy: Coord, quadrants: u8) -> (Coord, Coord) {
    let dx = x - cx;
    let dy = y - cy;
    match quadrants & 3 {
        0 => (x, y),
        1 => (cx + dy, cy - dx),
        2 => (cx - dx, cy - dy),
        _ => (cx - dy, cy + dx),
    }
}

#[must_use]
pub fn rotate_box(b: &BoundingBox, cx: Coord, cy: Coord, quadrants: u8) -> BoundingBox {
    if b.is_empty() {
        return *b;
    }
    let (ax, ay) = rotate_point(b.x1, b.y1, cx, cy, quadrants);
    let (bx, by) = rotate_point(b.x2, b.y2, cx, cy, quadrants);
    BoundingBox::from_corners(ax, ay, bx, by)
}

/// Box of a text object: glyph advances and the tallest glyph, scaled by the
/// text's percentage, anchored at its origin and turned by its direction.
/// Text on the solder side grows upward and turns the other way.
#[must_use]
pub fn text_bounding_box(font: &Font, text: &Text) -> BoundingBox {
    let (width, height) = font.measure(&text.string);
    let scale = Coord::from(text.scale);
    let width = width * scale / 100;
    let height = height * scale / 100;

    let (x, y) = (text.x, text.y);
    if text.on_solder {
        let b = BoundingBox::from_corners(x, y, x + width, y - height);
        rotate_box(&b, x, y, 4u8.wrapping_sub(text.direction) & 3)
    } else {
        let b = BoundingBox::from_corners(x, y, x + width, y + height);
        rotate_box(&b, x, y, text.direction)
    }
}
