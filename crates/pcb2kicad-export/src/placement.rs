use pcb2kicad_core::{coord_to_mm, Coord, Element, FIXED_ROTATION_ATTR};

/// Pin numbers tried, in priority order, as the orientation reference.
pub const REFERENCE_PIN_NAMES: [&str; 6] = ["1", "2", "A1", "A2", "B1", "B2"];

/// Footprint placement: origin in millimetres and rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub mirrored: bool,
    sin: f64,
    cos: f64,
}

impl Placement {
    #[must_use]
    pub fn for_element(element: &Element) -> Self {
        let r = rotation_of(element);
        let (sin, cos) = rotation_unit(r);
        Self {
            x: coord_to_mm(element.mark_x),
            y: coord_to_mm(element.mark_y),
            r,
            mirrored: element.on_solder,
            sin,
            cos,
        }
    }

    /// Footprint-local position of a board point, in millimetres.
    #[must_use]
    pub fn local(&self, x: Coord, y: Coord) -> (f64, f64) {
        self.local_mm(coord_to_mm(x), coord_to_mm(y))
    }

    #[must_use]
    pub fn local_mm(&self, x: f64, y: f64) -> (f64, f64) {
        let xr = x - self.x;
        let yr = y - self.y;
        (xr * self.cos - yr * self.sin, xr * self.sin + yr * self.cos)
    }
}

/// `(sin, cos)` of `rotation_deg`, exact for the four right angles.
#[must_use]
pub fn rotation_unit(rotation_deg: f64) -> (f64, f64) {
    if rotation_deg == 0.0 {
        (0.0, 1.0)
    } else if rotation_deg == 90.0 {
        (1.0, 0.0)
    } else if rotation_deg == 180.0 {
        (0.0, -1.0)
    } else if rotation_deg == 270.0 {
        (-1.0, 0.0)
    } else {
        rotation_deg.to_radians().sin_cos()
    }
}

#[must_use]
pub fn transform_offset(x: f64, y: f64, rotation_deg: f64) -> (f64, f64) {
    let (s, c) = rotation_unit(rotation_deg);
    (x * c - y * s, x * s + y * c)
}

/// Sector classification of a reference-pin offset. Two-pin parts and larger
/// parts use different sector tables.
#[must_use]
pub fn xy_to_angle(x: f64, y: f64, more_than_two_pins: bool) -> f64 {
    let d = (-y).atan2(x).to_degrees();
    if more_than_two_pins {
        if d < -100.0 {
            90.0
        } else if d < -10.0 {
            180.0
        } else if d < 80.0 {
            270.0
        } else if d < 170.0 {
            0.0
        } else {
            90.0
        }
    } else if d < -175.0 {
        0.0
    } else if d < -85.0 {
        90.0
    } else if d < 5.0 {
        180.0
    } else if d < 95.0 {
        270.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
struct RefPin {
    x: f64,
    y: f64,
    angle: f64,
}

/// Rotation of a footprint in degrees.
///
/// A `xy-fixed-rotation` attribute wins outright. Otherwise the first
/// reference pin that is found decides: its own angle for one-terminal parts,
/// else the sector of its offset from the mark. Anything else is 0.
#[must_use]
pub fn rotation_of(element: &Element) -> f64 {
    if let Some(fixed) = element.attribute(FIXED_ROTATION_ATTR) {
        return match fixed.trim().parse::<f64>() {
            Ok(theta) if theta.is_finite() => theta,
            _ => {
                tracing::warn!(
                    refdes = %element.refdes.string,
                    value = fixed,
                    "ignoring unusable fixed rotation"
                );
                0.0
            }
        };
    }

    let mut found: [Option<RefPin>; REFERENCE_PIN_NAMES.len()] = [None; REFERENCE_PIN_NAMES.len()];
    for pin in &element.pins {
        if let Some(slot) = REFERENCE_PIN_NAMES.iter().position(|n| *n == pin.number) {
            found[slot] = Some(RefPin {
                x: pin.x as f64,
                y: pin.y as f64,
                angle: 0.0,
            });
        }
    }
    for pad in &element.pads {
        if let Some(slot) = REFERENCE_PIN_NAMES.iter().position(|n| *n == pad.number) {
            let (x1, y1) = (pad.p1.x as f64, pad.p1.y as f64);
            let (x2, y2) = (pad.p2.x as f64, pad.p2.y as f64);
            found[slot] = Some(RefPin {
                x: (x1 + x2) / 2.0,
                y: (y1 + y2) / 2.0,
                // Board y grows downward.
                angle: (y1 - y2).atan2(x2 - x1).to_degrees(),
            });
        }
    }

    let pin_cnt = element.pins.len() + element.pads.len();
    for pin in found.iter().flatten() {
        let mut dx = pin.x - element.mark_x as f64;
        let dy = pin.y - element.mark_y as f64;
        if element.on_solder {
            dx = -dx;
        }
        if pin_cnt == 1 {
            return pin.angle;
        }
        if dx != 0.0 || dy != 0.0 {
            return xy_to_angle(dx, dy, pin_cnt > 2);
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn right_angles_are_exact() {
        assert_eq!(transform_offset(1.0, 2.0, 90.0), (-2.0, 1.0));
        assert_eq!(transform_offset(1.0, 2.0, 180.0), (-1.0, -2.0));
        assert_eq!(transform_offset(1.0, 2.0, 270.0), (2.0, -1.0));
        assert_eq!(transform_offset(1.0, 2.0, 0.0), (1.0, 2.0));
    }

    #[test]
    fn other_angles_use_trigonometry() {
        let (x, y) = transform_offset(1.0, 0.0, 45.0);
        assert_relative_eq!(x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn sector_boundaries_are_half_open() {
        // d = atan2(-y, x); pick offsets that land exactly on a boundary.
        let at = |deg: f64| {
            let (s, c) = deg.to_radians().sin_cos();
            (c * 10.0, -s * 10.0)
        };
        let (x, y) = at(0.0);
        assert_eq!(xy_to_angle(x, y, false), 180.0);
        assert_eq!(xy_to_angle(x, y, true), 270.0);
        let (x, y) = at(120.0);
        assert_eq!(xy_to_angle(x, y, false), 0.0);
        assert_eq!(xy_to_angle(x, y, true), 0.0);
        let (x, y) = at(-120.0);
        assert_eq!(xy_to_angle(x, y, false), 90.0);
        assert_eq!(xy_to_angle(x, y, true), 90.0);
        let (x, y) = at(179.0);
        assert_eq!(xy_to_angle(x, y, true), 90.0);
    }

    #[test]
    fn local_offsets_rotate_about_the_mark() {
        let mut element = Element {
            mark_x: 1_000_000,
            mark_y: 1_000_000,
            ..Element::default()
        };
        element
            .attributes
            .insert(FIXED_ROTATION_ATTR.to_string(), "90".to_string());
        let placement = Placement::for_element(&element);
        assert_eq!(placement.r, 90.0);
        assert_eq!(placement.local(3_000_000, 1_000_000), (0.0, 2.0));
    }

    #[test]
    fn bad_fixed_rotation_falls_back_to_zero() {
        let mut element = Element::default();
        element
            .attributes
            .insert(FIXED_ROTATION_ATTR.to_string(), "sideways".to_string());
        assert_eq!(rotation_of(&element), 0.0);

        for value in ["inf", "-inf", "NaN"] {
            element
                .attributes
                .insert(FIXED_ROTATION_ATTR.to_string(), value.to_string());
            assert_eq!(rotation_of(&element), 0.0, "{value}");
        }
    }
}
