use std::io::{self, Write};

use pcb2kicad_core::{coord_to_mm, Element, ObjectRef, Pad, Pin, PinShape, Side};
use pcb2kicad_geometry::element_extents;

use crate::layers::SideLayers;
use crate::placement::Placement;
use crate::sexpr::{fmt_num, quote};
use crate::writer::{arc_end_mm, text_angle, PcbWriter};

const CHAMFER: &str =
    "(chamfer_ratio 0.29365) (chamfer top_left top_right bottom_left bottom_right)";

/// Pad endpoints closer than this (mm) count as coincident.
const PAD_EPS: f64 = 0.0001;

/// KiCad shape keyword and whether the corners are chamfered.
fn pad_shape(shape: PinShape, round: &'static str) -> (&'static str, bool) {
    match shape {
        PinShape::Round => (round, false),
        PinShape::Square => ("rect", false),
        PinShape::Octagon => ("rect", true),
    }
}

/// `zone_connect` value for a terminal with thermals: 2 (solid) when the first
/// copper layer carrying a thermal uses style 3, otherwise 1.
pub(crate) fn zone_connect(thermals: &[u8], copper_layers: usize) -> Option<u8> {
    if thermals.iter().all(|&t| t == 0) {
        return None;
    }
    let first = thermals.iter().take(copper_layers).copied().find(|&t| t != 0);
    Some(if first == Some(3) { 2 } else { 1 })
}

/// Centre, angle and size of an SMD pad in footprint coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PadGeometry {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub w: f64,
    pub h: f64,
}

pub(crate) fn pad_geometry(place: &Placement, pad: &Pad) -> PadGeometry {
    let (x1, y1) = place.local(pad.p1.x, pad.p1.y);
    let (x2, y2) = place.local(pad.p2.x, pad.p2.y);
    let (dx, dy) = (x2 - x1, y2 - y1);
    let thick = coord_to_mm(pad.thickness);
    let mut g = PadGeometry {
        x: (x1 + x2) / 2.0,
        y: (y1 + y2) / 2.0,
        angle: place.r,
        w: thick,
        h: thick,
    };
    if dx.abs() <= PAD_EPS && dy.abs() <= PAD_EPS {
        // Round or square dot.
    } else if dx.abs() <= PAD_EPS {
        g.w = dy.abs() + thick;
        g.angle += 90.0;
    } else if dy.abs() <= PAD_EPS {
        g.w = dx.abs() + thick;
    } else {
        g.angle += (dx / dy).atan().to_degrees();
        g.h = dx.hypot(dy) + thick;
    }
    g
}

impl<W: Write> PcbWriter<'_, W> {
    pub(crate) fn footprint(&mut self, index: usize) -> io::Result<()> {
        let board = self.board;
        let element = &board.elements[index];
        let extents = element_extents(element, &self.font);
        if extents.bbox.is_empty() {
            tracing::warn!(refdes = %element.refdes.string, "element has no pins or pads");
        }
        let place = Placement::for_element(element);
        let side = SideLayers::of(element.side());
        tracing::debug!(
            refdes = %element.refdes.string,
            rotation = place.r,
            horizontal = extents.pins_horizontal,
            "placing footprint"
        );

        let uuid = self.uuid();
        writeln!(
            self.out,
            "\t(footprint {}\n\t\t(layer {})\n\t\t(uuid {uuid})\n\t\t(at {} {} {})",
            quote(&format!("geda:{}", element.description.string)),
            quote(side.copper),
            fmt_num(place.x),
            fmt_num(place.y),
            fmt_num(place.r),
        )?;
        self.properties(element, &place, &side)?;

        for (i, pin) in element.pins.iter().enumerate() {
            self.pin(ObjectRef::Pin { element: index, index: i }, pin, &place)?;
        }
        for (i, pad) in element.pads.iter().enumerate() {
            if pad.thickness > 0 {
                self.pad(ObjectRef::Pad { element: index, index: i }, pad, &place)?;
            }
        }

        for line in &element.lines {
            let (x1, y1) = place.local(line.p1.x, line.p1.y);
            let (x2, y2) = place.local(line.p2.x, line.p2.y);
            let uuid = self.uuid();
            writeln!(
                self.out,
                "\t\t(fp_line\n\t\t\t(start {} {})\n\t\t\t(end {} {})\n\t\t\t(stroke\n\t\t\t\t(width {})\n\t\t\t\t(type default)\n\t\t\t)\n\t\t\t(layer {})\n\t\t\t(uuid {uuid})\n\t\t)",
                fmt_num(x1),
                fmt_num(y1),
                fmt_num(x2),
                fmt_num(y2),
                fmt_num(coord_to_mm(line.thickness)),
                quote(side.silk),
            )?;
        }
        for arc in &element.arcs {
            let (cx, cy) = place.local(arc.x, arc.y);
            let (ex, ey) = arc_end_mm(arc);
            let (ex, ey) = place.local_mm(ex, ey);
            let uuid = self.uuid();
            writeln!(
                self.out,
                "\t\t(fp_arc\n\t\t\t(start {} {})\n\t\t\t(end {} {})\n\t\t\t(angle {})\n\t\t\t(stroke\n\t\t\t\t(width {})\n\t\t\t\t(type default)\n\t\t\t)\n\t\t\t(layer {})\n\t\t\t(uuid {uuid})\n\t\t)",
                fmt_num(cx),
                fmt_num(cy),
                fmt_num(ex),
                fmt_num(ey),
                fmt_num(arc.delta),
                fmt_num(coord_to_mm(arc.thickness)),
                quote(side.silk),
            )?;
        }
        writeln!(self.out, "\t)")
    }

    fn properties(
        &mut self,
        element: &Element,
        place: &Placement,
        side: &SideLayers,
    ) -> io::Result<()> {
        let refdes = &element.refdes;
        let (x, y) = place.local(refdes.x, refdes.y);
        let (angle, mirror) = text_angle(refdes.direction, place.mirrored);
        let hide = if element.hide_name { "yes" } else { "no" };
        let uuid = self.uuid();
        writeln!(
            self.out,
            "\t\t(property \"Reference\" {}\n\t\t\t(at {} {} {angle})\n\t\t\t(unlocked yes)\n\t\t\t(layer {})\n\t\t\t(hide {hide})\n\t\t\t(uuid {uuid})\n\t\t\t(effects\n\t\t\t\t(font\n\t\t\t\t\t(size 1 0.8)\n\t\t\t\t\t(thickness 0.18)\n\t\t\t\t)\n\t\t\t\t(justify left top{mirror})\n\t\t\t)\n\t\t)",
            quote(&refdes.string),
            fmt_num(x),
            fmt_num(y),
            quote(side.silk),
        )?;

        // Value and footprint name both sit at the value text.
        let footprint_name = format!("geda:{}", element.description.string);
        for (label, text) in [
            ("Value", element.value.string.as_str()),
            ("Footprint", footprint_name.as_str()),
        ] {
            let value = &element.value;
            let (x, y) = place.local(value.x, value.y);
            let (angle, mirror) = text_angle(value.direction, place.mirrored);
            let uuid = self.uuid();
            writeln!(
                self.out,
                "\t\t(property {} {}\n\t\t\t(at {} {} {angle})\n\t\t\t(layer {})\n\t\t\t(hide yes)\n\t\t\t(uuid {uuid})\n\t\t\t(effects\n\t\t\t\t(font\n\t\t\t\t\t(size 1 1)\n\t\t\t\t\t(thickness 0.1)\n\t\t\t\t)",
                quote(label),
                quote(text),
                fmt_num(x),
                fmt_num(y),
                quote(side.fab),
            )?;
            if !mirror.is_empty() {
                writeln!(self.out, "\t\t\t\t(justify{mirror})")?;
            }
            writeln!(self.out, "\t\t\t)\n\t\t)")?;
        }
        Ok(())
    }

    fn pin(&mut self, obj: ObjectRef, pin: &Pin, place: &Placement) -> io::Result<()> {
        let (net, net_name) = self.terminal_net(obj);
        let kind = if pin.hole { "np_thru_hole" } else { "thru_hole" };
        let (shape, chamfer) = pad_shape(pin.shape, "circle");
        let (x, y) = place.local(pin.x, pin.y);
        let thick = coord_to_mm(pin.thickness);
        let mask = coord_to_mm(pin.mask);
        let clear = coord_to_mm(pin.clearance);

        writeln!(self.out, "\t\t(pad {} {kind} {shape}", quote(&pin.number))?;
        if chamfer {
            writeln!(self.out, "\t\t\t{CHAMFER}")?;
        }
        writeln!(
            self.out,
            "\t\t\t(at {} {})\n\t\t\t(size {} {})\n\t\t\t(drill {})\n\t\t\t(layers \"*.Cu\" \"*.Mask\")\n\t\t\t(solder_mask_margin {})\n\t\t\t(clearance {})",
            fmt_num(x),
            fmt_num(y),
            fmt_num(thick),
            fmt_num(thick),
            fmt_num(coord_to_mm(pin.drill)),
            fmt_num((mask - thick) / 2.0),
            fmt_num(clear / 2.0),
        )?;
        self.thermal(&pin.thermals, clear)?;
        self.pad_tail(net.0, &net_name)
    }

    fn pad(&mut self, obj: ObjectRef, pad: &Pad, place: &Placement) -> io::Result<()> {
        let (net, net_name) = self.terminal_net(obj);
        let (shape, chamfer) = pad_shape(pad.shape, "oval");
        let side = SideLayers::of(if pad.on_solder { Side::Bottom } else { Side::Top });
        let layers = if pad.no_paste {
            format!("{} {}", quote(side.copper), quote(side.mask))
        } else {
            format!("{} {} {}", quote(side.copper), quote(side.paste), quote(side.mask))
        };
        let g = pad_geometry(place, pad);
        let thick = coord_to_mm(pad.thickness);
        let clear = coord_to_mm(pad.clearance);

        writeln!(self.out, "\t\t(pad {} smd {shape}", quote(&pad.number))?;
        if chamfer {
            writeln!(self.out, "\t\t\t{CHAMFER}")?;
        }
        writeln!(
            self.out,
            "\t\t\t(at {} {} {})\n\t\t\t(size {} {})\n\t\t\t(layers {layers})\n\t\t\t(solder_mask_margin {})\n\t\t\t(clearance {})",
            fmt_num(g.x),
            fmt_num(g.y),
            fmt_num(g.angle),
            fmt_num(g.w),
            fmt_num(g.h),
            fmt_num((coord_to_mm(pad.mask) - thick) / 2.0),
            fmt_num(clear / 2.0),
        )?;
        self.thermal(&pad.thermals, clear)?;
        self.pad_tail(net.0, &net_name)
    }

    fn thermal(&mut self, thermals: &[u8], clear: f64) -> io::Result<()> {
        let Some(connect) = zone_connect(thermals, self.board.max_copper_layer) else {
            return Ok(());
        };
        tracing::debug!(?thermals, connect, "terminal with thermal");
        writeln!(
            self.out,
            "\t\t\t(zone_connect {connect})\n\t\t\t(thermal_gap {})",
            fmt_num(clear / 2.0)
        )
    }

    fn pad_tail(&mut self, net: u32, net_name: &str) -> io::Result<()> {
        let uuid = self.uuid();
        writeln!(
            self.out,
            "\t\t\t(net {net} {})\n\t\t\t(uuid {uuid})\n\t\t)",
            quote(net_name)
        )
    }
}
