use std::io::{self, Write};

use pcb2kicad_core::{coord_to_mm, Arc, Board, Layer, Line, ObjectRef, Point, Polygon, Text};
use pcb2kicad_geometry::Font;
use pcb2kicad_nets::{ConnectionLookup, ExportSession, NetId};

use crate::ids::IdSource;
use crate::layers::{classify_layer, LayerTarget, LAYER_TABLE};
use crate::sexpr::{fmt_num, mm, quote};
use crate::ExportError;

/// File format version written in the header.
pub const KICAD_VERSION: u32 = 20240108;

pub const GENERATOR: &str = "pcb2kicad";

/// Polygon points per output line.
const POINTS_PER_LINE: usize = 7;

/// Stream `board` as a KiCad PCB document.
///
/// Objects appear in a fixed order: header, page, layer table, nets,
/// footprints, vias, then the contents of each board layer.
pub fn write_kicad_pcb<W: Write>(
    board: &Board,
    out: &mut W,
    ids: &mut dyn IdSource,
    lookup: &dyn ConnectionLookup,
) -> Result<(), ExportError> {
    let mut w = PcbWriter {
        out,
        board,
        ids,
        lookup,
        session: ExportSession::new(board),
        font: Font::default(),
    };
    w.header()?;
    w.nets()?;
    for index in 0..board.elements.len() {
        w.footprint(index)?;
    }
    for index in 0..board.vias.len() {
        w.via(index)?;
    }
    for index in 0..board.layers.len() {
        w.layer(index)?;
    }
    writeln!(w.out, ")")?;
    w.out.flush()?;
    Ok(())
}

/// Everything one export pass needs, borrowed for its duration.
pub(crate) struct PcbWriter<'a, W: Write> {
    pub(crate) out: &'a mut W,
    pub(crate) board: &'a Board,
    pub(crate) ids: &'a mut dyn IdSource,
    pub(crate) lookup: &'a dyn ConnectionLookup,
    pub(crate) session: ExportSession,
    pub(crate) font: Font,
}

impl<W: Write> PcbWriter<'_, W> {
    pub(crate) fn uuid(&mut self) -> String {
        quote(&self.ids.next_id())
    }

    /// Net of a pin or pad, resolving it on first sight.
    pub(crate) fn terminal_net(&mut self, obj: ObjectRef) -> (NetId, String) {
        let id = self.session.resolve(self.board, self.lookup, obj);
        (id, self.session.nets().name(id).to_string())
    }

    /// Net already recorded for a via, track or zone; net 0 otherwise.
    fn recorded_net(&self, obj: ObjectRef) -> NetId {
        self.session.net_of(obj).unwrap_or(NetId::NONE)
    }

    fn header(&mut self) -> io::Result<()> {
        let out = &mut *self.out;
        writeln!(out, "(kicad_pcb")?;
        writeln!(out, "\t(version {KICAD_VERSION})")?;
        writeln!(out, "\t(generator {})", quote(GENERATOR))?;
        writeln!(out, "\t(generator_version {})", quote(env!("CARGO_PKG_VERSION")))?;
        writeln!(out, "\t(general\n\t\t(thickness 1.6)\n\t)")?;
        writeln!(
            out,
            "\t(paper \"User\" {} {})",
            mm(self.board.max_width),
            mm(self.board.max_height)
        )?;
        writeln!(out, "\t(layers")?;
        for (ordinal, name, kind, user) in LAYER_TABLE {
            match user {
                Some(user) => writeln!(out, "\t\t({ordinal} {} {kind} {})", quote(name), quote(user))?,
                None => writeln!(out, "\t\t({ordinal} {} {kind})", quote(name))?,
            }
        }
        writeln!(out, "\t)")
    }

    fn nets(&mut self) -> io::Result<()> {
        for net in self.session.nets().iter() {
            writeln!(self.out, "\t(net {} {})", net.id, quote(&net.name))?;
        }
        Ok(())
    }

    fn via(&mut self, index: usize) -> io::Result<()> {
        let board = self.board;
        let via = &board.vias[index];
        let net = self.recorded_net(ObjectRef::Via(index));
        let uuid = self.uuid();
        writeln!(
            self.out,
            "\t(via\n\t\t(at {} {})\n\t\t(size {})\n\t\t(drill {})\n\t\t(layers \"F.Cu\" \"B.Cu\")\n\t\t(net {net})\n\t\t(uuid {uuid})\n\t)",
            mm(via.x),
            mm(via.y),
            mm(via.thickness),
            mm(via.drill),
        )
    }

    fn layer(&mut self, index: usize) -> io::Result<()> {
        let board = self.board;
        let layer = &board.layers[index];
        let target = classify_layer(board, index);
        tracing::debug!(layer = %layer.name, kind = ?layer.kind, ?target, "processing layer");
        match target {
            LayerTarget::Copper(name) => self.copper_layer(index, layer, &name),
            LayerTarget::Graphic(name) => self.graphic_layer(layer, &name),
            LayerTarget::Skip => Ok(()),
        }
    }

    fn copper_layer(&mut self, index: usize, layer: &Layer, name: &str) -> io::Result<()> {
        for (i, line) in layer.lines.iter().enumerate() {
            let net = self.recorded_net(ObjectRef::Line { layer: index, index: i });
            self.segment(line, name, net)?;
        }
        for (i, arc) in layer.arcs.iter().enumerate() {
            let net = self.recorded_net(ObjectRef::Arc { layer: index, index: i });
            let uuid = self.uuid();
            let (end_x, end_y) = arc_end_mm(arc);
            writeln!(
                self.out,
                "\t(arc\n\t\t(start {} {})\n\t\t(end {} {})\n\t\t(angle {})\n\t\t(width {})\n\t\t(layer {})\n\t\t(net {net})\n\t\t(uuid {uuid})\n\t)",
                mm(arc.x),
                mm(arc.y),
                fmt_num(end_x),
                fmt_num(end_y),
                fmt_num(arc.delta),
                mm(arc.thickness),
                quote(name),
            )?;
        }
        for (i, polygon) in layer.polygons.iter().enumerate() {
            let net = self.recorded_net(ObjectRef::Polygon { layer: index, index: i });
            self.zone(polygon, name, net)?;
        }
        Ok(())
    }

    fn segment(&mut self, line: &Line, layer: &str, net: NetId) -> io::Result<()> {
        let uuid = self.uuid();
        writeln!(
            self.out,
            "\t(segment\n\t\t(start {} {})\n\t\t(end {} {})\n\t\t(width {})\n\t\t(layer {})\n\t\t(net {net})\n\t\t(uuid {uuid})\n\t)",
            mm(line.p1.x),
            mm(line.p1.y),
            mm(line.p2.x),
            mm(line.p2.y),
            mm(line.thickness),
            quote(layer),
        )
    }

    /// One filled zone for the outer boundary and one keepout per hole.
    fn zone(&mut self, polygon: &Polygon, layer: &str, net: NetId) -> io::Result<()> {
        let net_name = self.session.nets().name(net).to_string();
        let uuid = self.uuid();
        let island_mode = if polygon.full_poly { 2 } else { 0 };
        let island_area = self.board.isle_area / 1e12;
        writeln!(
            self.out,
            "\t(zone\n\t\t(net {net})\n\t\t(net_name {})\n\t\t(layer {})\n\t\t(uuid {uuid})\n\t\t(hatch edge 0.508)\n\t\t(connect_pads no (clearance 0.25))\n\t\t(min_thickness 0.1)\n\t\t(fill yes\n\t\t\t(island_removal_mode {island_mode})\n\t\t\t(island_area_min {})\n\t\t)",
            quote(&net_name),
            quote(layer),
            fmt_num(island_area),
        )?;
        let mut row = 0;
        self.zone_points(polygon.outer(), &mut row)?;

        for hole in polygon.holes() {
            let uuid = self.uuid();
            writeln!(
                self.out,
                "\t(zone\n\t\t(net {net})\n\t\t(net_name \"\")\n\t\t(layer {})\n\t\t(uuid {uuid})\n\t\t(hatch edge 0.508)\n\t\t(connect_pads no (clearance 0.25))\n\t\t(min_thickness 0.1)\n\t\t(keepout\n\t\t\t(tracks allowed)\n\t\t\t(vias allowed)\n\t\t\t(pads allowed)\n\t\t\t(copperpour not_allowed)\n\t\t\t(footprints allowed)\n\t\t)\n\t\t(fill yes\n\t\t)",
                quote(layer),
            )?;
            self.zone_points(hole, &mut row)?;
        }
        Ok(())
    }

    /// Point list of one zone block. `row` counts points on the current text
    /// line and is shared by every block of a polygon, so a hole continues the
    /// count its outer boundary left off at.
    fn zone_points(&mut self, points: &[Point], row: &mut usize) -> io::Result<()> {
        writeln!(self.out, "\t\t(polygon\n\t\t\t(pts")?;
        for p in points {
            let sep = if *row == 0 { "\t\t\t\t" } else { " " };
            write!(self.out, "{sep}(xy {} {})", mm(p.x), mm(p.y))?;
            *row += 1;
            if *row >= POINTS_PER_LINE {
                *row = 0;
                writeln!(self.out)?;
            }
        }
        if *row != 0 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "\t\t\t)\n\t\t)\n\t)")
    }

    fn graphic_layer(&mut self, layer: &Layer, name: &str) -> io::Result<()> {
        for line in &layer.lines {
            let uuid = self.uuid();
            writeln!(
                self.out,
                "\t(gr_line\n\t\t(start {} {})\n\t\t(end {} {})\n\t\t(stroke\n\t\t\t(width {})\n\t\t\t(type solid)\n\t\t)\n\t\t(layer {})\n\t\t(uuid {uuid})\n\t)",
                mm(line.p1.x),
                mm(line.p1.y),
                mm(line.p2.x),
                mm(line.p2.y),
                mm(line.thickness),
                quote(name),
            )?;
        }
        for arc in &layer.arcs {
            let uuid = self.uuid();
            let (end_x, end_y) = arc_end_mm(arc);
            writeln!(
                self.out,
                "\t(gr_arc\n\t\t(start {} {})\n\t\t(end {} {})\n\t\t(angle {})\n\t\t(stroke\n\t\t\t(width {})\n\t\t\t(type solid)\n\t\t)\n\t\t(layer {})\n\t\t(uuid {uuid})\n\t)",
                mm(arc.x),
                mm(arc.y),
                fmt_num(end_x),
                fmt_num(end_y),
                fmt_num(arc.delta),
                mm(arc.thickness),
                quote(name),
            )?;
        }
        for text in &layer.texts {
            self.gr_text(text, name)?;
        }
        Ok(())
    }

    fn gr_text(&mut self, text: &Text, layer: &str) -> io::Result<()> {
        let uuid = self.uuid();
        let (angle, mirror) = text_angle(text.direction, text.on_solder);
        let scale = f64::from(text.scale) / 100.0;
        writeln!(
            self.out,
            "\t(gr_text {}\n\t\t(at {} {} {angle})\n\t\t(layer {})\n\t\t(uuid {uuid})\n\t\t(effects\n\t\t\t(font\n\t\t\t\t(size {} {})\n\t\t\t\t(thickness 0.18)\n\t\t\t)\n\t\t\t(justify left top{mirror})\n\t\t)\n\t)",
            quote(&text.string),
            mm(text.x),
            mm(text.y),
            quote(layer),
            fmt_num(scale),
            fmt_num(0.8 * scale),
        )
    }
}

/// Text angle in whole degrees and the justify suffix. Mirrored text turns
/// the other way.
pub(crate) fn text_angle(direction: u8, mirrored: bool) -> (i32, &'static str) {
    let angle = i32::from(direction) * 90;
    if mirrored {
        (180 - angle, " mirror")
    } else {
        (angle, "")
    }
}

/// End point of an arc drawn on its mean radius, in millimetres.
pub(crate) fn arc_end_mm(arc: &Arc) -> (f64, f64) {
    let radius = (coord_to_mm(arc.width) + coord_to_mm(arc.height)) / 2.0;
    let (s, c) = (arc.start_angle + arc.delta).to_radians().sin_cos();
    (coord_to_mm(arc.x) - radius * c, coord_to_mm(arc.y) + radius * s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arc_end_uses_mean_radius() {
        let arc = Arc {
            x: 0,
            y: 0,
            width: 1_000_000,
            height: 3_000_000,
            thickness: 0,
            start_angle: 0.0,
            delta: 90.0,
        };
        let (x, y) = arc_end_mm(&arc);
        assert_relative_eq!(x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn mirrored_text_turns_backwards() {
        assert_eq!(text_angle(1, false), (90, ""));
        assert_eq!(text_angle(1, true), (90, " mirror"));
        assert_eq!(text_angle(0, true), (180, " mirror"));
        assert_eq!(text_angle(3, true), (-90, " mirror"));
    }
}
