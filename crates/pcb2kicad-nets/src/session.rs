use std::collections::HashMap;

use pcb2kicad_core::{copper_objects, Board, ObjectRef};

use crate::lookup::ConnectionLookup;
use crate::table::{pin_key, NetId, NetTable};

/// Starting size of the assignment table.
pub const ASSIGNMENT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    #[default]
    Unvisited,
    Discovering,
    Assigned,
}

/// Net bookkeeping for a single export. Built when an export starts and
/// dropped when it ends; the board itself is never marked.
#[derive(Debug)]
pub struct ExportSession {
    nets: NetTable,
    states: HashMap<ObjectRef, VisitState>,
    assignments: Vec<(ObjectRef, NetId)>,
}

impl ExportSession {
    #[must_use]
    pub fn new(board: &Board) -> Self {
        Self {
            nets: NetTable::from_netlist(&board.netlist),
            states: HashMap::new(),
            assignments: Vec::with_capacity(ASSIGNMENT_CAPACITY),
        }
    }

    #[must_use]
    pub fn nets(&self) -> &NetTable {
        &self.nets
    }

    #[must_use]
    pub fn state(&self, obj: ObjectRef) -> VisitState {
        self.states.get(&obj).copied().unwrap_or_default()
    }

    /// `(object, net)` pairs in the order they were recorded.
    #[must_use]
    pub fn assignments(&self) -> &[(ObjectRef, NetId)] {
        &self.assignments
    }

    /// Give `net` to `seed` and everything connected to it that has no net yet.
    ///
    /// A seed that already has a net is left alone, as are previously assigned
    /// objects reached from it.
    pub fn assign_net(
        &mut self,
        board: &Board,
        lookup: &dyn ConnectionLookup,
        seed: ObjectRef,
        net: NetId,
    ) {
        if self.state(seed) == VisitState::Assigned {
            return;
        }
        let mut found = lookup.find_connections(board, seed);
        found.insert(seed);
        for obj in found {
            let state = self.states.entry(obj).or_default();
            if *state != VisitState::Assigned {
                *state = VisitState::Discovering;
            }
        }

        let before = self.assignments.len();
        for obj in copper_objects(board) {
            if let Some(state) = self.states.get_mut(&obj) {
                if *state == VisitState::Discovering {
                    *state = VisitState::Assigned;
                    self.assignments.push((obj, net));
                }
            }
        }
        tracing::debug!(
            seed = seed.kind_name(),
            net = net.0,
            count = self.assignments.len() - before,
            "assigned net"
        );
    }

    /// Net recorded for `obj`, by scanning the assignment table.
    #[must_use]
    pub fn net_of(&self, obj: ObjectRef) -> Option<NetId> {
        self.assignments
            .iter()
            .find(|(o, _)| *o == obj)
            .map(|&(_, net)| net)
    }

    /// Net of a copper object, assigning one on first sight.
    ///
    /// Pins and pads are first matched by `"<refdes>-<number>"` against the
    /// netlist. Anything without a match floods net 0 so its connected copper
    /// agrees. A reference to an object the board does not have is net 0 and
    /// records nothing.
    pub fn resolve(
        &mut self,
        board: &Board,
        lookup: &dyn ConnectionLookup,
        obj: ObjectRef,
    ) -> NetId {
        if let Some(net) = self.net_of(obj) {
            return net;
        }
        if !obj.exists_in(board) {
            tracing::warn!(object = ?obj, "net requested for an object not on the board");
            return NetId::NONE;
        }
        let net = terminal_key(board, obj)
            .and_then(|key| self.nets.match_pin_key(&key))
            .unwrap_or(NetId::NONE);
        self.assign_net(board, lookup, obj, net);
        self.net_of(obj).unwrap_or(NetId::NONE)
    }
}

fn terminal_key(board: &Board, obj: ObjectRef) -> Option<String> {
    match obj {
        ObjectRef::Pin { element, index } => {
            let e = board.elements.get(element)?;
            Some(pin_key(&e.refdes.string, &e.pins.get(index)?.number))
        }
        ObjectRef::Pad { element, index } => {
            let e = board.elements.get(element)?;
            Some(pin_key(&e.refdes.string, &e.pads.get(index)?.number))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::FoundSet;
    use pcb2kicad_core::{Element, Pin};

    /// Connects every object to every other.
    struct Everything;

    impl ConnectionLookup for Everything {
        fn find_connections(&self, board: &Board, _seed: ObjectRef) -> FoundSet {
            copper_objects(board).into_iter().collect()
        }
    }

    fn board_with_pins(n: usize) -> Board {
        let mut element = Element::default();
        element.refdes.string = "J1".into();
        for i in 0..n {
            element.pins.push(Pin {
                x: 0,
                y: 0,
                thickness: 10,
                drill: 0,
                mask: 0,
                clearance: 0,
                number: (i + 1).to_string(),
                shape: Default::default(),
                hole: false,
                thermals: Vec::new(),
            });
        }
        let mut board = Board::default();
        board.elements.push(element);
        board
    }

    #[test]
    fn first_assignment_wins() {
        let board = board_with_pins(2);
        let mut session = ExportSession::new(&board);
        let a = ObjectRef::Pin { element: 0, index: 0 };
        let b = ObjectRef::Pin { element: 0, index: 1 };

        session.assign_net(&board, &Everything, a, NetId(3));
        session.assign_net(&board, &Everything, b, NetId(5));
        assert_eq!(session.net_of(a), Some(NetId(3)));
        assert_eq!(session.net_of(b), Some(NetId(3)));
        assert_eq!(session.assignments().len(), 2);
        assert_eq!(session.state(b), VisitState::Assigned);
    }

    #[test]
    fn unknown_objects_are_unvisited() {
        let board = board_with_pins(1);
        let session = ExportSession::new(&board);
        assert_eq!(session.state(ObjectRef::Via(4)), VisitState::Unvisited);
        assert_eq!(session.net_of(ObjectRef::Via(4)), None);
        assert!(session.assignments.capacity() >= ASSIGNMENT_CAPACITY);
    }
}
