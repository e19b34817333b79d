use std::fmt;

use pcb2kicad_core::Netlist;

/// Net number as written to the output. `NetId::NONE` is the unconnected net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NetId(pub u32);

impl NetId {
    pub const NONE: NetId = NetId(0);
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub id: NetId,
    pub name: String,
    pub entries: Vec<String>,
}

/// Nets in declaration order, preceded by the unnamed net 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetTable {
    nets: Vec<Net>,
}

impl Default for NetTable {
    fn default() -> Self {
        Self::from_netlist(&Netlist::default())
    }
}

impl NetTable {
    #[must_use]
    pub fn from_netlist(netlist: &Netlist) -> Self {
        let mut nets = Vec::with_capacity(netlist.nets.len() + 1);
        nets.push(Net {
            id: NetId::NONE,
            name: String::new(),
            entries: Vec::new(),
        });
        for (i, def) in netlist.nets.iter().enumerate() {
            nets.push(Net {
                id: NetId(i as u32 + 1),
                name: def.name.trim_start_matches(' ').to_string(),
                entries: def.entries.clone(),
            });
        }
        Self { nets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    /// Always false: net 0 is present in every table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.0 as usize)
    }

    /// Name of `id`, or the empty string for ids outside the table.
    #[must_use]
    pub fn name(&self, id: NetId) -> &str {
        self.get(id).map_or("", |n| n.name.as_str())
    }

    /// Net whose entry list contains `key` exactly. Every net is scanned and
    /// the last match wins.
    #[must_use]
    pub fn match_pin_key(&self, key: &str) -> Option<NetId> {
        let mut found = None;
        for net in &self.nets {
            if net.entries.iter().any(|e| e == key) {
                found = Some(net.id);
            }
        }
        found
    }
}

/// Connectivity key of a terminal: `"<refdes>-<number>"`.
#[must_use]
pub fn pin_key(refdes: &str, number: &str) -> String {
    format!("{refdes}-{number}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb2kicad_core::NetDef;

    fn netlist(nets: &[(&str, &[&str])]) -> Netlist {
        Netlist {
            nets: nets
                .iter()
                .map(|(name, entries)| NetDef {
                    name: name.to_string(),
                    entries: entries.iter().map(|e| e.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn net_zero_is_first_and_unnamed() {
        let table = NetTable::from_netlist(&netlist(&[("  GND", &["R1-1"]), ("VCC", &[])]));
        let names: Vec<_> = table.iter().map(|n| (n.id.0, n.name.as_str())).collect();
        assert_eq!(names, vec![(0, ""), (1, "GND"), (2, "VCC")]);
        assert_eq!(NetTable::default().len(), 1);
    }

    #[test]
    fn last_matching_net_wins() {
        let table = NetTable::from_netlist(&netlist(&[
            ("A", &["U1-1", "U1-2"]),
            ("B", &["U1-2"]),
        ]));
        assert_eq!(table.match_pin_key("U1-1"), Some(NetId(1)));
        assert_eq!(table.match_pin_key("U1-2"), Some(NetId(2)));
        assert_eq!(table.match_pin_key("U1-3"), None);
        assert_eq!(table.name(NetId(9)), "");
    }

    #[test]
    fn pin_key_joins_refdes_and_number() {
        assert_eq!(pin_key("R7", "2"), "R7-2");
    }
}
