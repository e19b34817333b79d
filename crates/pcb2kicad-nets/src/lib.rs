//! Net assignment for board export.
//!
//! A [`ConnectionLookup`] finds the copper reachable from a seed object and an
//! [`ExportSession`] records which net every object belongs to for the length
//! of one export.

pub mod lookup;
pub mod session;
pub mod table;

pub use lookup::{ConnectionLookup, FoundSet, GeometricLookup};
pub use session::{ExportSession, VisitState, ASSIGNMENT_CAPACITY};
pub use table::{pin_key, Net, NetId, NetTable};
