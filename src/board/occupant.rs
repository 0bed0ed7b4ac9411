use serde::{Deserialize, Serialize};

/// Kind of building that can sit on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Hotel,
    Tent,
    Skyscraper,
}

impl BuildingKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            BuildingKind::House => "House",
            BuildingKind::Hotel => "Hotel",
            BuildingKind::Tent => "Big Tent",
            BuildingKind::Skyscraper => "Skyscraper",
        }
    }
}

/// Identity of one placed building. A building spanning several cells uses
/// the same id on every cell it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(pub u64);

/// One entry in a cell's occupant stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub id: OccupantId,
    pub kind: BuildingKind,
    /// Zero-based position in the stack (0 = ground floor)
    pub level: usize,
}

/// Hands out fresh occupant ids
#[derive(Debug, Default)]
pub struct OccupantIds {
    next: u64,
}

impl OccupantIds {
    pub fn next_id(&mut self) -> OccupantId {
        let id = OccupantId(self.next);
        self.next += 1;
        id
    }
}
