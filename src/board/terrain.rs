use serde::{Deserialize, Serialize};

/// Terrain type of a board cell. Doubles as the cell-type name that
/// selector filters match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    Grass,
    Pond,
    Mountain,
}

impl TerrainKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainKind::Grass => "Grass",
            TerrainKind::Pond => "Pond",
            TerrainKind::Mountain => "Mountain",
        }
    }

    /// Whether freshly generated cells of this kind accept buildings
    pub fn accepts_buildings(&self) -> bool {
        matches!(self, TerrainKind::Grass)
    }

    pub fn all() -> &'static [TerrainKind] {
        &[TerrainKind::Grass, TerrainKind::Pond, TerrainKind::Mountain]
    }
}
