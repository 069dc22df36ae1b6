//! Identity and world types shared by every component.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable unique id of an actor. Per-actor state is keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Block position inside a named world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// True if `other` lies inside the axis-aligned box of half-size `radius` around `self`.
    pub fn within_box(&self, other: &Location, radius: f64) -> bool {
        self.world == other.world
            && (self.x - other.x).abs() <= radius
            && (self.y - other.y).abs() <= radius
            && (self.z - other.z).abs() <= radius
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:.1}, {:.1}, {:.1})", self.world, self.x, self.y, self.z)
    }
}

/// Kind of block an actor tries to break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    DiamondOre,
    DeepslateDiamondOre,
    AncientDebris,
    Spawner,
    Other(String),
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::DiamondOre => f.write_str("diamond_ore"),
            BlockKind::DeepslateDiamondOre => f.write_str("deepslate_diamond_ore"),
            BlockKind::AncientDebris => f.write_str("ancient_debris"),
            BlockKind::Spawner => f.write_str("spawner"),
            BlockKind::Other(name) => f.write_str(name),
        }
    }
}

/// Kind of a dropped item lying in the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Diamond,
    AncientDebris,
    Spawner,
    Other(String),
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Diamond => f.write_str("diamond"),
            ItemKind::AncientDebris => f.write_str("ancient_debris"),
            ItemKind::Spawner => f.write_str("spawner"),
            ItemKind::Other(name) => f.write_str(name),
        }
    }
}

/// Tool held in the actor's main hand at the time of the attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldTool {
    pub silk_touch: bool,
}

impl HeldTool {
    pub fn bare_hand() -> Self {
        Self::default()
    }

    pub fn silk_touch() -> Self {
        Self { silk_touch: true }
    }
}

/// A materialized item entity that can be removed by residue cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedItem {
    pub id: u64,
    pub kind: ItemKind,
    pub location: Location,
}
