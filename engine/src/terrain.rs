use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Level terrain cell kinds.
///
/// Variant order is meaningful. Everything that sorts after
/// `Terrain::Wall` is passable, if you're the right kind of robot.
#[derive(
    Copy,
    Clone,
    Default,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Terrain {
    Wall,
    ConveyorHorizontal,
    ConveyorVertical,
    #[default]
    Floor,
    StairsUp1,
    StairsUp2,
    StairsUp3,
    StairsUp4,
    StairsDown1,
    StairsDown2,
    StairsDown3,
    StairsDown4,
}

/// Stairwell direction and number.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stairs {
    Up(u8),
    Down(u8),
}

impl Terrain {
    pub fn is_passable(self) -> bool {
        self > Terrain::Wall
    }

    pub fn blocks_sight(self) -> bool {
        !self.is_passable()
    }

    pub fn stairs(self) -> Option<Stairs> {
        use Terrain::*;
        match self {
            StairsUp1 => Some(Stairs::Up(1)),
            StairsUp2 => Some(Stairs::Up(2)),
            StairsUp3 => Some(Stairs::Up(3)),
            StairsUp4 => Some(Stairs::Up(4)),
            StairsDown1 => Some(Stairs::Down(1)),
            StairsDown2 => Some(Stairs::Down(2)),
            StairsDown3 => Some(Stairs::Down(3)),
            StairsDown4 => Some(Stairs::Down(4)),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        use Terrain::*;
        match self {
            Wall => '#',
            ConveyorHorizontal => '-',
            ConveyorVertical => '|',
            Floor => '.',
            StairsUp1 | StairsUp2 | StairsUp3 | StairsUp4 => '<',
            StairsDown1 | StairsDown2 | StairsDown3 | StairsDown4 => '>',
        }
    }

    /// Parse a map fixture character, numbered stairs default to number 1.
    pub fn from_glyph(c: char) -> Option<Terrain> {
        use Terrain::*;
        match c {
            '#' => Some(Wall),
            '-' => Some(ConveyorHorizontal),
            '|' => Some(ConveyorVertical),
            '.' => Some(Floor),
            '<' => Some(StairsUp1),
            '>' => Some(StairsDown1),
            _ => None,
        }
    }
}
