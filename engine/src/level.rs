//! Terrain and occupancy grid of a single dungeon level.

use bitflags::bitflags;
use util::{clamp_to, AsciiMap};

use crate::{prelude::*, terrain::Stairs, MAX_LEVEL_SIZE};

bitflags! {
    /// Per-cell visibility state.
    #[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
    pub struct Vision: u8 {
        /// Cell is in the player's field of view right now.
        const VISIBLE = 0x1;
        /// Cell has been in the player's field of view at some point.
        const SEEN = 0x4;
    }
}

/// One grid cell.
#[derive(Clone, Default, Debug)]
pub struct Cell {
    pub terrain: Terrain,
    /// Unit standing in the cell. The unit itself lives in the runtime's
    /// unit registry.
    pub(crate) unit: Option<UnitId>,
    /// Pile of items lying on the ground, the cell owns these.
    pub(crate) items: Vec<Item>,
}

impl Cell {
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

/// Fixed-size level map.
#[derive(Clone, Debug)]
pub struct Level {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    vision: Vec<Vision>,
    /// Levels the stairs lead to, four up stairs followed by four down
    /// stairs. Not hooked up to anything yet.
    exits: [Option<usize>; 8],
}

impl Level {
    /// Create a level filled with floor.
    ///
    /// Dimensions are clamped to `1..=MAX_LEVEL_SIZE`.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(1, MAX_LEVEL_SIZE);
        let height = height.clamp(1, MAX_LEVEL_SIZE);
        let n = width as usize * height as usize;
        Level {
            width,
            height,
            cells: vec![Cell::default(); n],
            vision: vec![Vision::empty(); n],
            exits: Default::default(),
        }
    }

    /// Build a level from an ASCII map, see `Terrain::from_glyph` for the
    /// legend. Unknown characters become floor.
    pub fn from_ascii(map: &str) -> Self {
        let map: AsciiMap<()> = AsciiMap::new(map, []);
        let dim = map.dim();
        let mut ret = Level::new(dim.x, dim.y);
        for (p, c, _) in map.iter() {
            ret.set_terrain(p, Terrain::from_glyph(c).unwrap_or_default());
        }
        ret
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, p: IVec2) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    fn idx(&self, p: IVec2) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    pub fn cell(&self, p: IVec2) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, p: IVec2) -> Option<&mut Cell> {
        self.idx(p).map(move |i| &mut self.cells[i])
    }

    /// Terrain at position, everything outside the level is wall.
    pub fn terrain(&self, p: IVec2) -> Terrain {
        self.cell(p).map_or(Terrain::Wall, |c| c.terrain)
    }

    pub fn set_terrain(&mut self, p: IVec2, t: Terrain) {
        if let Some(c) = self.cell_mut(p) {
            c.terrain = t;
        }
    }

    pub fn unit_at(&self, p: IVec2) -> Option<UnitId> {
        self.cell(p).and_then(|c| c.unit)
    }

    pub fn items_at(&self, p: IVec2) -> &[Item] {
        self.cell(p).map_or(&[], |c| c.items.as_slice())
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec2> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| ivec2(x, y)))
    }

    pub fn exit(&self, stairs: Stairs) -> Option<usize> {
        self.exits[Self::exit_index(stairs)?]
    }

    pub fn set_exit(&mut self, stairs: Stairs, level: Option<usize>) {
        if let Some(i) = Self::exit_index(stairs) {
            self.exits[i] = level;
        }
    }

    fn exit_index(stairs: Stairs) -> Option<usize> {
        match stairs {
            Stairs::Up(n @ 1..=4) => Some(n as usize - 1),
            Stairs::Down(n @ 1..=4) => Some(n as usize + 3),
            _ => None,
        }
    }

    /// Put an item on the ground pile of a cell.
    ///
    /// Returns the item back if the position is outside the level.
    pub(crate) fn drop_item(
        &mut self,
        p: IVec2,
        item: Item,
    ) -> std::result::Result<(), Item> {
        match self.cell_mut(p) {
            Some(c) => {
                c.items.push(item);
                Ok(())
            }
            None => Err(item),
        }
    }

    pub(crate) fn take_item(&mut self, p: IVec2, idx: usize) -> Result<Item> {
        let c = self
            .cell_mut(p)
            .ok_or(Error::InvalidArgument("position outside level"))?;
        if idx >= c.items.len() {
            return Err(Error::NotFound);
        }
        Ok(c.items.remove(idx))
    }

    /// Mark a cell as holding a unit.
    pub(crate) fn place_unit(&mut self, p: IVec2, id: UnitId) -> Result<()> {
        let c = self
            .cell_mut(p)
            .ok_or(Error::InvalidArgument("position outside level"))?;
        if !c.terrain.is_passable() {
            return Err(Error::Blocked);
        }
        if let Some(other) = c.unit {
            return Err(Error::Occupied(other));
        }
        c.unit = Some(id);
        Ok(())
    }

    pub(crate) fn clear_unit(&mut self, p: IVec2) -> Option<UnitId> {
        self.cell_mut(p).and_then(|c| c.unit.take())
    }

    /// Where a step from `p` towards `dir` ends up, clamped to level bounds.
    pub fn step_destination(&self, p: IVec2, dir: Dir) -> IVec2 {
        clamp_to(p + dir.delta(), self.width, self.height)
    }

    /// Move the unit standing at `from` one step towards `dir`.
    ///
    /// Returns the new position. Fails with `Blocked` if the destination is
    /// impassable or the step got clamped against the level edge, and with
    /// `Occupied` if another unit stands there.
    pub(crate) fn move_unit(&mut self, from: IVec2, dir: Dir) -> Result<IVec2> {
        let id = self
            .unit_at(from)
            .ok_or(Error::InvalidArgument("no unit to move"))?;

        let to = self.step_destination(from, dir);
        if to == from {
            return Err(Error::Blocked);
        }
        if !self.terrain(to).is_passable() {
            return Err(Error::Blocked);
        }
        if let Some(other) = self.unit_at(to) {
            return Err(Error::Occupied(other));
        }

        self.clear_unit(from);
        self.place_unit(to, id)?;
        Ok(to)
    }

    pub fn vision(&self, p: IVec2) -> Vision {
        self.idx(p).map_or(Vision::empty(), |i| self.vision[i])
    }

    pub fn is_visible(&self, p: IVec2) -> bool {
        self.vision(p).contains(Vision::VISIBLE)
    }

    pub fn is_seen(&self, p: IVec2) -> bool {
        self.vision(p).contains(Vision::SEEN)
    }

    pub(crate) fn vision_mut(&mut self, p: IVec2) -> Option<&mut Vision> {
        self.idx(p).map(move |i| &mut self.vision[i])
    }

    pub(crate) fn clear_visible(&mut self) {
        for v in self.vision.iter_mut() {
            v.remove(Vision::VISIBLE);
        }
    }
}
