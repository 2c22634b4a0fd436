use derive_more::Deref;
use engine::prelude::*;

/// Read-only render snapshot of one map cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CellView {
    pub terrain: Terrain,
    /// Glyph of the unit standing in the cell, only for visible cells.
    pub unit: Option<char>,
    /// Glyph of the topmost item on the ground.
    pub item: Option<char>,
    /// Cell has been seen but isn't visible right now.
    pub dim: bool,
}

impl CellView {
    /// Character to draw for the cell.
    pub fn glyph(&self) -> char {
        self.unit.or(self.item).unwrap_or(self.terrain.glyph())
    }
}

/// Snapshot of a cell, `None` for cells the player has never seen.
pub fn cell_view(r: &Runtime, p: IVec2) -> Option<CellView> {
    let level = r.level();
    if !level.is_seen(p) {
        return None;
    }
    let visible = level.is_visible(p);
    let unit = if visible {
        level.unit_at(p).and_then(|id| r.unit(id)).map(|u| u.glyph)
    } else {
        None
    };

    Some(CellView {
        terrain: level.terrain(p),
        unit,
        item: level.items_at(p).last().map(|i| i.glyph()),
        dim: !visible,
    })
}

/// Projection from level positions into a viewport of fixed size.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Deref)]
pub struct MapView(IVec2);

impl MapView {
    /// Center the view on `center`, then shift it to show as much of the
    /// level as fits.
    pub fn new(view_size: IVec2, center: IVec2, level: &Level) -> Self {
        let dim = ivec2(level.width(), level.height());
        let mut offset = center - view_size / 2;
        for d in 0..2 {
            if dim[d] <= view_size[d] {
                offset[d] = (dim[d] - view_size[d]) / 2;
            } else {
                offset[d] = offset[d].clamp(0, dim[d] - view_size[d]);
            }
        }
        MapView(offset)
    }

    /// Level position shown at a viewport position.
    pub fn project(&self, screen: IVec2) -> IVec2 {
        screen + self.0
    }

    /// Render the view into text lines, unseen cells are blank.
    pub fn render(&self, r: &Runtime, view_size: IVec2) -> Vec<String> {
        (0..view_size.y)
            .map(|y| {
                (0..view_size.x)
                    .map(|x| {
                        cell_view(r, self.project(ivec2(x, y)))
                            .map_or(' ', |c| c.glyph())
                    })
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use engine::{ArmKind, Config};
    use pretty_assertions::assert_eq;

    use super::*;

    fn runtime() -> Runtime {
        let config = Config {
            ai_units: 0,
            ..Default::default()
        };
        let level = Level::from_ascii(
            "
            #########
            #.......#
            #.......#
            ###.#####
            #.......#
            #########",
        );
        let mut r = Runtime::new(config, level);
        r.spawn_player(Unit::new("player", '@'), ivec2(3, 1)).unwrap();
        r
    }

    #[test]
    fn render_visible_area() {
        let mut r = runtime();
        r.place_item(ivec2(5, 2), Item::arm(ArmKind::Claw)).unwrap();
        r.spawn(Unit::new("drone", 'z'), ivec2(6, 1)).unwrap();
        r.update_fov();

        let view = MapView::new(ivec2(9, 6), ivec2(3, 1), r.level());
        let lines = view.render(&r, ivec2(9, 6));
        assert_eq!(
            lines[..4].to_vec(),
            vec!["#########", "#..@..z.#", "#....(..#", "###.#####"]
        );
        // Only a sliver of the lower room shows through the doorway.
        assert_eq!(lines[4].chars().nth(3), Some('.'));
        assert_eq!(lines[4].chars().next(), Some(' '));
    }

    #[test]
    fn remembered_cells_are_dim() {
        let mut r = runtime();
        r.spawn(Unit::new("drone", 'z'), ivec2(6, 1)).unwrap();
        r.update_fov();
        assert_eq!(cell_view(&r, ivec2(6, 1)).unwrap().glyph(), 'z');
        assert_eq!(cell_view(&r, ivec2(0, 5)), None);

        // Walk the player into the lower room so the drone goes out of view.
        r.advance();
        for dir in [
            Dir::South,
            Dir::South,
            Dir::SouthEast,
            Dir::East,
            Dir::East,
            Dir::East,
        ] {
            r.act(Action::Move(dir)).unwrap();
            r.advance();
        }
        let c = cell_view(&r, ivec2(6, 1)).unwrap();
        assert!(c.dim);
        assert_eq!(c.unit, None);
        assert_eq!(c.glyph(), '.');
    }

    #[test]
    fn view_clamps_to_level() {
        let level = Level::new(100, 100);
        let v = MapView::new(ivec2(80, 30), ivec2(2, 2), &level);
        assert_eq!(*v, ivec2(0, 0));
        let v = MapView::new(ivec2(80, 30), ivec2(98, 50), &level);
        assert_eq!(*v, ivec2(20, 35));
        let v = MapView::new(ivec2(10, 10), ivec2(3, 3), &Level::new(4, 6));
        assert_eq!(*v, ivec2(-3, -2));
    }
}
