//! Player field of view over the level grid.

use crate::{level::Vision, prelude::*};

impl fov::LightMap for Level {
    fn is_opaque(&self, pos: [i32; 2]) -> bool {
        self.terrain(IVec2::from(pos)).blocks_sight()
    }

    fn light(&mut self, pos: [i32; 2]) {
        if let Some(v) = self.vision_mut(IVec2::from(pos)) {
            *v |= Vision::VISIBLE | Vision::SEEN;
        }
    }
}

impl Level {
    /// Recompute the visible set from `origin`.
    ///
    /// Previously visible cells outside the new view lose their visibility
    /// but stay marked as seen.
    pub fn compute_fov(&mut self, origin: IVec2, radius: i32) {
        self.clear_visible();
        fov::cast(self, origin.to_array(), radius);
    }
}

impl Runtime {
    /// Refresh the level's visibility from the player's position.
    pub fn update_fov(&mut self) {
        let Some((pos, range)) =
            self.player_unit().map(|u| (u.pos(), u.vision_range))
        else {
            return;
        };
        self.level.compute_fov(pos, range);
    }
}
