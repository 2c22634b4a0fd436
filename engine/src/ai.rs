//! Autonomous unit behavior.

use rand::seq::SliceRandom;

use crate::prelude::*;

impl Runtime {
    /// Resolve the turn of a non-player unit.
    ///
    /// Returns the delay until the unit's next turn, or `None` if the unit
    /// is gone and should leave the turn queue.
    pub(crate) fn take_turn(&mut self, id: UnitId) -> Option<i64> {
        let unit = self.units.get(id).filter(|u| u.alive)?;
        let (brain, speed) = (unit.brain, unit.move_speed);

        match brain {
            Brain::Player => {
                log::warn!("take_turn: {id} wants player input");
            }
            Brain::Idle => {}
            Brain::Wander => {
                let dir = *Dir::ALL.choose(&mut self.rng)?;
                match self.execute(id, Action::Move(dir)) {
                    Ok(cost) => return self.units.is_alive(id).then_some(cost),
                    // Bumped into a wall or a friend, spend the turn waiting.
                    Err(e) => log::trace!("{id} wander: {e}"),
                }
            }
        }

        self.units.is_alive(id).then_some(speed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ArmKind, ChassisKind, Config, Team};

    fn runtime() -> Runtime {
        let config = Config {
            ai_units: 0,
            ..Default::default()
        };
        Runtime::new(config, Level::new(5, 5))
    }

    #[test]
    fn idle_units_wait() {
        let mut r = runtime();
        let id = r.spawn(Unit::new("statue", 's'), ivec2(2, 2)).unwrap();
        assert_eq!(r.take_turn(id), Some(crate::AI_SPEED));
        assert_eq!(r.unit(id).unwrap().pos(), ivec2(2, 2));
    }

    #[test]
    fn wanderers_stay_on_map() {
        let mut r = runtime();
        let id = r
            .spawn(Unit::new("drone", 'z').with_brain(Brain::Wander), ivec2(0, 0))
            .unwrap();
        let mut moved = false;
        for _ in 0..50 {
            assert!(r.take_turn(id).is_some());
            let p = r.unit(id).unwrap().pos();
            assert!(r.level().contains(p));
            assert_eq!(r.level().unit_at(p), Some(id));
            moved |= p != ivec2(0, 0);
        }
        assert!(moved);
    }

    #[test]
    fn wanderers_attack_enemies() {
        let mut r = runtime();
        // Box the drone in with an enemy on every side.
        let drone = Unit::new("drone", 'z')
            .with_chassis(Item::chassis(ChassisKind::Dome))
            .with_equipment([Item::arm(ArmKind::Claw)])
            .with_brain(Brain::Wander);
        let id = r.spawn(drone, ivec2(2, 2)).unwrap();
        for d in Dir::ALL {
            let bot = Unit::new("bot", 'b')
                .with_chassis(Item::chassis(ChassisKind::Heavy))
                .with_team(Team::Friendly);
            r.spawn(bot, ivec2(2, 2) + d.delta()).unwrap();
        }

        assert_eq!(r.take_turn(id), Some(crate::AI_SPEED));
        assert!(r.log().iter().any(|l| l == "drone swings its claw arm."));
    }

    #[test]
    fn dead_units_drop_out() {
        let mut r = runtime();
        let id = r.spawn(Unit::new("wreck", 'w'), ivec2(2, 2)).unwrap();
        r.destroy_unit(id);
        assert_eq!(r.take_turn(id), None);
    }
}
