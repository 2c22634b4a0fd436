//! Attack resolution against slot equipment.

use crate::{
    chassis::HitLocation, item::AttackFlags, prelude::*, DISABLE_COOLDOWN,
    MISS_ONE_IN,
};

/// Result of a single weapon's attack.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttackOutcome {
    /// No live target or no usable weapon, nothing happened.
    Ineffective,
    /// The weapon is still disabled.
    Offline,
    Missed,
    Damaged(HitLocation),
    Disabled(HitLocation),
    /// A piece of equipment was wrecked, the unit survives.
    Destroyed(HitLocation),
    /// The whole target unit was wrecked.
    Wrecked,
}

/// How the hit location gets decided.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HitRoll {
    /// Roll for miss, then roll the hit location.
    Random,
    /// Skip the miss roll and strike the given location.
    #[cfg(test)]
    Forced(HitLocation),
}

impl Runtime {
    /// Attack with every equipped melee weapon in turn.
    ///
    /// Stops early if the target gets destroyed. Returns the time the
    /// attack takes, or `None` if the attacker has no melee weapons.
    pub fn melee_attack(&mut self, attacker: UnitId, target: UnitId) -> Option<i64> {
        if attacker == target {
            return None;
        }
        let unit = self.units.get(attacker)?;
        let speed = unit.move_speed;
        let weapons: Vec<SlotRef> = unit.chassis()?.melee().map(|(s, _)| s).collect();
        if weapons.is_empty() {
            return None;
        }

        for slot in weapons {
            if !self.units.is_alive(target) {
                break;
            }
            self.resolve_attack(attacker, slot, target, false, HitRoll::Random);
        }
        Some(speed)
    }

    /// Fire ranged weapons at a target.
    ///
    /// With no explicit weapon every ready ranged weapon fires. The target
    /// must be inside the attacker's vision range, and for the player on a
    /// currently visible cell.
    pub fn ranged_attack(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        weapon: Option<SlotRef>,
    ) -> Result<i64> {
        if attacker == target {
            return Err(Error::InvalidArgument("unit can't shoot itself"));
        }
        let now = self.now();
        let unit = self.units.get(attacker).ok_or(Error::NotFound)?;
        let other = self
            .units
            .get(target)
            .filter(|u| u.alive)
            .ok_or(Error::NotFound)?;

        let range = unit.vision_range;
        if (other.pos() - unit.pos()).len2() >= range * range {
            return Err(Error::InvalidArgument("target out of range"));
        }
        if unit.is_player() && !self.level.is_visible(other.pos()) {
            return Err(Error::InvalidArgument("target not visible"));
        }

        let chassis = unit.chassis().ok_or(Error::NotFound)?;
        let weapons: Vec<SlotRef> = match weapon {
            Some(slot) => {
                let item = chassis.get(slot).ok_or(Error::NotFound)?;
                if item.ranged_profile().is_none() {
                    return Err(Error::InvalidArgument("not a ranged weapon"));
                }
                vec![slot]
            }
            None => chassis
                .ranged()
                .filter(|(_, item)| item.is_ready(now))
                .map(|(s, _)| s)
                .collect(),
        };
        if weapons.is_empty() {
            return Err(Error::NotFound);
        }
        let speed = unit.move_speed;

        for slot in weapons {
            if !self.units.is_alive(target) {
                break;
            }
            self.resolve_attack(attacker, slot, target, true, HitRoll::Random);
        }
        Ok(speed)
    }

    /// Resolve one weapon's attack and narrate it in the message log.
    pub(crate) fn resolve_attack(
        &mut self,
        attacker: UnitId,
        weapon: SlotRef,
        target: UnitId,
        ranged: bool,
        roll: HitRoll,
    ) -> AttackOutcome {
        let now = self.now();

        let Some(unit) = self.units.get(attacker) else {
            return AttackOutcome::Ineffective;
        };
        let Some(item) = unit.equipment(weapon) else {
            log::warn!("resolve_attack: {attacker} has nothing at {weapon:?}");
            return AttackOutcome::Ineffective;
        };
        let profile = if ranged {
            item.ranged_profile()
        } else {
            item.melee_profile()
        };
        let Some(profile) = profile else {
            log::warn!("resolve_attack: {item} can't attack that way");
            return AttackOutcome::Ineffective;
        };
        if !self.units.is_alive(target) {
            log::debug!("resolve_attack: {target} is not there to attack");
            return AttackOutcome::Ineffective;
        }

        let weapon_name = item.name();
        if !item.is_ready(now) {
            msg!(self.log; "The {weapon_name} is offline.");
            return AttackOutcome::Offline;
        }

        let verb = if ranged { "fires" } else { "swings" };
        msg!(self.log; "{} {verb} its {weapon_name}.", unit.name);

        let location = match roll {
            HitRoll::Random => {
                if self.rng.one_chance_in(MISS_ONE_IN) {
                    msg!(self.log; "The attack misses.");
                    return AttackOutcome::Missed;
                }
                match self.units.get(target).and_then(|u| u.chassis()) {
                    Some(c) => c.select_random_item(&mut self.rng, profile.flags),
                    None => HitLocation::Frame,
                }
            }
            #[cfg(test)]
            HitRoll::Forced(location) => location,
        };

        let mut damage = profile.base + self.rng.variation(profile.variation);

        let Some(victim) = self.units.get_mut(target) else {
            return AttackOutcome::Ineffective;
        };
        let struck = match location {
            HitLocation::Frame => victim.chassis.as_mut(),
            HitLocation::Slot(slot) => victim.equipment_mut(slot),
        };
        let Some(struck) = struck else {
            if location == HitLocation::Frame {
                // Chassisless units don't survive hits.
                self.destroy_unit(target);
                return AttackOutcome::Wrecked;
            }
            log::warn!("resolve_attack: {target} has nothing at {location:?}");
            return AttackOutcome::Ineffective;
        };

        if !ranged && !profile.flags.contains(AttackFlags::PIERCING) {
            damage = (damage - struck.armor).max(0);
        }
        struck.durability -= damage;
        log::debug!(
            "{attacker} hits {target} {location:?} for {damage}, {} left",
            struck.durability
        );

        if struck.is_destroyed() {
            msg!(self.log; "Destroyed:");
            msg!(self.log; "{}", struck.padded_name(2, ' '));
            match location {
                HitLocation::Frame => {
                    self.destroy_unit(target);
                    AttackOutcome::Wrecked
                }
                HitLocation::Slot(slot) => {
                    if let Err(e) = self.destroy_equipment(target, slot) {
                        log::warn!("resolve_attack: {e}");
                    }
                    AttackOutcome::Destroyed(location)
                }
            }
        } else if profile.flags.contains(AttackFlags::DISABLING) {
            struck.rearm_at = struck.rearm_at.max(now) + DISABLE_COOLDOWN;
            msg!(self.log; "Disabled:");
            msg!(self.log; "{}", struck.padded_name(2, ' '));
            AttackOutcome::Disabled(location)
        } else {
            msg!(self.log; "Damaged:");
            msg!(self.log; "{}", struck.padded_name(2, ' '));
            AttackOutcome::Damaged(location)
        }
    }

    /// Detach and scrap an equipped item.
    pub fn destroy_equipment(&mut self, unit: UnitId, slot: SlotRef) -> Result<()> {
        let chassis = self
            .units
            .get_mut(unit)
            .and_then(|u| u.chassis_mut())
            .ok_or(Error::NotFound)?;
        let item = chassis.find_and_remove(slot)?;
        log::debug!("{unit} lost {item}");
        Ok(())
    }

    /// Wreck a unit, spilling its equipment and inventory on the ground.
    pub(crate) fn destroy_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.get_mut(id) else {
            return;
        };
        if !unit.alive {
            return;
        }
        unit.alive = false;

        let pos = unit.pos;
        let name = unit.name.clone();
        let mut spill = Vec::new();
        if let Some(mut frame) = unit.chassis.take() {
            if let Some(c) = frame.as_chassis_mut() {
                spill.extend(c.remove_all());
            }
            if !frame.is_destroyed() {
                spill.push(frame);
            }
        }
        spill.append(&mut unit.inventory);
        spill.push(Item::remains(name.clone()));

        for item in spill {
            if let Err(item) = self.level.drop_item(pos, item) {
                log::warn!("destroy_unit: {item} fell off the map");
            }
        }
        self.level.clear_unit(pos);
        self.scheduler.release(id);
        msg!(self.log; "{name} is destroyed!");
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ArmKind, ChassisKind, Config, MountKind, SlotFamily, SystemKind};

    fn arena() -> Runtime {
        let config = Config {
            ai_units: 0,
            ..Default::default()
        };
        Runtime::new(config, Level::new(10, 10))
    }

    fn fighter(name: &str) -> Unit {
        Unit::new(name, 'r').with_chassis(Item::chassis(ChassisKind::Basic))
    }

    fn log_lines(r: &Runtime) -> Vec<String> {
        r.log().iter().cloned().collect()
    }

    #[test]
    fn forced_hit_destroys_item() {
        let mut r = arena();
        let a = r
            .spawn(fighter("attacker").with_equipment([Item::arm(ArmKind::Claw)]), ivec2(1, 1))
            .unwrap();
        let t = r
            .spawn(
                fighter("target")
                    .with_equipment([Item::system(SystemKind::Battery).with_stats(25, 0)]),
                ivec2(2, 1),
            )
            .unwrap();

        let slot = SlotRef::new(SlotFamily::System, 0);
        let outcome = r.resolve_attack(
            a,
            SlotRef::new(SlotFamily::Arm, 0),
            t,
            false,
            HitRoll::Forced(HitLocation::Slot(slot)),
        );

        assert_eq!(outcome, AttackOutcome::Destroyed(HitLocation::Slot(slot)));
        assert_eq!(
            log_lines(&r),
            vec!["attacker swings its claw arm.", "Destroyed:", "  battery"]
        );
        let target = r.unit(t).unwrap();
        assert!(target.alive);
        assert_eq!(target.chassis().unwrap().item_count(), 0);
    }

    #[test]
    fn armor_soaks_damage() {
        let mut r = arena();
        let a = r
            .spawn(fighter("a").with_equipment([Item::arm(ArmKind::Claw)]), ivec2(1, 1))
            .unwrap();
        let t = r
            .spawn(
                fighter("t").with_equipment([Item::system(SystemKind::Plating).with_stats(100, 50)]),
                ivec2(2, 1),
            )
            .unwrap();
        let slot = SlotRef::new(SlotFamily::System, 0);
        let outcome = r.resolve_attack(
            a,
            SlotRef::new(SlotFamily::Arm, 0),
            t,
            false,
            HitRoll::Forced(HitLocation::Slot(slot)),
        );
        assert_eq!(outcome, AttackOutcome::Damaged(HitLocation::Slot(slot)));
        // 30..39 damage against 50 armor floors at zero.
        assert_eq!(r.unit(t).unwrap().equipment(slot).unwrap().durability, 100);
    }

    #[test]
    fn piercing_and_ranged_ignore_armor() {
        let mut r = arena();
        let a = r
            .spawn(
                fighter("a").with_equipment([
                    Item::arm(ArmKind::EnergyLance),
                    Item::mount(MountKind::Laser),
                ]),
                ivec2(1, 1),
            )
            .unwrap();
        let t = r
            .spawn(
                fighter("t").with_equipment([Item::system(SystemKind::Plating).with_stats(200, 50)]),
                ivec2(2, 1),
            )
            .unwrap();
        let slot = SlotRef::new(SlotFamily::System, 0);
        let hit = HitRoll::Forced(HitLocation::Slot(slot));

        r.resolve_attack(a, SlotRef::new(SlotFamily::Arm, 0), t, false, hit);
        let after_lance = r.unit(t).unwrap().equipment(slot).unwrap().durability;
        assert!((151..=165).contains(&after_lance), "{after_lance}");

        r.resolve_attack(a, SlotRef::new(SlotFamily::Mount, 0), t, true, hit);
        let after_laser = r.unit(t).unwrap().equipment(slot).unwrap().durability;
        let dealt = after_lance - after_laser;
        assert!((25..35).contains(&dealt), "{dealt}");
    }

    #[test]
    fn disabling_hit() {
        let mut r = arena();
        let a = r
            .spawn(fighter("a").with_equipment([Item::arm(ArmKind::Shock)]), ivec2(1, 1))
            .unwrap();
        let t = r
            .spawn(fighter("t").with_equipment([Item::arm(ArmKind::Claw)]), ivec2(2, 1))
            .unwrap();
        let claw = SlotRef::new(SlotFamily::Arm, 0);
        let outcome = r.resolve_attack(
            a,
            claw,
            t,
            false,
            HitRoll::Forced(HitLocation::Slot(claw)),
        );
        assert_eq!(outcome, AttackOutcome::Disabled(HitLocation::Slot(claw)));
        let rearm = r.unit(t).unwrap().equipment(claw).unwrap().rearm_at;
        assert_eq!(rearm, Instant::from_ticks(DISABLE_COOLDOWN));

        // The disabled claw can't strike back.
        r.log_mut().clear();
        assert_eq!(
            r.resolve_attack(t, claw, a, false, HitRoll::Random),
            AttackOutcome::Offline
        );
        assert_eq!(log_lines(&r), vec!["The claw arm is offline."]);
    }

    #[test]
    fn frame_destruction_spills_items() {
        let mut r = arena();
        let a = r
            .spawn(fighter("a").with_equipment([Item::arm(ArmKind::Hammer)]), ivec2(1, 1))
            .unwrap();
        let mut victim = fighter("victim")
            .with_equipment([Item::arm(ArmKind::Claw)])
            .with_inventory([Item::mount(MountKind::Laser)]);
        victim.chassis = victim.chassis.map(|c| c.with_stats(1, 0));
        let t = r.spawn(victim, ivec2(2, 1)).unwrap();

        let outcome = r.resolve_attack(
            a,
            SlotRef::new(SlotFamily::Arm, 0),
            t,
            false,
            HitRoll::Forced(HitLocation::Frame),
        );
        assert_eq!(outcome, AttackOutcome::Wrecked);
        assert!(!r.units().is_alive(t));
        assert_eq!(r.level().unit_at(ivec2(2, 1)), None);
        assert!(!r.scheduler().is_scheduled(t));

        let names: Vec<String> =
            r.level().items_at(ivec2(2, 1)).iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["claw arm", "laser", "victim remains"]);
        assert_eq!(
            log_lines(&r),
            vec![
                "a swings its hammer arm.",
                "Destroyed:",
                "  basic chassis",
                "victim is destroyed!"
            ]
        );

        // Nothing left to hit.
        assert_eq!(
            r.resolve_attack(a, SlotRef::new(SlotFamily::Arm, 0), t, false, HitRoll::Random),
            AttackOutcome::Ineffective
        );
    }

    #[test]
    fn chassisless_units_die_to_any_hit() {
        let mut r = arena();
        let a = r
            .spawn(fighter("a").with_equipment([Item::arm(ArmKind::Claw)]), ivec2(1, 1))
            .unwrap();
        let t = r.spawn(Unit::new("mouse", 'm'), ivec2(2, 1)).unwrap();
        let outcome = r.resolve_attack(
            a,
            SlotRef::new(SlotFamily::Arm, 0),
            t,
            false,
            HitRoll::Forced(HitLocation::Frame),
        );
        assert_eq!(outcome, AttackOutcome::Wrecked);
        assert!(!r.units().is_alive(t));
    }

    #[test]
    fn melee_attack_uses_every_arm() {
        let mut r = arena();
        let a = r
            .spawn(
                fighter("a").with_equipment([
                    Item::arm(ArmKind::Claw),
                    Item::arm(ArmKind::Claw),
                    Item::mount(MountKind::Laser),
                ]),
                ivec2(1, 1),
            )
            .unwrap();
        let t = r
            .spawn(Unit::new("t", 't').with_chassis(Item::chassis(ChassisKind::Heavy)), ivec2(2, 1))
            .unwrap();
        let unarmed = r.spawn(fighter("u"), ivec2(3, 3)).unwrap();

        assert_eq!(r.melee_attack(a, t), Some(crate::AI_SPEED));
        let swings = r.log().iter().filter(|l| l.contains("swings")).count();
        assert_eq!(swings, 2);

        assert_eq!(r.melee_attack(unarmed, t), None);
        assert_eq!(r.melee_attack(a, a), None);
    }

    #[test]
    fn melee_attack_stops_when_target_dies() {
        let mut r = arena();
        let a = r
            .spawn(
                fighter("a").with_equipment([Item::arm(ArmKind::Claw), Item::arm(ArmKind::Claw)]),
                ivec2(1, 1),
            )
            .unwrap();
        let t = r.spawn(Unit::new("mouse", 'm'), ivec2(2, 1)).unwrap();

        // Keep attacking until a swing lands, the first landed hit kills.
        for _ in 0..20 {
            r.log_mut().clear();
            r.melee_attack(a, t);
            if !r.units().is_alive(t) {
                break;
            }
        }
        assert!(!r.units().is_alive(t));
        let swings = r.log().iter().filter(|l| l.contains("swings")).count();
        let misses = r.log().iter().filter(|l| l.contains("misses")).count();
        assert_eq!(swings, misses + 1);
    }

    #[test]
    fn ranged_attack_range() {
        let mut r = arena();
        let a = r
            .spawn(fighter("a").with_equipment([Item::mount(MountKind::Laser)]), ivec2(0, 0))
            .unwrap();
        let near = r.spawn(fighter("near"), ivec2(3, 3)).unwrap();
        let far = r.spawn(fighter("far"), ivec2(9, 9)).unwrap();

        assert_eq!(r.ranged_attack(a, near, None), Ok(crate::AI_SPEED));
        assert!(matches!(
            r.ranged_attack(a, far, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            r.ranged_attack(a, near, Some(SlotRef::new(SlotFamily::Arm, 0))),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn damage_never_destroys_twice() {
        let mut r = arena();
        let a = r
            .spawn(fighter("a").with_equipment([Item::arm(ArmKind::Claw)]), ivec2(1, 1))
            .unwrap();
        let t = r
            .spawn(fighter("t").with_equipment([Item::arm(ArmKind::Shock)]), ivec2(2, 1))
            .unwrap();
        for _ in 0..200 {
            if !r.units().is_alive(t) {
                break;
            }
            r.melee_attack(a, t);
        }
        assert!(!r.units().is_alive(t));
        let destroyed = r.log().iter().filter(|l| *l == "Destroyed:").count();
        let arm_survived = r
            .level()
            .items_at(ivec2(2, 1))
            .iter()
            .any(|i| i.name() == "shock arm");
        assert_eq!(destroyed, if arm_survived { 1 } else { 2 });
    }
}
