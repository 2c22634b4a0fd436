//! Units doing things

use crate::{item::WeaponClass, prelude::*};

/// Turn-consuming commands a unit can perform.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    /// Step in a direction, bump-attacking enemies in the way.
    Move(Dir),
    Wait,
    /// Fire ranged weapons at a unit, every ready one if no slot is given.
    Fire {
        weapon: Option<SlotRef>,
        target: UnitId,
    },
    /// Pick up the item at given index of the ground pile.
    PickUp(usize),
    /// Drop the item at given inventory index.
    Drop(usize),
    /// Equip the item at given inventory index.
    Equip(usize),
    /// Move the item at a flat slot index to inventory.
    Unequip(usize),
}

impl Runtime {
    /// Have a unit perform an action.
    ///
    /// Returns the number of ticks the action took. Errors mean nothing
    /// happened and no time should pass.
    pub fn execute(&mut self, id: UnitId, action: Action) -> Result<i64> {
        use Action::*;

        let unit = self
            .units
            .get(id)
            .filter(|u| u.alive)
            .ok_or(Error::InvalidArgument("no such live unit"))?;
        let speed = unit.move_speed;

        match action {
            Move(dir) => self.step(id, dir),
            Wait => Ok(speed),
            Fire { weapon, target } => self.ranged_attack(id, target, weapon),
            PickUp(idx) => self.pick_up(id, idx),
            Drop(idx) => self.drop(id, idx),
            Equip(idx) => self.equip(id, idx),
            Unequip(idx) => self.unequip(id, idx),
        }
    }

    fn step(&mut self, id: UnitId, dir: Dir) -> Result<i64> {
        let Some(unit) = self.units.get(id) else {
            return Err(Error::NotFound);
        };
        let (pos, speed) = (unit.pos, unit.move_speed);

        match self.level.move_unit(pos, dir) {
            Ok(new_pos) => {
                if let Some(unit) = self.units.get_mut(id) {
                    unit.pos = new_pos;
                }
                if let Some(item) = self.level.items_at(new_pos).last() {
                    if self.units.get(id).is_some_and(|u| u.is_player()) {
                        msg!(self.log; "You see here: {item}.");
                    }
                }
                Ok(speed)
            }
            Err(Error::Occupied(other)) => {
                let is_enemy =
                    match (self.units.get(id), self.units.get(other)) {
                        (Some(a), Some(b)) => a.is_enemy_of(b),
                        _ => false,
                    };
                if !is_enemy {
                    return Err(Error::Occupied(other));
                }
                match self.melee_attack(id, other) {
                    Some(cost) => Ok(cost),
                    None => {
                        if self.units.get(id).is_some_and(|u| u.is_player()) {
                            msg!(self.log; "You have no melee weapons.");
                        }
                        Err(Error::NotFound)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    fn pick_up(&mut self, id: UnitId, idx: usize) -> Result<i64> {
        let pos = self.units.get(id).ok_or(Error::NotFound)?.pos;
        let item = self.level.take_item(pos, idx)?;
        let Some(unit) = self.units.get_mut(id) else {
            let _ = self.level.drop_item(pos, item);
            return Err(Error::NotFound);
        };
        msg!(self.log; "{} picks up the {item}.", unit.name);
        unit.inventory.push(item);
        Ok(unit.move_speed)
    }

    fn drop(&mut self, id: UnitId, idx: usize) -> Result<i64> {
        let unit = self.units.get_mut(id).ok_or(Error::NotFound)?;
        if idx >= unit.inventory.len() {
            return Err(Error::NotFound);
        }
        let item = unit.inventory.remove(idx);
        msg!(self.log; "{} drops the {item}.", unit.name);
        let (pos, speed) = (unit.pos, unit.move_speed);
        if let Err(item) = self.level.drop_item(pos, item) {
            log::warn!("drop: {item} fell off the map");
        }
        Ok(speed)
    }

    fn equip(&mut self, id: UnitId, idx: usize) -> Result<i64> {
        let unit = self.units.get_mut(id).ok_or(Error::NotFound)?;
        if idx >= unit.inventory.len() {
            return Err(Error::NotFound);
        }
        if unit.inventory[idx].weapon_class() == WeaponClass::Usable {
            return Err(Error::InvalidArgument("item can't be equipped"));
        }

        let item = unit.inventory.remove(idx);
        let Some(chassis) = unit.chassis_mut() else {
            unit.inventory.insert(idx, item);
            return Err(Error::InvalidArgument("unit has no chassis"));
        };
        match chassis.add(item) {
            Ok(slot) => {
                let name =
                    chassis.get(slot).map(|i| i.name()).unwrap_or_default();
                msg!(self.log; "{name} equipped.");
                Ok(unit.move_speed)
            }
            Err(refused) => {
                unit.inventory.insert(idx, refused.item);
                if unit.is_player() && refused.error == Error::SlotsFull {
                    msg!(self.log; "No free slots.");
                }
                Err(refused.error)
            }
        }
    }

    fn unequip(&mut self, id: UnitId, flat: usize) -> Result<i64> {
        let unit = self.units.get_mut(id).ok_or(Error::NotFound)?;
        let item = unit
            .chassis_mut()
            .ok_or(Error::InvalidArgument("unit has no chassis"))?
            .remove_any(flat)?;
        msg!(self.log; "{item} removed.");
        unit.inventory.push(item);
        Ok(unit.move_speed)
    }
}
