//! Units and the registry that owns them.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{prelude::*, AI_SPEED, AI_VISION};

/// Handle to a unit in the runtime's registry.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Display,
)]
#[display("#{_0}")]
pub struct UnitId(pub(crate) usize);

/// What decides a unit's actions.
#[derive(
    Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Brain {
    /// Waits for commands from the input layer.
    Player,
    /// Stands still.
    #[default]
    Idle,
    /// Random walk, attacks whatever of the other team it bumps into.
    Wander,
}

#[derive(
    Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Team {
    Friendly,
    #[default]
    Hostile,
}

#[derive(Clone, Debug)]
pub struct Unit {
    pub name: String,
    pub glyph: char,
    pub(crate) pos: IVec2,
    pub alive: bool,
    /// Ticks a standard action takes.
    pub move_speed: i64,
    pub vision_range: i32,
    /// Chassis item, units without one get wrecked by any hit.
    pub chassis: Option<Item>,
    pub inventory: Vec<Item>,
    pub brain: Brain,
    pub team: Team,
}

impl Unit {
    pub fn new(name: impl Into<String>, glyph: char) -> Self {
        Unit {
            name: name.into(),
            glyph,
            pos: Default::default(),
            alive: true,
            move_speed: AI_SPEED,
            vision_range: AI_VISION,
            chassis: None,
            inventory: Vec::new(),
            brain: Brain::default(),
            team: Team::default(),
        }
    }

    /// Builder method for attaching a chassis.
    ///
    /// Non-chassis items are ignored.
    pub fn with_chassis(mut self, chassis: Item) -> Self {
        if chassis.as_chassis().is_some() {
            self.chassis = Some(chassis);
        } else {
            log::warn!("with_chassis: {chassis} is not a chassis");
        }
        self
    }

    /// Builder method for equipping items, items that don't fit go to the
    /// inventory.
    pub fn with_equipment(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        for item in items {
            match self.chassis_mut() {
                Some(c) => {
                    if let Err(refused) = c.add(item) {
                        self.inventory.push(refused.item);
                    }
                }
                None => self.inventory.push(item),
            }
        }
        self
    }

    pub fn with_inventory(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.inventory.extend(items);
        self
    }

    pub fn with_brain(mut self, brain: Brain) -> Self {
        self.brain = brain;
        self
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    pub fn with_speed(mut self, move_speed: i64) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_vision(mut self, vision_range: i32) -> Self {
        self.vision_range = vision_range;
        self
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    pub fn is_player(&self) -> bool {
        self.brain == Brain::Player
    }

    pub fn chassis(&self) -> Option<&Chassis> {
        self.chassis.as_ref().and_then(|c| c.as_chassis())
    }

    pub fn chassis_mut(&mut self) -> Option<&mut Chassis> {
        self.chassis.as_mut().and_then(|c| c.as_chassis_mut())
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.team != other.team
    }

    /// Equipped item at a slot.
    pub fn equipment(&self, slot: SlotRef) -> Option<&Item> {
        self.chassis()?.get(slot)
    }

    pub fn equipment_mut(&mut self, slot: SlotRef) -> Option<&mut Item> {
        self.chassis_mut()?.get_mut(slot)
    }
}

/// Registry of every unit on the level.
///
/// Dead units stay in the registry so their ids keep resolving, they just
/// leave the map and the turn queue.
#[derive(Clone, Default, Debug)]
pub struct Units(Vec<Unit>);

impl Units {
    pub(crate) fn insert(&mut self, unit: Unit) -> UnitId {
        self.0.push(unit);
        UnitId(self.0.len() - 1)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.0.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.0.get_mut(id.0)
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.get(id).is_some_and(|u| u.alive)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.0.iter().enumerate().map(|(i, u)| (UnitId(i), u))
    }

    pub fn live(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.iter().filter(|(_, u)| u.alive)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
