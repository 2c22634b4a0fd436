//! Items and their static properties.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::{prelude::*, ChassisKind};

/// What an item is used as, decides which slot family it fits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Chassis,
    Arm,
    Mount,
    System,
    Missile,
    Grenade,
    Mine,
    Turret,
    Device,
    Code,
    Remains,
}

/// How an item is used in a fight.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeaponClass {
    Melee,
    Ranged,
    Tactical,
    Usable,
    NotAWeapon,
}

bitflags! {
    #[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
    pub struct AttackFlags: u32 {
        /// Damage ignores the armor of the struck item.
        const PIERCING = 0x4;
        /// Surviving items get knocked offline for a while.
        const DISABLING = 0x8;
        /// Hits favor the target's chassis frame over its equipment.
        const TARGET_CHASSIS = 0x40;
    }
}

/// Damage roll of a weapon, `base + uniform(0..variation)`.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct AttackProfile {
    pub base: i32,
    pub variation: i32,
    pub flags: AttackFlags,
}

impl AttackProfile {
    pub const fn new(base: i32, variation: i32, flags: AttackFlags) -> Self {
        AttackProfile {
            base,
            variation,
            flags,
        }
    }
}

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum ArmKind {
    Claw,
    Hammer,
    Shock,
    EnergyLance,
}

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum MountKind {
    Laser,
    Stunner,
    MineLayer,
}

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum SystemKind {
    Plating,
    SensorArray,
    Battery,
}

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum UsableKind {
    Missile,
    Grenade,
    Mine,
    Turret,
    Device,
    Code,
}

#[derive(Clone, Debug)]
pub enum ItemKind {
    Chassis(Chassis),
    Arm(ArmKind),
    Mount(MountKind),
    System(SystemKind),
    Usable(UsableKind),
    /// Wreckage of a destroyed unit, carries the unit's name.
    Remains(String),
}

#[derive(Clone, Debug)]
pub struct Item {
    pub kind: ItemKind,
    pub durability: i32,
    pub max_durability: i32,
    pub armor: i32,
    /// Item can't act before this time.
    pub rearm_at: Instant,
}

impl From<ItemKind> for Item {
    fn from(kind: ItemKind) -> Self {
        use ItemKind::*;
        let (durability, armor) = match &kind {
            Chassis(c) => (c.kind.durability(), c.kind.armor()),
            Arm(ArmKind::Claw) => (40, 1),
            Arm(ArmKind::Hammer) => (50, 2),
            Arm(ArmKind::Shock) => (30, 0),
            Arm(ArmKind::EnergyLance) => (35, 0),
            Mount(MountKind::Laser) => (25, 0),
            Mount(MountKind::Stunner) => (25, 0),
            Mount(MountKind::MineLayer) => (30, 1),
            System(SystemKind::Plating) => (60, 5),
            System(SystemKind::SensorArray) => (20, 0),
            System(SystemKind::Battery) => (30, 1),
            Usable(_) => (10, 0),
            Remains(_) => (1, 0),
        };

        Item {
            kind,
            durability,
            max_durability: durability,
            armor,
            rearm_at: Instant::default(),
        }
    }
}

impl Item {
    pub fn chassis(kind: ChassisKind) -> Self {
        ItemKind::Chassis(Chassis::new(kind)).into()
    }

    pub fn arm(kind: ArmKind) -> Self {
        ItemKind::Arm(kind).into()
    }

    pub fn mount(kind: MountKind) -> Self {
        ItemKind::Mount(kind).into()
    }

    pub fn system(kind: SystemKind) -> Self {
        ItemKind::System(kind).into()
    }

    pub fn usable(kind: UsableKind) -> Self {
        ItemKind::Usable(kind).into()
    }

    pub fn remains(name: impl Into<String>) -> Self {
        ItemKind::Remains(name.into()).into()
    }

    /// Set durability and armor explicitly.
    pub fn with_stats(mut self, durability: i32, armor: i32) -> Self {
        self.durability = durability;
        self.max_durability = durability;
        self.armor = armor;
        self
    }

    pub fn category(&self) -> Category {
        use ItemKind::*;
        match &self.kind {
            Chassis(_) => Category::Chassis,
            Arm(_) => Category::Arm,
            Mount(_) => Category::Mount,
            System(_) => Category::System,
            Usable(UsableKind::Missile) => Category::Missile,
            Usable(UsableKind::Grenade) => Category::Grenade,
            Usable(UsableKind::Mine) => Category::Mine,
            Usable(UsableKind::Turret) => Category::Turret,
            Usable(UsableKind::Device) => Category::Device,
            Usable(UsableKind::Code) => Category::Code,
            Remains(_) => Category::Remains,
        }
    }

    pub fn weapon_class(&self) -> WeaponClass {
        use ItemKind::*;
        match &self.kind {
            Arm(_) => WeaponClass::Melee,
            Mount(MountKind::Laser | MountKind::Stunner) => WeaponClass::Ranged,
            Mount(MountKind::MineLayer) => WeaponClass::Tactical,
            Usable(UsableKind::Missile | UsableKind::Grenade) => {
                WeaponClass::Usable
            }
            _ => WeaponClass::NotAWeapon,
        }
    }

    pub fn glyph(&self) -> char {
        use ItemKind::*;
        match &self.kind {
            Chassis(_) => '[',
            Arm(_) => '(',
            Mount(_) => '{',
            System(_) => '*',
            Usable(UsableKind::Missile) => '/',
            Usable(UsableKind::Grenade) => '!',
            Usable(UsableKind::Mine) => '^',
            Usable(UsableKind::Turret) => '&',
            Usable(UsableKind::Device) => '?',
            Usable(UsableKind::Code) => '"',
            Remains(_) => '%',
        }
    }

    pub fn name(&self) -> String {
        use ItemKind::*;
        match &self.kind {
            Chassis(c) => format!("{} chassis", c.kind.name()),
            Arm(ArmKind::Claw) => "claw arm".into(),
            Arm(ArmKind::Hammer) => "hammer arm".into(),
            Arm(ArmKind::Shock) => "shock arm".into(),
            Arm(ArmKind::EnergyLance) => "energy lance".into(),
            Mount(MountKind::Laser) => "laser".into(),
            Mount(MountKind::Stunner) => "stunner".into(),
            Mount(MountKind::MineLayer) => "mine layer".into(),
            System(SystemKind::Plating) => "armor plating".into(),
            System(SystemKind::SensorArray) => "sensor array".into(),
            System(SystemKind::Battery) => "battery".into(),
            Usable(UsableKind::Missile) => "missile".into(),
            Usable(UsableKind::Grenade) => "grenade".into(),
            Usable(UsableKind::Mine) => "mine".into(),
            Usable(UsableKind::Turret) => "turret".into(),
            Usable(UsableKind::Device) => "device".into(),
            Usable(UsableKind::Code) => "code cartridge".into(),
            Remains(name) => format!("{name} remains"),
        }
    }

    /// Name indented by `indent` copies of `pad`, for nested log lines.
    pub fn padded_name(&self, indent: usize, pad: char) -> String {
        let mut ret: String = std::iter::repeat(pad).take(indent).collect();
        ret.push_str(&self.name());
        ret
    }

    /// Text shown when the item is inspected.
    pub fn describe(&self) -> Vec<String> {
        use ItemKind::*;
        let blurb = match &self.kind {
            Chassis(c) => c.kind.blurb(),
            Arm(ArmKind::Claw) => "A gripping claw, good for tearing things apart.",
            Arm(ArmKind::Hammer) => {
                "A heavy hammer that goes for the frame of its target."
            }
            Arm(ArmKind::Shock) => "Electrified prod that knocks equipment offline.",
            Arm(ArmKind::EnergyLance) => "Focused energy blade that cuts through armor.",
            Mount(MountKind::Laser) => "A mounted laser. Armor does not stop it.",
            Mount(MountKind::Stunner) => "Mounted ion gun that disables equipment.",
            Mount(MountKind::MineLayer) => "Drops mines behind the robot.",
            System(SystemKind::Plating) => "Extra armor plates bolted onto the frame.",
            System(SystemKind::SensorArray) => "Sensors for spotting things further away.",
            System(SystemKind::Battery) => "Spare power cell.",
            Usable(UsableKind::Missile) => "A self-guided missile.",
            Usable(UsableKind::Grenade) => "Throw it and step back.",
            Usable(UsableKind::Mine) => "Explodes when something steps on it.",
            Usable(UsableKind::Turret) => "Unfolds into a stationary gun.",
            Usable(UsableKind::Device) => "Some sort of gadget.",
            Usable(UsableKind::Code) => "A cartridge of robot firmware.",
            Remains(_) => "Scrap left behind by a destroyed robot.",
        };

        let mut ret = vec![self.name(), blurb.to_string()];
        if self.max_durability > 0 {
            ret.push(format!(
                "Durability: {}/{}",
                self.durability, self.max_durability
            ));
        }
        if self.armor > 0 {
            ret.push(format!("Armor: {}", self.armor));
        }
        if let Some(p) = self.melee_profile().or(self.ranged_profile()) {
            ret.push(format!("Damage: {}-{}", p.base, p.base + p.variation - 1));
        }
        if let ItemKind::Chassis(c) = &self.kind {
            let (a, m, s) = c.kind.slots();
            ret.push(format!("Slots: {a} arms, {m} mounts, {s} systems"));
        }
        ret
    }

    /// Using the item needs a target picked with the aiming reticle.
    pub fn is_targetted(&self) -> bool {
        self.weapon_class() == WeaponClass::Ranged
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        now >= self.rearm_at
    }

    pub fn is_destroyed(&self) -> bool {
        self.durability <= 0
    }

    pub fn melee_profile(&self) -> Option<AttackProfile> {
        use ArmKind::*;
        let ItemKind::Arm(kind) = self.kind else {
            return None;
        };
        Some(match kind {
            Claw => AttackProfile::new(30, 10, AttackFlags::empty()),
            Hammer => AttackProfile::new(40, 20, AttackFlags::TARGET_CHASSIS),
            Shock => AttackProfile::new(10, 10, AttackFlags::DISABLING),
            EnergyLance => AttackProfile::new(35, 15, AttackFlags::PIERCING),
        })
    }

    pub fn ranged_profile(&self) -> Option<AttackProfile> {
        use MountKind::*;
        match self.kind {
            ItemKind::Mount(Laser) => {
                Some(AttackProfile::new(25, 10, AttackFlags::empty()))
            }
            ItemKind::Mount(Stunner) => {
                Some(AttackProfile::new(5, 5, AttackFlags::DISABLING))
            }
            _ => None,
        }
    }

    pub fn as_chassis(&self) -> Option<&Chassis> {
        match &self.kind {
            ItemKind::Chassis(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_chassis_mut(&mut self) -> Option<&mut Chassis> {
        match &mut self.kind {
            ItemKind::Chassis(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
