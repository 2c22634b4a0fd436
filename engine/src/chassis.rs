//! Slot based equipment container.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use thiserror::Error;

use crate::{
    item::{AttackFlags, Category, WeaponClass},
    prelude::*,
    CHASSIS_TARGET_BIAS,
};

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChassisKind {
    Basic,
    Quad,
    Dome,
    Critter,
    Heavy,
    Orb,
}

impl ChassisKind {
    /// Number of arm, mount and system slots.
    pub fn slots(self) -> (usize, usize, usize) {
        use ChassisKind::*;
        match self {
            Basic => (2, 1, 3),
            Quad => (4, 1, 3),
            Dome => (2, 2, 4),
            Critter => (0, 1, 2),
            Heavy => (4, 4, 4),
            Orb => (2, 3, 3),
        }
    }

    pub fn durability(self) -> i32 {
        use ChassisKind::*;
        match self {
            Basic => 100,
            Quad => 120,
            Dome => 80,
            Critter => 30,
            Heavy => 200,
            Orb => 60,
        }
    }

    pub fn armor(self) -> i32 {
        use ChassisKind::*;
        match self {
            Basic => 2,
            Quad => 2,
            Dome => 4,
            Critter => 0,
            Heavy => 6,
            Orb => 1,
        }
    }

    pub fn name(self) -> &'static str {
        use ChassisKind::*;
        match self {
            Basic => "basic",
            Quad => "quad",
            Dome => "dome",
            Critter => "critter",
            Heavy => "heavy",
            Orb => "orb",
        }
    }

    pub(crate) fn blurb(self) -> &'static str {
        use ChassisKind::*;
        match self {
            Basic => "A humanoid frame with two arms.",
            Quad => "A wide frame with four arms.",
            Dome => "A rolling dome with room for extra systems.",
            Critter => "A small and fast frame with no arms at all.",
            Heavy => "A large and slow frame with slots for everything.",
            Orb => "A levitating weapons platform.",
        }
    }
}

/// One of the independently limited equipment chains of a chassis.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum SlotFamily {
    Arm,
    Mount,
    System,
}

impl SlotFamily {
    /// Families in flat slot index order.
    pub const ALL: [SlotFamily; 3] =
        [SlotFamily::Arm, SlotFamily::Mount, SlotFamily::System];

    pub fn of(category: Category) -> Option<SlotFamily> {
        match category {
            Category::Arm => Some(SlotFamily::Arm),
            Category::Mount => Some(SlotFamily::Mount),
            Category::System => Some(SlotFamily::System),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SlotFamily::Arm => "arm",
            SlotFamily::Mount => "mount",
            SlotFamily::System => "system",
        }
    }
}

/// Position of an equipped item inside a chassis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotRef {
    pub family: SlotFamily,
    pub index: usize,
}

impl SlotRef {
    pub const fn new(family: SlotFamily, index: usize) -> Self {
        SlotRef { family, index }
    }
}

/// Where an attack landed on its target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HitLocation {
    /// The chassis frame itself.
    Frame,
    Slot(SlotRef),
}

/// Failed equip, the item is handed back to the caller.
#[derive(Error, Debug)]
#[error("cannot equip {item}: {error}")]
pub struct Refused {
    pub item: Item,
    pub error: Error,
}

/// Outcome of equipping, the slot the item went into.
pub type EquipResult = std::result::Result<SlotRef, Refused>;

#[derive(Clone, Debug)]
pub struct Chassis {
    pub kind: ChassisKind,
    arms: Vec<Item>,
    mounts: Vec<Item>,
    systems: Vec<Item>,
}

impl Chassis {
    pub fn new(kind: ChassisKind) -> Self {
        Chassis {
            kind,
            arms: Vec::new(),
            mounts: Vec::new(),
            systems: Vec::new(),
        }
    }

    pub fn slots(&self, family: SlotFamily) -> usize {
        let (a, m, s) = self.kind.slots();
        match family {
            SlotFamily::Arm => a,
            SlotFamily::Mount => m,
            SlotFamily::System => s,
        }
    }

    /// Items equipped in one slot family, in slot order.
    pub fn chain(&self, family: SlotFamily) -> &[Item] {
        match family {
            SlotFamily::Arm => &self.arms,
            SlotFamily::Mount => &self.mounts,
            SlotFamily::System => &self.systems,
        }
    }

    fn chain_mut(&mut self, family: SlotFamily) -> &mut Vec<Item> {
        match family {
            SlotFamily::Arm => &mut self.arms,
            SlotFamily::Mount => &mut self.mounts,
            SlotFamily::System => &mut self.systems,
        }
    }

    /// Equip an item into the first open slot of the family its category
    /// belongs to.
    pub fn add(&mut self, item: Item) -> EquipResult {
        match SlotFamily::of(item.category()) {
            Some(family) => self.add_to(family, item),
            None => Err(Refused {
                item,
                error: Error::InvalidArgument("item is not equipment"),
            }),
        }
    }

    pub fn add_arm(&mut self, item: Item) -> EquipResult {
        self.add_to(SlotFamily::Arm, item)
    }

    pub fn add_mount(&mut self, item: Item) -> EquipResult {
        self.add_to(SlotFamily::Mount, item)
    }

    pub fn add_system(&mut self, item: Item) -> EquipResult {
        self.add_to(SlotFamily::System, item)
    }

    fn add_to(
        &mut self,
        family: SlotFamily,
        item: Item,
    ) -> EquipResult {
        if SlotFamily::of(item.category()) != Some(family) {
            log::debug!("refusing {} for {} slot", item, family.name());
            return Err(Refused {
                item,
                error: Error::InvalidArgument("item does not fit slot family"),
            });
        }

        let cap = self.slots(family);
        let chain = self.chain_mut(family);
        if chain.len() >= cap {
            return Err(Refused {
                item,
                error: Error::SlotsFull,
            });
        }

        chain.push(item);
        Ok(SlotRef::new(family, chain.len() - 1))
    }

    /// Detach the `n`th item of a slot family.
    ///
    /// Indices past the family's slot count are invalid, indices of empty
    /// slots are not found.
    pub fn remove(&mut self, family: SlotFamily, n: usize) -> Result<Item> {
        if n >= self.slots(family) {
            return Err(Error::InvalidArgument("slot index out of range"));
        }
        let chain = self.chain_mut(family);
        if n >= chain.len() {
            return Err(Error::NotFound);
        }
        Ok(chain.remove(n))
    }

    pub fn remove_arm(&mut self, n: usize) -> Result<Item> {
        self.remove(SlotFamily::Arm, n)
    }

    pub fn remove_mount(&mut self, n: usize) -> Result<Item> {
        self.remove(SlotFamily::Mount, n)
    }

    pub fn remove_system(&mut self, n: usize) -> Result<Item> {
        self.remove(SlotFamily::System, n)
    }

    pub fn total_slots(&self) -> usize {
        SlotFamily::ALL.iter().map(|&f| self.slots(f)).sum()
    }

    /// Map a flat slot index to its family and index within the family.
    ///
    /// Flat indices run over arm slots first, then mounts, then systems.
    pub fn locate(&self, mut flat: usize) -> Option<SlotRef> {
        for family in SlotFamily::ALL {
            let n = self.slots(family);
            if flat < n {
                return Some(SlotRef::new(family, flat));
            }
            flat -= n;
        }
        None
    }

    /// Flat index of a slot reference.
    pub fn flat_index(&self, slot: SlotRef) -> usize {
        SlotFamily::ALL
            .iter()
            .take_while(|&&f| f != slot.family)
            .map(|&f| self.slots(f))
            .sum::<usize>()
            + slot.index
    }

    pub fn slot_family(&self, flat: usize) -> Option<SlotFamily> {
        self.locate(flat).map(|s| s.family)
    }

    pub fn remove_any(&mut self, flat: usize) -> Result<Item> {
        let slot = self
            .locate(flat)
            .ok_or(Error::InvalidArgument("slot index out of range"))?;
        self.remove(slot.family, slot.index)
    }

    pub fn get(&self, slot: SlotRef) -> Option<&Item> {
        self.chain(slot.family).get(slot.index)
    }

    pub fn get_mut(&mut self, slot: SlotRef) -> Option<&mut Item> {
        self.chain_mut(slot.family).get_mut(slot.index)
    }

    pub fn get_flat(&self, flat: usize) -> Option<&Item> {
        self.get(self.locate(flat)?)
    }

    /// Detach the item at a known slot.
    pub fn find_and_remove(&mut self, slot: SlotRef) -> Result<Item> {
        let chain = self.chain_mut(slot.family);
        if slot.index >= chain.len() {
            log::warn!("find_and_remove: nothing at {slot:?}");
            return Err(Error::NotFound);
        }
        Ok(chain.remove(slot.index))
    }

    /// Strip every equipped item.
    pub fn remove_all(&mut self) -> Vec<Item> {
        let mut ret = Vec::new();
        ret.append(&mut self.arms);
        ret.append(&mut self.mounts);
        ret.append(&mut self.systems);
        ret
    }

    pub fn item_count(&self) -> usize {
        self.arms.len() + self.mounts.len() + self.systems.len()
    }

    /// Every equipped item with its slot, in flat slot order.
    pub fn all_items(&self) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        SlotFamily::ALL.into_iter().flat_map(move |family| {
            self.chain(family)
                .iter()
                .enumerate()
                .map(move |(i, item)| (SlotRef::new(family, i), item))
        })
    }

    fn by_class(
        &self,
        class: WeaponClass,
    ) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        self.all_items()
            .filter(move |(_, item)| item.weapon_class() == class)
    }

    pub fn melee(&self) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        self.by_class(WeaponClass::Melee)
    }

    pub fn ranged(&self) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        self.by_class(WeaponClass::Ranged)
    }

    pub fn tactical(&self) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        self.by_class(WeaponClass::Tactical)
    }

    pub fn non_weapons(&self) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        self.by_class(WeaponClass::NotAWeapon)
    }

    /// Size of the hit location die, one face per equipped item plus the
    /// frame's share.
    pub fn hit_roll_range(&self, flags: AttackFlags) -> usize {
        let frame = if flags.contains(AttackFlags::TARGET_CHASSIS) {
            CHASSIS_TARGET_BIAS
        } else {
            1
        };
        self.item_count() + frame
    }

    /// Map a roll in `0..hit_roll_range` to a hit location.
    ///
    /// Rolls below the item count pick items in flat slot order, the rest
    /// hit the frame.
    pub fn hit_location(&self, roll: usize) -> HitLocation {
        match self.all_items().nth(roll) {
            Some((slot, _)) => HitLocation::Slot(slot),
            None => HitLocation::Frame,
        }
    }

    pub fn select_random_item(
        &self,
        rng: &mut impl Rng,
        flags: AttackFlags,
    ) -> HitLocation {
        let roll = rng.gen_range(0..self.hit_roll_range(flags));
        self.hit_location(roll)
    }

    /// One line per flat slot, empty slots shown as `-`.
    pub fn list_equipment(&self) -> Vec<String> {
        let mut ret = Vec::new();
        for family in SlotFamily::ALL {
            for i in 0..self.slots(family) {
                let name = self
                    .get(SlotRef::new(family, i))
                    .map_or_else(|| "-".to_string(), |item| item.name());
                ret.push(format!("{:<7} {name}", family.name()));
            }
        }
        ret
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use util::srng;

    use super::*;
    use crate::{ArmKind, ItemKind, MountKind, SystemKind, UsableKind};

    fn claw() -> Item {
        Item::arm(ArmKind::Claw)
    }

    #[test]
    fn third_arm_does_not_fit() {
        let mut c = Chassis::new(ChassisKind::Basic);
        assert_eq!(c.add_arm(claw()).unwrap(), SlotRef::new(SlotFamily::Arm, 0));
        assert_eq!(c.add_arm(claw()).unwrap(), SlotRef::new(SlotFamily::Arm, 1));
        let refused = c.add_arm(claw()).unwrap_err();
        assert_eq!(refused.error, Error::SlotsFull);
        assert!(matches!(refused.item.kind, ItemKind::Arm(ArmKind::Claw)));
        assert_eq!(c.chain(SlotFamily::Arm).len(), 2);
    }

    #[test]
    fn armless_frame_refuses_arms() {
        let mut c = Chassis::new(ChassisKind::Critter);
        let result: EquipResult = c.add(claw());
        let refused = result.unwrap_err();
        assert_eq!(refused.to_string(), "cannot equip claw arm: no free slots");
        assert_eq!(refused.item.name(), "claw arm");
        assert_eq!(c.item_count(), 0);
    }

    #[test]
    fn wrong_family() {
        let mut c = Chassis::new(ChassisKind::Basic);
        let refused = c.add_mount(claw()).unwrap_err();
        assert!(matches!(refused.error, Error::InvalidArgument(_)));

        let refused = c.add(Item::usable(UsableKind::Grenade)).unwrap_err();
        assert!(matches!(refused.error, Error::InvalidArgument(_)));

        assert_eq!(
            c.add(Item::system(SystemKind::Battery)).unwrap(),
            SlotRef::new(SlotFamily::System, 0)
        );
        assert_eq!(c.item_count(), 1);
    }

    #[test]
    fn flat_addressing() {
        let c = Chassis::new(ChassisKind::Basic);
        assert_eq!(c.total_slots(), 6);
        assert_eq!(c.slot_family(0), Some(SlotFamily::Arm));
        assert_eq!(c.slot_family(1), Some(SlotFamily::Arm));
        assert_eq!(c.slot_family(2), Some(SlotFamily::Mount));
        assert_eq!(c.slot_family(3), Some(SlotFamily::System));
        assert_eq!(c.slot_family(5), Some(SlotFamily::System));
        assert_eq!(c.slot_family(6), None);

        let critter = Chassis::new(ChassisKind::Critter);
        assert_eq!(critter.slot_family(0), Some(SlotFamily::Mount));
    }

    #[test]
    fn removing() {
        let mut c = Chassis::new(ChassisKind::Basic);
        c.add(claw()).unwrap();
        c.add(Item::arm(ArmKind::Hammer)).unwrap();
        c.add(Item::mount(MountKind::Laser)).unwrap();

        assert_eq!(c.remove_system(0).unwrap_err(), Error::NotFound);
        assert!(matches!(
            c.remove_mount(1).unwrap_err(),
            Error::InvalidArgument(_)
        ));

        let hammer = c.remove_any(1).unwrap();
        assert_eq!(hammer.name(), "hammer arm");
        assert_eq!(c.remove_any(1).unwrap_err(), Error::NotFound);

        let laser = c.remove_any(2).unwrap();
        assert_eq!(laser.name(), "laser");
        assert!(matches!(
            c.remove_any(6).unwrap_err(),
            Error::InvalidArgument(_)
        ));

        assert_eq!(c.remove_all().len(), 1);
        assert_eq!(c.item_count(), 0);
    }

    #[test]
    fn filtered_views() {
        let mut c = Chassis::new(ChassisKind::Dome);
        c.add(claw()).unwrap();
        c.add(Item::mount(MountKind::Laser)).unwrap();
        c.add(Item::mount(MountKind::MineLayer)).unwrap();
        c.add(Item::system(SystemKind::Plating)).unwrap();
        c.add(Item::arm(ArmKind::Shock)).unwrap();

        fn names<'a>(it: impl Iterator<Item = (SlotRef, &'a Item)>) -> Vec<String> {
            it.map(|(_, i)| i.name()).collect()
        }
        assert_eq!(
            names(c.all_items()),
            vec!["claw arm", "shock arm", "laser", "mine layer", "armor plating"]
        );
        assert_eq!(names(c.melee()), vec!["claw arm", "shock arm"]);
        assert_eq!(names(c.ranged()), vec!["laser"]);
        assert_eq!(names(c.tactical()), vec!["mine layer"]);
        assert_eq!(names(c.non_weapons()), vec!["armor plating"]);
    }

    #[test]
    fn equipment_listing() {
        let mut c = Chassis::new(ChassisKind::Critter);
        c.add(Item::mount(MountKind::Stunner)).unwrap();
        assert_eq!(
            c.list_equipment(),
            vec!["mount   stunner", "system  -", "system  -"]
        );
    }

    #[test]
    fn hit_location_weights() {
        let mut c = Chassis::new(ChassisKind::Basic);
        c.add(claw()).unwrap();
        c.add(Item::mount(MountKind::Laser)).unwrap();

        assert_eq!(c.hit_roll_range(AttackFlags::empty()), 3);
        assert_eq!(c.hit_roll_range(AttackFlags::TARGET_CHASSIS), 5);

        assert_eq!(
            c.hit_location(0),
            HitLocation::Slot(SlotRef::new(SlotFamily::Arm, 0))
        );
        assert_eq!(
            c.hit_location(1),
            HitLocation::Slot(SlotRef::new(SlotFamily::Mount, 0))
        );
        for roll in 2..5 {
            assert_eq!(c.hit_location(roll), HitLocation::Frame);
        }

        let empty = Chassis::new(ChassisKind::Basic);
        let mut rng = srng(&0);
        for _ in 0..20 {
            assert_eq!(
                empty.select_random_item(&mut rng, AttackFlags::TARGET_CHASSIS),
                HitLocation::Frame
            );
        }
    }

    #[test]
    fn chassis_bias_frequency() {
        let mut c = Chassis::new(ChassisKind::Basic);
        c.add(claw()).unwrap();
        let mut rng = srng(&1);
        let n = 4000;
        let frames = (0..n)
            .filter(|_| {
                c.select_random_item(&mut rng, AttackFlags::TARGET_CHASSIS)
                    == HitLocation::Frame
            })
            .count();
        // Expected 3/4 of hits.
        assert!((2800..3200).contains(&frames), "{frames}");
    }

    #[quickcheck]
    fn slot_counts_hold(ops: Vec<(u8, u8)>) -> bool {
        let mut c = Chassis::new(ChassisKind::Orb);
        for (op, arg) in ops {
            match op % 4 {
                0 => {
                    let _ = c.add(claw());
                }
                1 => {
                    let _ = c.add(Item::mount(MountKind::Laser));
                }
                2 => {
                    let _ = c.add(Item::system(SystemKind::Battery));
                }
                _ => {
                    let _ = c.remove_any(arg as usize % 10);
                }
            }
            if SlotFamily::ALL
                .iter()
                .any(|&f| c.chain(f).len() > c.slots(f))
            {
                return false;
            }
        }
        true
    }

    #[quickcheck]
    fn flat_index_round_trip(i: u8, fill: u8) -> bool {
        let mut c = Chassis::new(ChassisKind::Heavy);
        for n in 0..(fill % 13) {
            let _ = c.add(match n % 3 {
                0 => claw(),
                1 => Item::mount(MountKind::Laser),
                _ => Item::system(SystemKind::Plating),
            });
        }
        let i = i as usize % c.total_slots();
        let family = c.slot_family(i);
        let before: Vec<usize> =
            SlotFamily::ALL.iter().map(|&f| c.chain(f).len()).collect();
        let removed = c.remove_any(i).is_ok();
        let after: Vec<usize> =
            SlotFamily::ALL.iter().map(|&f| c.chain(f).len()).collect();

        let locate_ok = c.locate(i).map(|s| c.flat_index(s)) == Some(i);
        let changed: Vec<SlotFamily> = SlotFamily::ALL
            .iter()
            .zip(before.iter().zip(&after))
            .filter(|(_, (b, a))| b != a)
            .map(|(&f, _)| f)
            .collect();
        locate_ok
            && if removed {
                changed == vec![family.unwrap()]
            } else {
                changed.is_empty()
            }
    }
}
