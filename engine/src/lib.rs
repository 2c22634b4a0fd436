//! Game logic layer machinery.

/// How far the player can see.
pub const PLAYER_VISION: i32 = 8;

/// How far autonomous units can see.
pub const AI_VISION: i32 = 5;

/// Ticks the player spends on a standard action.
pub const PLAYER_SPEED: i64 = 700;

/// Ticks autonomous units spend on a standard action.
pub const AI_SPEED: i64 = 1000;

/// One in this many attacks misses outright.
pub const MISS_ONE_IN: usize = 4;

/// How long a disabling hit keeps the struck item offline.
pub const DISABLE_COOLDOWN: i64 = 3000;

/// Extra hit location weight of the chassis frame when an attack aims for
/// it.
pub const CHASSIS_TARGET_BIAS: usize = 3;

/// Largest allowed level width or height.
pub const MAX_LEVEL_SIZE: i32 = 1024;

mod action;
pub use action::Action;

mod ai;

mod chassis;
pub use chassis::{
    Chassis, ChassisKind, EquipResult, HitLocation, Refused, SlotFamily, SlotRef,
};

mod combat;
pub use combat::AttackOutcome;

mod config;
pub use config::Config;

mod error;
pub use error::Error;

mod fov;

mod item;
pub use item::{
    ArmKind, AttackFlags, AttackProfile, Category, Item, ItemKind, MountKind,
    SystemKind, UsableKind, WeaponClass,
};

mod level;
pub use level::{Cell, Level, Vision};

mod msg;
pub use msg::MsgLog;

pub mod prelude;

mod runtime;
pub use runtime::{Runtime, TurnStatus};

mod scheduler;
pub use scheduler::Scheduler;

mod terrain;
pub use terrain::{Stairs, Terrain};

mod time;
pub use time::Instant;

mod unit;
pub use unit::{Brain, Team, Unit, UnitId, Units};

pub type Result<T> = std::result::Result<T, Error>;
