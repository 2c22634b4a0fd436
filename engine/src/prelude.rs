pub use crate::{
    msg, Action, Brain, Chassis, Error, Instant, Item, Level, MsgLog, Result,
    Runtime, SlotFamily, SlotRef, Terrain, TurnStatus, Unit, UnitId,
};
pub use glam::{ivec2, IVec2};
pub use util::{Dir, HashMap, HashSet, RngExt, VecExt, DIR_8};
