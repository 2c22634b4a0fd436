use thiserror::Error;

use crate::UnitId;

/// Recoverable failures of game operations.
///
/// None of these are fatal, callers either turn them into a message for
/// the player or reinterpret them, like turning `Occupied` into a melee
/// attack.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("the way is blocked")]
    Blocked,

    #[error("unit {0} is in the way")]
    Occupied(UnitId),

    #[error("no free slots")]
    SlotsFull,

    #[error("not found")]
    NotFound,
}
