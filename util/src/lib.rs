//! Unopinionated standalone utilities.

mod ascii_map;
pub use ascii_map::AsciiMap;

mod geom;
pub use geom::{clamp_to, Dir, VecExt, DIR_8};

mod rng;
pub use rng::{srng, GameRng, RngExt};

pub type FastHasher = rustc_hash::FxHasher;

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

/// Set with an efficient hash function.
pub use rustc_hash::FxHashSet as HashSet;

pub type DefaultHashBuilder = std::hash::BuildHasherDefault<FastHasher>;

/// Insertion-ordered map with an efficient hash function.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;
