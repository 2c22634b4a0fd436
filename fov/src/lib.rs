//! Generic field-of-view computation.
//!
//! Recursive shadowcasting over the eight octants around an origin cell.
//! The algorithm only needs to know which cells stop light and tells the
//! caller which cells got lit, so it works with any grid representation.

mod shadowcast;
pub use shadowcast::{cast, Octant, OCTANTS};

/// Grid interface the shadowcaster runs against.
pub trait LightMap {
    /// Whether the cell at `pos` stops light from passing through.
    ///
    /// Cells outside the map should report true so the scan terminates at
    /// the map edge.
    fn is_opaque(&self, pos: [i32; 2]) -> bool;

    /// Mark the cell at `pos` as lit.
    ///
    /// May be called for the same cell more than once, cells on octant
    /// boundaries are covered by two octants.
    fn light(&mut self, pos: [i32; 2]);
}
