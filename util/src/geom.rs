use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};

/// 8 directions, clock face order.
pub const DIR_8: [IVec2; 8] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([1, 1]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 1]),
    IVec2::from_array([-1, 0]),
    IVec2::from_array([-1, -1]),
];

/// Compass directions, in the same clock face order as `DIR_8`.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Dir {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Dir {
    pub const ALL: [Dir; 8] = [
        Dir::North,
        Dir::NorthEast,
        Dir::East,
        Dir::SouthEast,
        Dir::South,
        Dir::SouthWest,
        Dir::West,
        Dir::NorthWest,
    ];

    /// Unit step vector, y axis grows southwards.
    pub fn delta(self) -> IVec2 {
        DIR_8[self as usize]
    }

    pub fn reverse(self) -> Dir {
        Dir::ALL[(self as usize + 4) % 8]
    }
}

impl From<Dir> for IVec2 {
    fn from(d: Dir) -> Self {
        d.delta()
    }
}

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Absolute size of vector in chessboard metric.
    fn chess_len(&self) -> i32;

    /// Squared euclidean length.
    fn len2(&self) -> i32;

    /// Vec points to one of the eight surrounding cells.
    fn is_adjacent_8(&self) -> bool {
        self.chess_len() == 1
    }
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self[0].abs() + self[1].abs()
    }

    fn chess_len(&self) -> i32 {
        self[0].abs().max(self[1].abs())
    }

    fn len2(&self) -> i32 {
        self[0] * self[0] + self[1] * self[1]
    }
}

/// Clamp a point into the `[0, w) x [0, h)` rectangle.
pub fn clamp_to(p: IVec2, w: i32, h: i32) -> IVec2 {
    ivec2(p.x.clamp(0, (w - 1).max(0)), p.y.clamp(0, (h - 1).max(0)))
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn dirs() {
        assert_eq!(Dir::North.delta(), ivec2(0, -1));
        assert_eq!(Dir::SouthWest.delta(), ivec2(-1, 1));
        for d in Dir::ALL {
            assert_eq!(d.delta() + d.reverse().delta(), IVec2::ZERO);
            assert!(d.delta().is_adjacent_8());
        }
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_to(ivec2(-1, 5), 10, 10), ivec2(0, 5));
        assert_eq!(clamp_to(ivec2(10, 10), 10, 10), ivec2(9, 9));
        assert_eq!(clamp_to(ivec2(3, 4), 10, 10), ivec2(3, 4));
    }

    #[quickcheck]
    fn clamped_points_are_in_bounds(x: i32, y: i32, w: u8, h: u8) -> bool {
        let (w, h) = (w as i32 + 1, h as i32 + 1);
        let p = clamp_to(ivec2(x, y), w, h);
        (0..w).contains(&p.x)
            && (0..h).contains(&p.y)
            && (!(0..w).contains(&x) || p.x == x)
            && (!(0..h).contains(&y) || p.y == y)
    }
}
