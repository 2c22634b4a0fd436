use crate::LightMap;

/// Symmetry transform that maps scan space coordinates of one octant to
/// map offsets.
///
/// Scan space always runs rows `dy = -1, -2, ...` outwards from the origin
/// with `dx` going from `dy` to 0 along each row.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Octant {
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

impl Octant {
    pub const fn new(xx: i32, xy: i32, yx: i32, yy: i32) -> Self {
        Octant { xx, xy, yx, yy }
    }

    /// Map a scan space offset to an absolute map position.
    pub fn apply(&self, origin: [i32; 2], dx: i32, dy: i32) -> [i32; 2] {
        [
            origin[0] + dx * self.xx + dy * self.xy,
            origin[1] + dx * self.yx + dy * self.yy,
        ]
    }
}

/// The eight octant transforms.
pub const OCTANTS: [Octant; 8] = [
    Octant::new(1, 0, 0, 1),
    Octant::new(0, 1, 1, 0),
    Octant::new(0, -1, 1, 0),
    Octant::new(-1, 0, 0, 1),
    Octant::new(-1, 0, 0, -1),
    Octant::new(0, -1, -1, 0),
    Octant::new(0, 1, -1, 0),
    Octant::new(1, 0, 0, -1),
];

/// Light up cells visible from `origin` within `radius`.
///
/// A cell is lit when its squared distance from the origin is strictly
/// less than `radius * radius` and some part of it is inside the current
/// light wedge. Slopes are measured to cell corners, offset by half a cell
/// on both axes. The origin cell is always lit.
pub fn cast<M: LightMap + ?Sized>(map: &mut M, origin: [i32; 2], radius: i32) {
    map.light(origin);
    if radius <= 0 {
        return;
    }

    for octant in OCTANTS {
        cast_light(map, origin, 1, 1.0, 0.0, radius, octant);
    }
}

fn cast_light<M: LightMap + ?Sized>(
    map: &mut M,
    origin: [i32; 2],
    row: i32,
    mut start: f64,
    end: f64,
    radius: i32,
    octant: Octant,
) {
    if start < end {
        return;
    }

    let radius2 = radius * radius;
    let mut new_start = 0.0;

    for j in row..=radius {
        let dy = -j;
        let mut blocked = false;

        for dx in -j..=0 {
            let left_slope = (dx as f64 - 0.5) / (dy as f64 + 0.5);
            let right_slope = (dx as f64 + 0.5) / (dy as f64 - 0.5);

            if start < right_slope {
                continue;
            } else if end > left_slope {
                break;
            }

            let pos = octant.apply(origin, dx, dy);
            if dx * dx + dy * dy < radius2 {
                map.light(pos);
            }

            let opaque = map.is_opaque(pos);
            if blocked {
                if opaque {
                    new_start = right_slope;
                } else {
                    blocked = false;
                    start = new_start;
                }
            } else if opaque && j < radius {
                // Scan the part of the wedge that got cut off by this cell
                // on the next row, then keep going with a narrower wedge.
                blocked = true;
                cast_light(map, origin, j + 1, start, left_slope, radius, octant);
                new_start = right_slope;
            }
        }

        if blocked {
            break;
        }
    }
}
