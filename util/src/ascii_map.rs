use glam::{ivec2, IVec2};

use crate::HashMap;

/// ASCII art maps for writing level fixtures inline.
///
/// Common leading indentation and leading blank lines are stripped, so the
/// map can be written as an indented raw string in source code.
#[derive(Clone, Default, Debug)]
pub struct AsciiMap<T> {
    map: String,
    legend: HashMap<char, T>,
}

impl<T> AsciiMap<T> {
    pub fn new(map: &str, legend: impl IntoIterator<Item = (char, T)>) -> Self {
        let legend = legend.into_iter().collect();
        let map = map.trim_end();

        let mut x_skip = usize::MAX;
        for line in map.lines() {
            if line.trim().is_empty() {
                continue;
            }
            x_skip = x_skip
                .min(line.chars().take_while(|c| c.is_whitespace()).count());
        }

        let mut trimmed = String::new();
        for line in map.lines().skip_while(|line| line.trim().is_empty()) {
            for c in line.chars().skip(x_skip) {
                trimmed.push(c);
            }
            trimmed.push('\n');
        }

        AsciiMap {
            map: trimmed,
            legend,
        }
    }

    /// Size of the bounding rectangle of the map text.
    pub fn dim(&self) -> IVec2 {
        let h = self.map.lines().count();
        let w = self.map.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        ivec2(w as i32, h as i32)
    }

    /// Iterate the points and legend entries (if present) on the map.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, char, Option<&T>)> + '_ {
        self.map.lines().enumerate().flat_map(move |(y, line)| {
            line.chars()
                .enumerate()
                .filter(|(_, c)| !c.is_whitespace())
                .map(move |(x, c)| {
                    (ivec2(x as i32, y as i32), c, self.legend.get(&c))
                })
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn indented_map() {
        let map = AsciiMap::new(
            "
            ##.
            #@.",
            [('@', 1)],
        );
        assert_eq!(map.dim(), ivec2(3, 2));

        let cells: Vec<_> = map.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], (ivec2(0, 0), '#', None));
        assert_eq!(cells[4], (ivec2(1, 1), '@', Some(&1)));
    }
}
