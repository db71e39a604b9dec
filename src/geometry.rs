use std::fmt;

/// A grid position, `row` first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub fn in_bounds(rows: usize, cols: usize, pos: Pos) -> bool {
    pos.row < rows && pos.col < cols
}

/// Row-major index; callers check bounds first.
pub fn idx(cols: usize, pos: Pos) -> usize {
    pos.row * cols + pos.col
}

/// Moore neighborhood of `center`, clipped to a `rows x cols` grid.
pub fn neighbors(rows: usize, cols: usize, center: Pos) -> Neighbors {
    Neighbors { center, rows, cols, index: 0 }
}

#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Pos,
    rows: usize,
    cols: usize,
    index: usize,
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dr, dc)) = DISPLACEMENTS.get(self.index) {
            self.index += 1;
            let Some(row) = self.center.row.checked_add_signed(dr) else { continue };
            let Some(col) = self.center.col.checked_add_signed(dc) else { continue };
            let pos = Pos::new(row, col);
            if in_bounds(self.rows, self.cols, pos) {
                return Some(pos);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let mut n: Vec<Pos> = neighbors(3, 3, Pos::new(0, 0)).collect();
        n.sort();
        assert_eq!(n, vec![Pos::new(0, 1), Pos::new(1, 0), Pos::new(1, 1)]);
    }

    #[test]
    fn edge_and_center_counts() {
        assert_eq!(neighbors(3, 3, Pos::new(0, 1)).count(), 5);
        assert_eq!(neighbors(3, 3, Pos::new(1, 1)).count(), 8);
        assert_eq!(neighbors(1, 1, Pos::new(0, 0)).count(), 0);
    }

    #[test]
    fn non_square_bounds() {
        // 2 rows x 4 cols, bottom-right corner
        let n: Vec<Pos> = neighbors(2, 4, Pos::new(1, 3)).collect();
        assert_eq!(n, vec![Pos::new(0, 2), Pos::new(0, 3), Pos::new(1, 2)]);
    }

    #[test]
    fn row_major_index() {
        assert_eq!(idx(30, Pos::new(2, 5)), 65);
        assert!(in_bounds(16, 30, Pos::new(15, 29)));
        assert!(!in_bounds(16, 30, Pos::new(16, 0)));
    }
}
