//! Dense rectangular hex grid

use crate::coords::Cell;
use crate::hex::Hex;

/// Row-major storage of `rows * cols` hexes
#[derive(Clone, Debug, Default)]
pub struct Grid {
    rows: i32,
    cols: i32,
    hexes: Vec<Hex>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows as i32;
        let cols = cols as i32;
        let hexes = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Hex::new(Cell::new(row, col))))
            .collect();
        Self { rows, cols, hexes }
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.row * self.cols + cell.col) as usize)
    }

    pub fn get(&self, cell: Cell) -> Option<&Hex> {
        self.index(cell).map(|i| &self.hexes[i])
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut Hex> {
        self.index(cell).map(move |i| &mut self.hexes[i])
    }

    /// Iterate hexes in row-major order
    pub fn hexes(&self) -> impl Iterator<Item = &Hex> + '_ {
        self.hexes.iter()
    }

    pub fn hexes_mut(&mut self) -> impl Iterator<Item = &mut Hex> + '_ {
        self.hexes.iter_mut()
    }

    /// On-map neighbours of a cell
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors().into_iter().filter(move |&n| self.contains(n))
    }

    /// On-map cells within `radius` of `center` (including the center)
    pub fn cells_within(&self, center: Cell, radius: i32) -> Vec<Cell> {
        let mut cells = Vec::new();
        // Column offsets shift rows by at most radius / 2 + 1 in odd-q layout
        let row_span = radius + radius / 2 + 1;
        for row in (center.row - row_span)..=(center.row + row_span) {
            for col in (center.col - radius)..=(center.col + radius) {
                let cell = Cell::new(row, col);
                if self.contains(cell) && center.distance_to(cell) <= radius {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert!(grid.get(Cell::new(2, 3)).is_some());
        assert!(grid.get(Cell::new(3, 0)).is_none());
        assert!(grid.get(Cell::new(0, -1)).is_none());
        assert_eq!(grid.get(Cell::new(1, 2)).map(|h| h.cell()), Some(Cell::new(1, 2)));
    }

    #[test]
    fn test_neighbors_clipped_at_edges() {
        let grid = Grid::new(5, 5);
        assert_eq!(grid.neighbors(Cell::new(2, 2)).count(), 6);
        assert!(grid.neighbors(Cell::new(0, 0)).count() < 6);
    }

    #[test]
    fn test_cells_within_radius() {
        let grid = Grid::new(20, 20);
        let center = Cell::new(10, 10);
        assert_eq!(grid.cells_within(center, 0), vec![center]);
        assert_eq!(grid.cells_within(center, 1).len(), 7);
        assert_eq!(grid.cells_within(center, 2).len(), 19);
        assert_eq!(grid.cells_within(Cell::new(10, 11), 3).len(), 37);
    }
}
