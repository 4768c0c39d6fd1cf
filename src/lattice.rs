//! The symbol lattice: a bijection between `(block, row, col)` coordinates and
//! alphabet symbols.

use crate::error::{CubigmaError, Result};
use crate::random::DeterministicRng;
use crate::symbols::Alphabet;
use digest::Digest;
use sha2::Sha256;
use std::collections::HashMap;

/// A lattice position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub block: usize,
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(block: usize, row: usize, col: usize) -> Self {
        Self { block, row, col }
    }

    pub fn to_array(self) -> [usize; 3] {
        [self.block, self.row, self.col]
    }

    pub fn from_array(values: [usize; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

/// One of the three lattice axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Block,
    Row,
    Col,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Block, Axis::Row, Axis::Col];

    pub fn index(self) -> usize {
        match self {
            Axis::Block => 0,
            Axis::Row => 1,
            Axis::Col => 2,
        }
    }
}

/// Quarter-turn direction for slice rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Lattice shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub num_blocks: usize,
    pub lines_per_block: usize,
    pub symbols_per_line: usize,
}

impl Dimensions {
    pub fn new(num_blocks: usize, lines_per_block: usize, symbols_per_line: usize) -> Self {
        Self {
            num_blocks,
            lines_per_block,
            symbols_per_line,
        }
    }

    pub fn cube(side: usize) -> Self {
        Self::new(side, side, side)
    }

    /// Cell count, saturating at `usize::MAX`
    pub fn volume(&self) -> usize {
        self.num_blocks
            .saturating_mul(self.lines_per_block)
            .saturating_mul(self.symbols_per_line)
    }

    pub fn is_cube(&self) -> bool {
        self.num_blocks == self.lines_per_block && self.lines_per_block == self.symbols_per_line
    }

    pub fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Block => self.num_blocks,
            Axis::Row => self.lines_per_block,
            Axis::Col => self.symbols_per_line,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.block < self.num_blocks
            && coord.row < self.lines_per_block
            && coord.col < self.symbols_per_line
    }

    fn offset(&self, coord: Coordinate) -> usize {
        (coord.block * self.lines_per_block + coord.row) * self.symbols_per_line + coord.col
    }

    fn coordinate(&self, offset: usize) -> Coordinate {
        let col = offset % self.symbols_per_line;
        let rest = offset / self.symbols_per_line;
        Coordinate::new(rest / self.lines_per_block, rest % self.lines_per_block, col)
    }

    /// Shape of a slice taken perpendicular to `axis`
    fn slice_shape(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::Block => (self.lines_per_block, self.symbols_per_line),
            Axis::Row => (self.num_blocks, self.symbols_per_line),
            Axis::Col => (self.num_blocks, self.lines_per_block),
        }
    }

    fn slice_coordinate(&self, axis: Axis, index: usize, i: usize, j: usize) -> Coordinate {
        match axis {
            Axis::Block => Coordinate::new(index, i, j),
            Axis::Row => Coordinate::new(i, index, j),
            Axis::Col => Coordinate::new(i, j, index),
        }
    }
}

/// Total bijection between coordinates and symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    dims: Dimensions,
    cells: Vec<String>,
    index: HashMap<String, usize>,
}

impl Lattice {
    /// Lay the alphabet out row-major (block, then row, then column)
    pub fn build(alphabet: &Alphabet, dims: Dimensions) -> Result<Self> {
        Self::from_symbols(alphabet.symbols().to_vec(), dims)
    }

    pub fn from_symbols(symbols: Vec<String>, dims: Dimensions) -> Result<Self> {
        if dims.volume() == 0 || symbols.len() != dims.volume() {
            return Err(CubigmaError::DimensionMismatch {
                symbols: symbols.len(),
                volume: dims.volume(),
            });
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (offset, symbol) in symbols.iter().enumerate() {
            if index.insert(symbol.clone(), offset).is_some() {
                return Err(CubigmaError::validation(
                    "lattice",
                    format!("symbol {:?} appears twice", symbol),
                ));
            }
        }
        Ok(Self {
            dims,
            cells: symbols,
            index,
        })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Symbols in row-major order
    pub fn symbols(&self) -> &[String] {
        &self.cells
    }

    pub fn symbol_at(&self, coord: Coordinate) -> Result<&str> {
        if !self.dims.contains(coord) {
            return Err(CubigmaError::InvalidParameter(format!(
                "coordinate {:?} outside lattice {:?}",
                coord, self.dims
            )));
        }
        Ok(&self.cells[self.dims.offset(coord)])
    }

    pub fn coordinate_of(&self, symbol: &str) -> Result<Coordinate> {
        self.index
            .get(symbol)
            .map(|&offset| self.dims.coordinate(offset))
            .ok_or_else(|| CubigmaError::SymbolNotFound(symbol.to_string()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Nested `[block][row][col]` view
    pub fn to_nested(&self) -> Vec<Vec<Vec<String>>> {
        self.cells
            .chunks(self.dims.lines_per_block * self.dims.symbols_per_line)
            .map(|block| {
                block
                    .chunks(self.dims.symbols_per_line)
                    .map(|line| line.to_vec())
                    .collect()
            })
            .collect()
    }

    /// Permute symbols in place, keeping the shape
    pub fn shuffle_with(&mut self, rng: &mut DeterministicRng) {
        rng.shuffle(&mut self.cells);
        self.reindex();
    }

    /// Copy shuffled with a generator seeded on `"{key}|{tag}"`
    pub fn shuffle_with_key(&self, key: &str, tag: impl std::fmt::Display) -> Self {
        let mut shuffled = self.clone();
        shuffled.shuffle_with(&mut DeterministicRng::tagged(key, tag));
        shuffled
    }

    /// 2D slice perpendicular to `axis` at `index`
    pub fn slice(&self, axis: Axis, index: usize) -> Result<Vec<Vec<String>>> {
        self.check_slice_index(axis, index)?;
        let (rows, cols) = self.dims.slice_shape(axis);
        Ok((0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| {
                        let coord = self.dims.slice_coordinate(axis, index, i, j);
                        self.cells[self.dims.offset(coord)].clone()
                    })
                    .collect()
            })
            .collect())
    }

    /// Quarter-turn one slice. The slice must be square.
    pub fn rotate_slice(&mut self, axis: Axis, index: usize, rotation: Rotation) -> Result<()> {
        self.check_slice_index(axis, index)?;
        let (rows, cols) = self.dims.slice_shape(axis);
        if rows != cols {
            return Err(CubigmaError::validation(
                "lattice",
                format!("slice across {:?} is {}x{}, not square", axis, rows, cols),
            ));
        }
        let rotated = rotate_2d(&self.slice(axis, index)?, rotation);
        for (i, line) in rotated.into_iter().enumerate() {
            for (j, symbol) in line.into_iter().enumerate() {
                let offset = self.dims.offset(self.dims.slice_coordinate(axis, index, i, j));
                self.index.insert(symbol.clone(), offset);
                self.cells[offset] = symbol;
            }
        }
        Ok(())
    }

    /// Hex SHA-256 over the cell contents; safe to log
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for symbol in &self.cells {
            hasher.update((symbol.len() as u32).to_le_bytes());
            hasher.update(symbol.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn check_slice_index(&self, axis: Axis, index: usize) -> Result<()> {
        if index >= self.dims.axis_len(axis) {
            return Err(CubigmaError::InvalidParameter(format!(
                "slice {} outside axis {:?} of length {}",
                index,
                axis,
                self.dims.axis_len(axis)
            )));
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (offset, symbol) in self.cells.iter().enumerate() {
            self.index.insert(symbol.clone(), offset);
        }
    }
}

/// Quarter-turn a rectangular grid
pub fn rotate_2d<T: Clone>(grid: &[Vec<T>], rotation: Rotation) -> Vec<Vec<T>> {
    let rows = grid.len();
    if rows == 0 {
        return Vec::new();
    }
    let cols = grid[0].len();
    match rotation {
        Rotation::Clockwise => (0..cols)
            .map(|i| (0..rows).map(|j| grid[rows - 1 - j][i].clone()).collect())
            .collect(),
        Rotation::CounterClockwise => (0..cols)
            .map(|i| (0..rows).map(|j| grid[j][cols - 1 - i].clone()).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn letters(n: usize) -> Alphabet {
        let symbols = (0..n)
            .map(|i| char::from_u32(0x41 + i as u32).unwrap().to_string())
            .collect();
        Alphabet::new(symbols).unwrap()
    }

    fn grid(rows: &[&str]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.chars().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_build_is_bijection() {
        let alphabet = letters(24);
        let lattice = Lattice::build(&alphabet, Dimensions::new(2, 3, 4)).unwrap();
        let mut seen = HashSet::new();
        for b in 0..2 {
            for r in 0..3 {
                for c in 0..4 {
                    let coord = Coordinate::new(b, r, c);
                    let symbol = lattice.symbol_at(coord).unwrap();
                    assert!(seen.insert(symbol.to_string()));
                    assert_eq!(lattice.coordinate_of(symbol).unwrap(), coord);
                }
            }
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_build_row_major() {
        let lattice = Lattice::build(&letters(8), Dimensions::cube(2)).unwrap();
        assert_eq!(lattice.symbol_at(Coordinate::new(0, 0, 1)).unwrap(), "B");
        assert_eq!(lattice.symbol_at(Coordinate::new(0, 1, 0)).unwrap(), "C");
        assert_eq!(lattice.symbol_at(Coordinate::new(1, 0, 0)).unwrap(), "E");
        assert_eq!(lattice.to_nested()[1][1], vec!["G", "H"]);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            Lattice::build(&letters(26), Dimensions::cube(3)),
            Err(CubigmaError::DimensionMismatch { symbols: 26, volume: 27 })
        ));
    }

    #[test]
    fn test_oversized_dimensions_do_not_overflow() {
        let dims = Dimensions::cube(3_000_000);
        assert_eq!(dims.volume(), usize::MAX);
        assert!(matches!(
            Lattice::build(&letters(8), dims),
            Err(CubigmaError::DimensionMismatch { symbols: 8, .. })
        ));
    }

    #[test]
    fn test_missing_symbol() {
        let lattice = Lattice::build(&letters(8), Dimensions::cube(2)).unwrap();
        assert!(matches!(
            lattice.coordinate_of("z"),
            Err(CubigmaError::SymbolNotFound(_))
        ));
    }

    #[test]
    fn test_shuffle_with_key_keeps_shape() {
        let base = Lattice::build(&letters(27), Dimensions::cube(3)).unwrap();
        let a = base.shuffle_with_key("key", 1);
        let b = base.shuffle_with_key("key", 1);
        let c = base.shuffle_with_key("key", 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, base);
        assert_eq!(a.dims(), base.dims());
        let mut sorted = a.symbols().to_vec();
        sorted.sort();
        assert_eq!(sorted, base.symbols());
        for symbol in base.symbols() {
            let coord = a.coordinate_of(symbol).unwrap();
            assert_eq!(a.symbol_at(coord).unwrap(), symbol);
        }
    }

    #[test]
    fn test_rotate_2d_clockwise() {
        let rotated = rotate_2d(&grid(&["abc", "def", "ghi"]), Rotation::Clockwise);
        assert_eq!(rotated, grid(&["gda", "heb", "ifc"]));
    }

    #[test]
    fn test_rotate_2d_counter_clockwise_undoes_clockwise() {
        let original = grid(&["abc", "def", "ghi"]);
        let there = rotate_2d(&original, Rotation::Clockwise);
        assert_eq!(rotate_2d(&there, Rotation::CounterClockwise), original);
        assert_eq!(
            rotate_2d(&original, Rotation::CounterClockwise),
            grid(&["cfi", "beh", "adg"])
        );
    }

    #[test]
    fn test_rotate_slice_updates_lookup() {
        let mut lattice = Lattice::build(&letters(27), Dimensions::cube(3)).unwrap();
        let before = lattice.slice(Axis::Row, 1).unwrap();
        lattice.rotate_slice(Axis::Row, 1, Rotation::Clockwise).unwrap();
        assert_eq!(
            lattice.slice(Axis::Row, 1).unwrap(),
            rotate_2d(&before, Rotation::Clockwise)
        );
        for symbol in letters(27).symbols() {
            let coord = lattice.coordinate_of(symbol).unwrap();
            assert_eq!(lattice.symbol_at(coord).unwrap(), symbol);
        }
        // untouched slice
        assert_eq!(lattice.symbol_at(Coordinate::new(0, 0, 0)).unwrap(), "A");
    }

    #[test]
    fn test_four_quarter_turns_identity() {
        let original = Lattice::build(&letters(27), Dimensions::cube(3)).unwrap();
        let mut lattice = original.clone();
        for _ in 0..4 {
            lattice.rotate_slice(Axis::Col, 2, Rotation::CounterClockwise).unwrap();
        }
        assert_eq!(lattice, original);
    }

    #[test]
    fn test_rotate_non_square_slice_rejected() {
        let mut lattice = Lattice::build(&letters(24), Dimensions::new(2, 3, 4)).unwrap();
        assert!(lattice.rotate_slice(Axis::Block, 0, Rotation::Clockwise).is_err());
        assert!(lattice.rotate_slice(Axis::Row, 5, Rotation::Clockwise).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let base = Lattice::build(&letters(8), Dimensions::cube(2)).unwrap();
        let shuffled = base.shuffle_with_key("k", "t");
        assert_eq!(base.fingerprint().len(), 64);
        assert_eq!(base.fingerprint(), base.clone().fingerprint());
        assert_ne!(base.fingerprint(), shuffled.fingerprint());
    }
}
