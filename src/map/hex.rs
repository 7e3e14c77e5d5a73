//! Hex coordinate system (axial coordinates)
//!
//! Uses axial coordinates (q, r) for neighbor and distance math. Grids are
//! stored in an odd-q offset layout, so conversion helpers live here too.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r), widened so it never overflows
    pub fn s(&self) -> i64 {
        -i64::from(self.q) - i64::from(self.r)
    }

    /// Distance in hex steps, saturating at `u32::MAX`
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (i64::from(self.q) - i64::from(other.q)).abs();
        let dr = (i64::from(self.r) - i64::from(other.r)).abs();
        let ds = (self.s() - other.s()).abs();
        u32::try_from((dq + dr + ds) / 2).unwrap_or(u32::MAX)
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }

    /// Get all 6 neighboring hex coordinates, in `HexDirection::all()` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::all().map(|dir| *self + dir.offset())
    }

    pub fn neighbor(&self, direction: HexDirection) -> HexCoord {
        *self + direction.offset()
    }

    /// Hexes at exactly `radius` steps, walking the ring counter-clockwise
    /// from the south-west corner. Radius 0 is the hex itself.
    pub fn ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }

        let mut results = Vec::with_capacity(6 * radius as usize);
        let mut cursor = *self + HexDirection::SouthWest.offset().scale(radius as i32);
        for direction in HexDirection::all() {
            for _ in 0..radius {
                results.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
        results
    }

    /// All hexes within range (inclusive), ring by ring outward
    pub fn spiral(&self, range: u32) -> Vec<HexCoord> {
        (0..=range).flat_map(|radius| self.ring(radius)).collect()
    }

    fn scale(self, factor: i32) -> Self {
        Self::new(self.q * factor, self.r * factor)
    }

    /// Convert an odd-q offset position (column, row) to axial
    pub fn from_offset(col: i32, row: i32) -> Self {
        let q = col;
        let r = row - (col - (col & 1)) / 2;
        Self::new(q, r)
    }

    /// Convert to an odd-q offset position (column, row)
    pub fn to_offset(&self) -> (i32, i32) {
        let col = self.q;
        let row = self.r + (self.q - (self.q & 1)) / 2;
        (col, row)
    }
}

impl std::ops::Add for HexCoord {
    type Output = HexCoord;

    fn add(self, other: HexCoord) -> HexCoord {
        HexCoord::new(self.q + other.q, self.r + other.r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Parses `"q,r"`, optionally wrapped in parentheses
impl FromStr for HexCoord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (q, r) = inner
            .split_once(',')
            .ok_or_else(|| format!("expected 'q,r', got '{}'", s))?;
        let q = q.trim().parse().map_err(|e| format!("bad q in '{}': {}", s, e))?;
        let r = r.trim().parse().map_err(|e| format!("bad r in '{}': {}", s, e))?;
        Ok(HexCoord::new(q, r))
    }
}

/// The six hex directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            HexDirection::East => HexCoord::new(1, 0),
            HexDirection::NorthEast => HexCoord::new(1, -1),
            HexDirection::NorthWest => HexCoord::new(0, -1),
            HexDirection::West => HexCoord::new(-1, 0),
            HexDirection::SouthWest => HexCoord::new(-1, 1),
            HexDirection::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}
