//! Ordered hex route
//!
//! A `Path` is never empty, starts at the agent's hex, and every consecutive
//! pair is grid-adjacent. A single-hex path means "already there".

use serde::{Deserialize, Serialize};

use crate::map::HexCoord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HexCoord>", into = "Vec<HexCoord>")]
pub struct Path(Vec<HexCoord>);

impl Path {
    /// Wrap a hex sequence, rejecting empty or disconnected ones
    pub fn new(hexes: Vec<HexCoord>) -> Option<Self> {
        if hexes.is_empty() {
            return None;
        }
        if !hexes.windows(2).all(|pair| pair[0].is_adjacent(&pair[1])) {
            return None;
        }
        Some(Self(hexes))
    }

    pub fn single(origin: HexCoord) -> Self {
        Self(vec![origin])
    }

    pub fn origin(&self) -> HexCoord {
        self.0[0]
    }

    pub fn destination(&self) -> HexCoord {
        self.0[self.0.len() - 1]
    }

    /// Number of hexes, origin included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hexes actually entered (origin excluded)
    pub fn steps(&self) -> usize {
        self.0.len() - 1
    }

    pub fn hexes(&self) -> &[HexCoord] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<HexCoord> {
        self.0.get(index).copied()
    }

    pub fn contains(&self, coord: &HexCoord) -> bool {
        self.0.contains(coord)
    }
}

impl TryFrom<Vec<HexCoord>> for Path {
    type Error = String;

    fn try_from(hexes: Vec<HexCoord>) -> Result<Self, Self::Error> {
        Path::new(hexes).ok_or_else(|| "path must be non-empty and adjacent".to_string())
    }
}

impl From<Path> for Vec<HexCoord> {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl AsRef<[HexCoord]> for Path {
    fn as_ref(&self) -> &[HexCoord] {
        &self.0
    }
}
