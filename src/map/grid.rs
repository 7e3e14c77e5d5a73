//! Hex map with terrain cells, points of interest and a preview highlight
//!
//! Cells are laid out as a `width x height` rectangle in odd-q offset space
//! and addressed with axial coordinates.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::map::hex::HexCoord;
use crate::map::terrain::{PointOfInterest, Terrain};

/// A single cell on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub coord: HexCoord,
    pub terrain: Terrain,
    pub point_of_interest: Option<PointOfInterest>,
    /// Preview-only visual flag; never read by movement logic
    #[serde(skip)]
    pub highlighted: bool,
}

impl TerrainCell {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            point_of_interest: None,
            highlighted: false,
        }
    }

    pub fn is_settlement(&self) -> bool {
        self.point_of_interest
            .as_ref()
            .is_some_and(PointOfInterest::is_settlement)
    }
}

/// The full hex map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexMap {
    cells: AHashMap<HexCoord, TerrainCell>,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    highlighted: Vec<HexCoord>,
}

impl HexMap {
    /// Create a new map filled with plains
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Terrain::Plains)
    }

    /// Number of cells in a `width` x `height` rectangle, computed in `usize`
    pub fn area(width: u32, height: u32) -> usize {
        width as usize * height as usize
    }

    /// Create a new map filled with one terrain
    pub fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        let mut cells = AHashMap::with_capacity(Self::area(width, height));

        for col in 0..width as i32 {
            for row in 0..height as i32 {
                let coord = HexCoord::from_offset(col, row);
                cells.insert(coord, TerrainCell::new(coord, terrain));
            }
        }

        Self {
            cells,
            width,
            height,
            highlighted: Vec::new(),
        }
    }

    /// Get the cell at the given coordinate
    pub fn get_cell(&self, coord: HexCoord) -> Option<&TerrainCell> {
        self.cells.get(&coord)
    }

    fn get_cell_mut(&mut self, coord: HexCoord) -> Option<&mut TerrainCell> {
        self.cells.get_mut(&coord)
    }

    pub fn terrain_at(&self, coord: HexCoord) -> Option<Terrain> {
        self.get_cell(coord).map(|cell| cell.terrain)
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// On-map neighbors of a hex (up to 6)
    pub fn neighbors(&self, coord: HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.cells.contains_key(n))
            .collect()
    }

    /// On-map hexes at exactly `radius` steps from `center`
    pub fn ring(&self, center: HexCoord, radius: u32) -> Vec<HexCoord> {
        center
            .ring(radius)
            .into_iter()
            .filter(|h| self.cells.contains_key(h))
            .collect()
    }

    /// Geometric centre of the grid, converted from offset to axial
    pub fn center(&self) -> HexCoord {
        HexCoord::from_offset(self.width as i32 / 2, self.height as i32 / 2)
    }

    /// All coordinates in a stable order (sorted by q, then r)
    pub fn coords(&self) -> Vec<HexCoord> {
        let mut coords: Vec<HexCoord> = self.cells.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn cells(&self) -> impl Iterator<Item = &TerrainCell> {
        self.cells.values()
    }

    /// Settlement hexes in a stable order
    pub fn settlements(&self) -> Vec<HexCoord> {
        let mut found: Vec<HexCoord> = self
            .cells
            .values()
            .filter(|cell| cell.is_settlement())
            .map(|cell| cell.coord)
            .collect();
        found.sort_unstable();
        found
    }

    /// Set terrain at a coordinate
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Terrain) {
        if let Some(cell) = self.get_cell_mut(coord) {
            cell.terrain = terrain;
        }
    }

    /// Tag a coordinate with a point of interest
    pub fn set_point_of_interest(&mut self, coord: HexCoord, poi: PointOfInterest) {
        if let Some(cell) = self.get_cell_mut(coord) {
            cell.point_of_interest = Some(poi);
        }
    }

    /// Replace the current highlight with exactly these hexes
    pub fn highlight_path(&mut self, hexes: &[HexCoord]) {
        self.clear_highlight();
        for &coord in hexes {
            if let Some(cell) = self.get_cell_mut(coord) {
                cell.highlighted = true;
                self.highlighted.push(coord);
            }
        }
    }

    pub fn clear_highlight(&mut self) {
        for coord in std::mem::take(&mut self.highlighted) {
            if let Some(cell) = self.get_cell_mut(coord) {
                cell.highlighted = false;
            }
        }
    }

    /// Currently highlighted hexes, in path order
    pub fn highlighted(&self) -> &[HexCoord] {
        &self.highlighted
    }
}
