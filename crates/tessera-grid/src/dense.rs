//! Dense storage: one slot per cell.

use std::fmt;

use tessera_core::{Coordinate, GridEntity};
use tessera_space::GridStructure;

use crate::cell::GridCell;
use crate::model::{ReadableGridModel, WritableGridModel};

/// Row-major `Vec` of entities, one per cell.
///
/// Reads, writes and swaps are O(1). The number of non-default cells is
/// maintained incrementally, so [`non_default_count`] is O(1) as well.
/// Preferred when a large share of cells is non-default.
///
/// [`non_default_count`]: ReadableGridModel::non_default_count
#[derive(Clone)]
pub struct DenseGridModel<T> {
    structure: GridStructure,
    default: T,
    cells: Vec<T>,
    non_default: usize,
}

impl<T: GridEntity> DenseGridModel<T> {
    /// A model with every cell set to `default`.
    pub fn new(structure: GridStructure, default: T) -> Self {
        let cells = vec![default.clone(); structure.cell_count()];
        Self {
            structure,
            default,
            cells,
            non_default: 0,
        }
    }

    /// All entities in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    fn index(&self, coordinate: Coordinate) -> usize {
        match self.structure.index_of(coordinate) {
            Some(index) => index,
            None => panic!(
                "coordinate {coordinate} outside {} grid",
                self.structure.size()
            ),
        }
    }
}

impl<T: GridEntity> ReadableGridModel<T> for DenseGridModel<T> {
    fn structure(&self) -> &GridStructure {
        &self.structure
    }

    fn default_entity(&self) -> &T {
        &self.default
    }

    fn entity(&self, coordinate: Coordinate) -> &T {
        &self.cells[self.index(coordinate)]
    }

    fn is_sparse(&self) -> bool {
        false
    }

    fn non_default_cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_> {
        Box::new(
            self.structure
                .coordinates()
                .zip(&self.cells)
                .filter(move |(_, entity)| **entity != self.default)
                .map(|(c, entity)| GridCell::new(c, entity)),
        )
    }

    fn non_default_count(&self) -> usize {
        self.non_default
    }

    fn cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_> {
        Box::new(
            self.structure
                .coordinates()
                .zip(&self.cells)
                .map(|(c, entity)| GridCell::new(c, entity)),
        )
    }
}

impl<T: GridEntity> WritableGridModel<T> for DenseGridModel<T> {
    fn set_entity(&mut self, coordinate: Coordinate, entity: T) {
        let index = self.index(coordinate);
        let was_default = self.cells[index] == self.default;
        let is_default = entity == self.default;
        self.cells[index] = entity;
        match (was_default, is_default) {
            (true, false) => self.non_default += 1,
            (false, true) => self.non_default -= 1,
            _ => {}
        }
    }

    fn swap_entities(&mut self, a: Coordinate, b: Coordinate) {
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);
    }

    fn clear(&mut self) {
        if self.non_default == 0 {
            return;
        }
        self.cells.fill(self.default.clone());
        self.non_default = 0;
    }
}

impl<T: fmt::Debug> fmt::Debug for DenseGridModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseGridModel")
            .field("structure", &self.structure)
            .field("default", &self.default)
            .field("non_default", &self.non_default)
            .finish()
    }
}
