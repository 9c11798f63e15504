//! The read and write contracts every grid model implements.
//!
//! Both traits are object-safe so that step logic and initializers can
//! work against `&dyn ReadableGridModel<T>` / `&mut dyn
//! WritableGridModel<T>` without knowing the storage strategy.

use indexmap::IndexSet;
use tessera_core::{Coordinate, GridEntity};
use tessera_space::GridStructure;

use crate::cell::GridCell;
use crate::error::ModelError;

/// Read access to a grid model.
///
/// Every valid coordinate holds exactly one entity. Coordinates outside
/// [`structure`](Self::structure) are a contract violation for
/// [`entity`](Self::entity); use [`entity_checked`](Self::entity_checked)
/// when the coordinate has not been filtered yet.
pub trait ReadableGridModel<T: GridEntity> {
    /// Geometry of the grid.
    fn structure(&self) -> &GridStructure;

    /// The entity every cell holds unless set otherwise.
    fn default_entity(&self) -> &T;

    /// Entity at `coordinate`.
    ///
    /// # Panics
    ///
    /// Panics if `coordinate` is outside the grid.
    fn entity(&self, coordinate: Coordinate) -> &T;

    /// Whether only non-default cells are stored.
    fn is_sparse(&self) -> bool;

    /// Cells whose entity differs from the default.
    ///
    /// Lazy and finite. Call again to restart.
    fn non_default_cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_>;

    /// Number of cells whose entity differs from the default.
    fn non_default_count(&self) -> usize;

    /// Entity at `coordinate`, or `None` outside the grid.
    fn entity_checked(&self, coordinate: Coordinate) -> Option<&T> {
        if self.structure().is_coordinate_valid(coordinate) {
            Some(self.entity(coordinate))
        } else {
            None
        }
    }

    /// Whether `coordinate` holds the default entity.
    fn is_default_entity(&self, coordinate: Coordinate) -> bool {
        self.entity(coordinate) == self.default_entity()
    }

    /// Every cell in row-major order.
    fn cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_> {
        Box::new(
            self.structure()
                .coordinates()
                .map(move |c| GridCell::new(c, self.entity(c))),
        )
    }

    /// Number of cells whose entity satisfies `predicate`.
    ///
    /// Default cells are counted in bulk, so the predicate runs once per
    /// non-default cell plus once for the default entity.
    fn count_entities(&self, predicate: &dyn Fn(&T) -> bool) -> usize {
        let matching = self
            .non_default_cells()
            .filter(|cell| predicate(cell.entity))
            .count();
        if predicate(self.default_entity()) {
            matching + (self.structure().cell_count() - self.non_default_count())
        } else {
            matching
        }
    }

    /// Number of cells satisfying `predicate`.
    fn count_cells(&self, predicate: &dyn Fn(&GridCell<&T>) -> bool) -> usize {
        self.cells().filter(|cell| predicate(cell)).count()
    }

    /// Coordinates of all non-default cells.
    fn non_default_coordinates(&self) -> IndexSet<Coordinate> {
        self.non_default_cells().map(|cell| cell.coordinate).collect()
    }

    /// Owned copies of every cell whose entity satisfies `predicate`.
    ///
    /// Only non-default cells are visited when the default entity cannot
    /// match.
    fn find_cells(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<GridCell<T>> {
        let source = if predicate(self.default_entity()) {
            self.cells()
        } else {
            self.non_default_cells()
        };
        source
            .filter(|cell| predicate(cell.entity))
            .map(|cell| cell.cloned())
            .collect()
    }
}

/// Write access to a grid model.
pub trait WritableGridModel<T: GridEntity>: ReadableGridModel<T> {
    /// Store `entity` at `coordinate`.
    ///
    /// # Panics
    ///
    /// Panics if `coordinate` is outside the grid.
    fn set_entity(&mut self, coordinate: Coordinate, entity: T);

    /// Exchange the entities at `a` and `b`.
    ///
    /// The two slots change together: there is no observable state in
    /// which both hold the same entity. Swapping a cell with itself is a
    /// no-op.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the grid.
    fn swap_entities(&mut self, a: Coordinate, b: Coordinate);

    /// Reset every cell to the default entity.
    fn clear(&mut self);

    /// Reset `coordinate` to the default entity.
    fn set_entity_to_default(&mut self, coordinate: Coordinate) {
        let default = self.default_entity().clone();
        self.set_entity(coordinate, default);
    }

    /// Store `cell.entity` at `cell.coordinate`.
    fn set_cell(&mut self, cell: GridCell<T>) {
        self.set_entity(cell.coordinate, cell.entity);
    }

    /// Store `entity` in every cell.
    fn fill(&mut self, entity: T) {
        let coordinates = self.structure().coordinates();
        for c in coordinates {
            self.set_entity(c, entity.clone());
        }
    }

    /// Store `supplier(c)` in every cell `c`, row-major.
    fn fill_with(&mut self, supplier: &mut dyn FnMut(Coordinate) -> T) {
        let coordinates = self.structure().coordinates();
        for c in coordinates {
            let entity = supplier(c);
            self.set_entity(c, entity);
        }
    }

    /// Replace this model's contents with those of `other`.
    ///
    /// # Errors
    ///
    /// [`ModelError::StructureMismatch`] if the structures differ; the
    /// model is left untouched.
    fn copy_from(&mut self, other: &dyn ReadableGridModel<T>) -> Result<(), ModelError> {
        if self.structure() != other.structure() {
            return Err(ModelError::StructureMismatch {
                expected: *self.structure(),
                found: *other.structure(),
            });
        }
        self.clear();
        let source = if other.default_entity() == self.default_entity() {
            other.non_default_cells()
        } else {
            other.cells()
        };
        for cell in source {
            self.set_entity(cell.coordinate, cell.entity.clone());
        }
        Ok(())
    }
}
