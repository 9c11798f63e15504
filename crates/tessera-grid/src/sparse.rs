//! Sparse storage: only non-default cells are kept.

use indexmap::IndexMap;
use tessera_core::{Coordinate, GridEntity};
use tessera_space::GridStructure;

use crate::cell::GridCell;
use crate::model::{ReadableGridModel, WritableGridModel};

/// Map from coordinate to entity holding only non-default cells.
///
/// Writing the default entity removes the entry, so the map's length is
/// always the non-default count. Preferred when few cells are occupied.
#[derive(Clone, Debug)]
pub struct SparseGridModel<T> {
    structure: GridStructure,
    default: T,
    entries: IndexMap<Coordinate, T>,
}

impl<T: GridEntity> SparseGridModel<T> {
    /// An empty model: every cell reads as `default`.
    pub fn new(structure: GridStructure, default: T) -> Self {
        Self {
            structure,
            default,
            entries: IndexMap::new(),
        }
    }

    fn check(&self, coordinate: Coordinate) {
        assert!(
            self.structure.is_coordinate_valid(coordinate),
            "coordinate {coordinate} outside {} grid",
            self.structure.size()
        );
    }
}

impl<T: GridEntity> ReadableGridModel<T> for SparseGridModel<T> {
    fn structure(&self) -> &GridStructure {
        &self.structure
    }

    fn default_entity(&self) -> &T {
        &self.default
    }

    fn entity(&self, coordinate: Coordinate) -> &T {
        self.check(coordinate);
        self.entries.get(&coordinate).unwrap_or(&self.default)
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn non_default_cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_> {
        Box::new(self.entries.iter().map(|(&c, entity)| GridCell::new(c, entity)))
    }

    fn non_default_count(&self) -> usize {
        self.entries.len()
    }

    fn is_default_entity(&self, coordinate: Coordinate) -> bool {
        self.check(coordinate);
        !self.entries.contains_key(&coordinate)
    }
}

impl<T: GridEntity> WritableGridModel<T> for SparseGridModel<T> {
    fn set_entity(&mut self, coordinate: Coordinate, entity: T) {
        self.check(coordinate);
        if entity == self.default {
            self.entries.swap_remove(&coordinate);
        } else {
            self.entries.insert(coordinate, entity);
        }
    }

    fn swap_entities(&mut self, a: Coordinate, b: Coordinate) {
        self.check(a);
        self.check(b);
        if a == b {
            return;
        }
        let at_a = self.entries.swap_remove(&a);
        let at_b = self.entries.swap_remove(&b);
        if let Some(entity) = at_a {
            self.entries.insert(b, entity);
        }
        if let Some(entity) = at_b {
            self.entries.insert(a, entity);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
