//! Runtime choice between dense and sparse storage.

use std::fmt;

use tessera_core::{Coordinate, GridEntity};
use tessera_space::GridStructure;

use crate::cell::GridCell;
use crate::dense::DenseGridModel;
use crate::model::{ReadableGridModel, WritableGridModel};
use crate::sparse::SparseGridModel;

/// Which storage strategy a [`GridStore`] uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// One slot per cell.
    #[default]
    Dense,
    /// Only non-default cells.
    Sparse,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
        })
    }
}

/// A grid model whose storage strategy is picked at runtime.
///
/// Both variants honour the same contract, so callers holding a
/// `GridStore` never branch on the kind.
#[derive(Clone, Debug)]
pub enum GridStore<T> {
    /// Dense storage.
    Dense(DenseGridModel<T>),
    /// Sparse storage.
    Sparse(SparseGridModel<T>),
}

macro_rules! dispatch {
    ($self:expr, $model:ident => $body:expr) => {
        match $self {
            GridStore::Dense($model) => $body,
            GridStore::Sparse($model) => $body,
        }
    };
}

impl<T: GridEntity> GridStore<T> {
    /// An all-default model of the requested kind.
    pub fn new(kind: StorageKind, structure: GridStructure, default: T) -> Self {
        match kind {
            StorageKind::Dense => Self::Dense(DenseGridModel::new(structure, default)),
            StorageKind::Sparse => Self::Sparse(SparseGridModel::new(structure, default)),
        }
    }

    /// The storage strategy in use.
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Dense(_) => StorageKind::Dense,
            Self::Sparse(_) => StorageKind::Sparse,
        }
    }
}

impl<T: GridEntity> ReadableGridModel<T> for GridStore<T> {
    fn structure(&self) -> &GridStructure {
        dispatch!(self, m => m.structure())
    }

    fn default_entity(&self) -> &T {
        dispatch!(self, m => m.default_entity())
    }

    fn entity(&self, coordinate: Coordinate) -> &T {
        dispatch!(self, m => m.entity(coordinate))
    }

    fn is_sparse(&self) -> bool {
        dispatch!(self, m => m.is_sparse())
    }

    fn non_default_cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_> {
        dispatch!(self, m => m.non_default_cells())
    }

    fn non_default_count(&self) -> usize {
        dispatch!(self, m => m.non_default_count())
    }

    fn is_default_entity(&self, coordinate: Coordinate) -> bool {
        dispatch!(self, m => m.is_default_entity(coordinate))
    }

    fn cells(&self) -> Box<dyn Iterator<Item = GridCell<&T>> + '_> {
        dispatch!(self, m => m.cells())
    }
}

impl<T: GridEntity> WritableGridModel<T> for GridStore<T> {
    fn set_entity(&mut self, coordinate: Coordinate, entity: T) {
        dispatch!(self, m => m.set_entity(coordinate, entity))
    }

    fn swap_entities(&mut self, a: Coordinate, b: Coordinate) {
        dispatch!(self, m => m.swap_entities(a, b))
    }

    fn clear(&mut self) {
        dispatch!(self, m => m.clear())
    }
}
