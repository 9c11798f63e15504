//! A coordinate paired with the entity stored there.

use tessera_core::Coordinate;

/// One cell of a grid model.
///
/// Read views hand out `GridCell<&T>`; [`cloned`](GridCell::cloned) turns
/// one into an owned `GridCell<T>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCell<E> {
    /// Where the entity lives.
    pub coordinate: Coordinate,
    /// The entity.
    pub entity: E,
}

impl<E> GridCell<E> {
    /// Pair `entity` with `coordinate`.
    pub const fn new(coordinate: Coordinate, entity: E) -> Self {
        Self { coordinate, entity }
    }

    /// Transform the entity, keeping the coordinate.
    pub fn map<U>(self, f: impl FnOnce(E) -> U) -> GridCell<U> {
        GridCell {
            coordinate: self.coordinate,
            entity: f(self.entity),
        }
    }
}

impl<T: Clone> GridCell<&T> {
    /// Owned copy of a borrowed cell.
    pub fn cloned(&self) -> GridCell<T> {
        GridCell::new(self.coordinate, self.entity.clone())
    }
}

impl<E> From<(Coordinate, E)> for GridCell<E> {
    fn from((coordinate, entity): (Coordinate, E)) -> Self {
        Self::new(coordinate, entity)
    }
}
