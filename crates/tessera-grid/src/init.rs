//! Initializers that populate a model before the first step.
//!
//! Each function works on any [`WritableGridModel`], including trait
//! objects. [`GridInitializer`] wraps them for composition:
//!
//! ```
//! use tessera_core::Coordinate;
//! use tessera_grid::init::{self, GridInitializer};
//! use tessera_grid::{DenseGridModel, ModelError, ReadableGridModel, WritableGridModel};
//! use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};
//!
//! let structure = GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 8, 8).unwrap();
//! let mut model = DenseGridModel::new(structure, 0u8);
//! let mut setup = (|m: &mut dyn WritableGridModel<u8>| -> Result<(), ModelError> {
//!     init::border(m, 1);
//!     Ok(())
//! })
//! .and_then(|m: &mut dyn WritableGridModel<u8>| -> Result<(), ModelError> {
//!     m.set_entity(Coordinate::new(4, 4), 2);
//!     Ok(())
//! });
//! setup.initialize(&mut model).unwrap();
//! assert_eq!(model.non_default_count(), 29);
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use tessera_core::{Coordinate, GridEntity};
use tessera_space::GridSize;

use crate::cell::GridCell;
use crate::error::{check_percent, ModelError};
use crate::model::WritableGridModel;
use crate::pattern::GridPattern;

/// A reusable, composable model setup step.
///
/// Implemented for every `FnMut(&mut dyn WritableGridModel<T>) ->
/// Result<(), ModelError>`.
pub trait GridInitializer<T: GridEntity> {
    /// Apply this setup to `model`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying initializer reports.
    fn initialize(&mut self, model: &mut dyn WritableGridModel<T>) -> Result<(), ModelError>;

    /// Run `self`, then `next`. Stops at the first error.
    fn and_then<I>(self, next: I) -> Chain<Self, I>
    where
        Self: Sized,
        I: GridInitializer<T>,
    {
        Chain { first: self, second: next }
    }
}

impl<T, F> GridInitializer<T> for F
where
    T: GridEntity,
    F: FnMut(&mut dyn WritableGridModel<T>) -> Result<(), ModelError>,
{
    fn initialize(&mut self, model: &mut dyn WritableGridModel<T>) -> Result<(), ModelError> {
        self(model)
    }
}

/// Two initializers run in sequence. Built by [`GridInitializer::and_then`].
#[derive(Clone, Debug)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<T, A, B> GridInitializer<T> for Chain<A, B>
where
    T: GridEntity,
    A: GridInitializer<T>,
    B: GridInitializer<T>,
{
    fn initialize(&mut self, model: &mut dyn WritableGridModel<T>) -> Result<(), ModelError> {
        self.first.initialize(model)?;
        self.second.initialize(model)
    }
}

/// Reset every cell to the default.
pub fn clear<T: GridEntity, M: WritableGridModel<T> + ?Sized>(model: &mut M) {
    model.clear();
}

/// Fill every cell with `entity`.
pub fn constant<T: GridEntity, M: WritableGridModel<T> + ?Sized>(model: &mut M, entity: T) {
    model.fill(entity);
}

/// Set the first and last row and column to `entity`.
pub fn border<T: GridEntity, M: WritableGridModel<T> + ?Sized>(model: &mut M, entity: T) {
    let max = model.structure().max_coordinate();
    let coordinates = model.structure().coordinates();
    for c in coordinates.filter(|c| c.x == 0 || c.y == 0 || c.x == max.x || c.y == max.y) {
        model.set_entity(c, entity.clone());
    }
}

/// `even` where `x + y` is even, `odd` elsewhere.
pub fn checkerboard<T: GridEntity, M: WritableGridModel<T> + ?Sized>(model: &mut M, even: T, odd: T) {
    model.fill_with(&mut |c| {
        if (c.x + c.y) % 2 == 0 {
            even.clone()
        } else {
            odd.clone()
        }
    });
}

/// Write every cell in `cells`.
///
/// # Errors
///
/// [`ModelError::CoordinateOutsideGrid`] if any cell lies outside the
/// grid. Nothing is written in that case.
pub fn from_cells<T, M>(model: &mut M, cells: impl IntoIterator<Item = GridCell<T>>) -> Result<(), ModelError>
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
{
    let cells: Vec<GridCell<T>> = cells.into_iter().collect();
    if let Some(bad) = cells
        .iter()
        .find(|cell| !model.structure().is_coordinate_valid(cell.coordinate))
    {
        return Err(ModelError::CoordinateOutsideGrid {
            coordinate: bad.coordinate,
        });
    }
    for cell in cells {
        model.set_cell(cell);
    }
    Ok(())
}

/// Set every cell to `mapper(coordinate)`.
pub fn map_from_coordinate<T, M>(model: &mut M, mut mapper: impl FnMut(Coordinate) -> T)
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
{
    model.fill_with(&mut mapper);
}

/// Set `mapper(coordinate)` on cells whose coordinate satisfies `condition`.
pub fn map_from_coordinate_if<T, M>(
    model: &mut M,
    mut mapper: impl FnMut(Coordinate) -> T,
    condition: impl Fn(Coordinate) -> bool,
) where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
{
    let coordinates = model.structure().coordinates();
    for c in coordinates.filter(|&c| condition(c)) {
        model.set_entity(c, mapper(c));
    }
}

/// Replace every entity with `mapper(current)`.
pub fn map_from_entity<T, M>(model: &mut M, mut mapper: impl FnMut(&T) -> T)
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
{
    let coordinates = model.structure().coordinates();
    for c in coordinates {
        let mapped = mapper(model.entity(c));
        model.set_entity(c, mapped);
    }
}

/// Place `pattern` with its origin at `anchor`.
///
/// Each cell is resolved through the structure's edge policy, so a
/// pattern straddling a wrapped seam continues on the other side.
/// Blocked and absorbed cells are skipped. Returns the number placed.
pub fn place_pattern<T, M>(model: &mut M, pattern: &GridPattern<T>, anchor: Coordinate) -> usize
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
{
    let structure = *model.structure();
    let mut placed = 0;
    for (offset, entity) in pattern.iter() {
        let result = structure.apply_edge_behavior(anchor.offset(offset));
        if result.is_resolvable() {
            model.set_entity(result.mapped, entity.clone());
            placed += 1;
        }
    }
    placed
}

fn random_coordinate<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Coordinate {
    Coordinate::new(
        rng.random_range(0..size.width()),
        rng.random_range(0..size.height()),
    )
}

/// Place exactly `count` entities from `supplier` on random default cells.
///
/// Each entity gets up to `max(100, area / 2)` random probes to find a
/// default cell. Returns `count`.
///
/// # Errors
///
/// [`ModelError::PlacementFailed`] when an entity exhausts its probes.
/// Entities placed before the failure stay in the model.
pub fn place_random_counted<T, M, R>(
    model: &mut M,
    count: usize,
    mut supplier: impl FnMut() -> T,
    rng: &mut R,
) -> Result<usize, ModelError>
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
    R: Rng + ?Sized,
{
    let size = model.structure().size();
    let max_attempts = (size.area() / 2).max(100);
    for placed in 0..count {
        let entity = supplier();
        let target = (0..max_attempts)
            .map(|_| random_coordinate(size, rng))
            .find(|&c| model.is_default_entity(c));
        match target {
            Some(c) => model.set_entity(c, entity),
            None => {
                log::warn!("random placement gave up after {placed} of {count} entities");
                return Err(ModelError::PlacementFailed {
                    placed,
                    requested: count,
                });
            }
        }
    }
    Ok(count)
}

/// Place `round(percent * area)` entities on random default cells.
///
/// # Errors
///
/// [`ModelError::InvalidPercent`] for `percent` outside `0.0..=1.0`,
/// otherwise as [`place_random_counted`].
pub fn place_random_percent<T, M, R>(
    model: &mut M,
    percent: f64,
    supplier: impl FnMut() -> T,
    rng: &mut R,
) -> Result<usize, ModelError>
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
    R: Rng + ?Sized,
{
    let percent = check_percent(percent)?;
    let count = (percent * model.structure().cell_count() as f64).round() as usize;
    place_random_counted(model, count, supplier, rng)
}

/// Place `count` entities on distinct default cells drawn from a shuffled
/// list. Never probes the same cell twice.
///
/// # Errors
///
/// [`ModelError::PlacementFailed`] if fewer than `count` default cells
/// exist; the free cells are filled before the error is returned.
pub fn place_shuffled_counted<T, M, R>(
    model: &mut M,
    count: usize,
    mut supplier: impl FnMut() -> T,
    rng: &mut R,
) -> Result<usize, ModelError>
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
    R: Rng + ?Sized,
{
    let mut free: Vec<Coordinate> = model
        .structure()
        .coordinates()
        .filter(|&c| model.is_default_entity(c))
        .collect();
    free.shuffle(rng);
    let placed = free.len().min(count);
    for &c in &free[..placed] {
        model.set_entity(c, supplier());
    }
    if placed < count {
        return Err(ModelError::PlacementFailed {
            placed,
            requested: count,
        });
    }
    Ok(placed)
}

/// Independently set each cell to `supplier()` with probability
/// `probability`. Returns the number of cells written.
///
/// # Errors
///
/// [`ModelError::InvalidPercent`] for `probability` outside `0.0..=1.0`.
pub fn place_with_probability<T, M, R>(
    model: &mut M,
    probability: f64,
    mut supplier: impl FnMut() -> T,
    rng: &mut R,
) -> Result<usize, ModelError>
where
    T: GridEntity,
    M: WritableGridModel<T> + ?Sized,
    R: Rng + ?Sized,
{
    let probability = check_percent(probability)?;
    let coordinates = model.structure().coordinates();
    let mut placed = 0;
    for c in coordinates {
        if rng.random_bool(probability) {
            model.set_entity(c, supplier());
            placed += 1;
        }
    }
    Ok(placed)
}
