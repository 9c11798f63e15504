//! Dense and sparse models must be observationally identical.
//!
//! Every test runs the same script against both storage kinds through the
//! trait objects, then compares what a caller can see.

use proptest::prelude::*;
use tessera_core::Coordinate;
use tessera_grid::{
    DenseGridModel, GridCell, GridStore, ModelError, ReadableGridModel, SparseGridModel, StorageKind,
    WritableGridModel,
};
use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};

fn structure() -> GridStructure {
    GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 12, 9).unwrap()
}

fn both() -> [Box<dyn WritableGridModel<u8>>; 2] {
    [
        Box::new(DenseGridModel::new(structure(), 0)),
        Box::new(SparseGridModel::new(structure(), 0)),
    ]
}

fn snapshot(model: &dyn ReadableGridModel<u8>) -> Vec<u8> {
    model.cells().map(|cell| *cell.entity).collect()
}

// ── Contract ────────────────────────────────────────────────────

#[test]
fn every_cell_starts_default() {
    for model in both() {
        assert_eq!(model.non_default_count(), 0);
        assert_eq!(model.non_default_cells().count(), 0);
        assert_eq!(model.cells().count(), 108);
        assert!(model.structure().coordinates().all(|c| model.is_default_entity(c)));
    }
}

#[test]
fn swap_never_duplicates() {
    for mut model in both() {
        let (a, b) = (Coordinate::new(2, 3), Coordinate::new(5, 5));
        model.set_entity(a, 7);
        model.swap_entities(a, b);
        assert_eq!(model.count_entities(&|e| *e == 7), 1);
        assert_eq!(model.entity(b), &7);
        assert!(model.is_default_entity(a));
    }
}

#[test]
fn non_default_cells_restart() {
    for mut model in both() {
        model.set_entity(Coordinate::new(1, 1), 3);
        model.set_entity(Coordinate::new(4, 2), 4);
        let first: Vec<GridCell<u8>> = model.non_default_cells().map(|c| c.cloned()).collect();
        let second: Vec<GridCell<u8>> = model.non_default_cells().map(|c| c.cloned()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}

#[test]
fn find_and_count_cells() {
    for mut model in both() {
        model.set_entity(Coordinate::new(0, 0), 1);
        model.set_entity(Coordinate::new(11, 8), 2);
        let found = model.find_cells(&|e| *e > 0);
        assert_eq!(found.len(), 2);
        assert_eq!(model.find_cells(&|e| *e == 0).len(), 106);
        assert_eq!(model.count_cells(&|cell| cell.coordinate.x == 0), 9);
        assert_eq!(model.count_entities(&|e| *e == 0), 106);
        assert_eq!(
            model.non_default_coordinates().into_iter().collect::<Vec<_>>().len(),
            2
        );
    }
}

#[test]
fn entity_checked_rejects_outside() {
    for model in both() {
        assert_eq!(model.entity_checked(Coordinate::new(0, 0)), Some(&0));
        assert_eq!(model.entity_checked(Coordinate::new(12, 0)), None);
        assert_eq!(model.entity_checked(Coordinate::ILLEGAL), None);
    }
}

#[test]
fn copy_between_storage_kinds() {
    let mut dense = DenseGridModel::new(structure(), 0u8);
    dense.set_entity(Coordinate::new(3, 3), 9);
    let mut sparse = SparseGridModel::new(structure(), 0u8);
    sparse.set_entity(Coordinate::new(0, 0), 1);
    sparse.copy_from(&dense).unwrap();
    assert_eq!(sparse.non_default_count(), 1);
    assert_eq!(sparse.entity(Coordinate::new(3, 3)), &9);

    let other = GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 8, 8).unwrap();
    let mut small = DenseGridModel::new(other, 0u8);
    assert!(matches!(
        small.copy_from(&dense),
        Err(ModelError::StructureMismatch { .. })
    ));
}

#[test]
fn copy_with_different_default_copies_everything() {
    let mut source = DenseGridModel::new(structure(), 5u8);
    source.set_entity(Coordinate::new(1, 0), 0);
    let mut target = SparseGridModel::new(structure(), 0u8);
    target.copy_from(&source).unwrap();
    assert_eq!(target.non_default_count(), 107);
    assert!(target.is_default_entity(Coordinate::new(1, 0)));
}

#[test]
fn store_delegates() {
    let mut store = GridStore::new(StorageKind::Sparse, structure(), 0u8);
    store.fill(1);
    assert_eq!(store.non_default_count(), 108);
    store.clear();
    assert_eq!(store.non_default_count(), 0);
}

// ── Equivalence ─────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Op {
    Set(i32, i32, u8),
    Reset(i32, i32),
    Swap(i32, i32, i32, i32),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..12i32, 0..9i32, 0..4u8).prop_map(|(x, y, v)| Op::Set(x, y, v)),
        2 => (0..12i32, 0..9i32).prop_map(|(x, y)| Op::Reset(x, y)),
        4 => (0..12i32, 0..9i32, 0..12i32, 0..9i32).prop_map(|(a, b, c, d)| Op::Swap(a, b, c, d)),
        1 => Just(Op::Clear),
    ]
}

fn apply(model: &mut dyn WritableGridModel<u8>, op: &Op) {
    match *op {
        Op::Set(x, y, v) => model.set_entity(Coordinate::new(x, y), v),
        Op::Reset(x, y) => model.set_entity_to_default(Coordinate::new(x, y)),
        Op::Swap(a, b, c, d) => model.swap_entities(Coordinate::new(a, b), Coordinate::new(c, d)),
        Op::Clear => model.clear(),
    }
}

proptest! {
    #[test]
    fn dense_and_sparse_agree(ops in prop::collection::vec(op(), 0..60)) {
        let [mut dense, mut sparse] = both();
        for op in &ops {
            apply(dense.as_mut(), op);
            apply(sparse.as_mut(), op);
        }
        prop_assert_eq!(snapshot(dense.as_ref()), snapshot(sparse.as_ref()));
        prop_assert_eq!(dense.non_default_count(), sparse.non_default_count());
        let actual = snapshot(dense.as_ref()).iter().filter(|&&e| e != 0).count();
        prop_assert_eq!(dense.non_default_count(), actual);
        let mut d = dense.non_default_coordinates().into_iter().collect::<Vec<_>>();
        let mut s = sparse.non_default_coordinates().into_iter().collect::<Vec<_>>();
        d.sort();
        s.sort();
        prop_assert_eq!(d, s);
    }
}
