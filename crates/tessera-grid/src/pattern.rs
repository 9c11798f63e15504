//! Offset-keyed entity patterns placed relative to an anchor cell.

use indexmap::IndexMap;
use tessera_core::{GridEntity, Offset};

/// A set of entities keyed by offset from an anchor.
///
/// Equality ignores insertion order. Patterns are plain values: every
/// transform returns a new pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPattern<T> {
    cells: IndexMap<Offset, T>,
}

impl<T> Default for GridPattern<T> {
    fn default() -> Self {
        Self {
            cells: IndexMap::new(),
        }
    }
}

impl<T: GridEntity> GridPattern<T> {
    /// An empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// `entity` at every offset in `offsets`.
    pub fn from_offsets(entity: T, offsets: impl IntoIterator<Item = Offset>) -> Self {
        offsets.into_iter().map(|o| (o, entity.clone())).collect()
    }

    /// A single entity at `offset`.
    pub fn singleton(offset: Offset, entity: T) -> Self {
        std::iter::once((offset, entity)).collect()
    }

    /// `length` cells along +x starting at the anchor.
    pub fn horizontal_line(entity: T, length: i32) -> Self {
        Self::from_offsets(entity, (0..length).map(|x| Offset::new(x, 0)))
    }

    /// `length` cells along +y starting at the anchor.
    pub fn vertical_line(entity: T, length: i32) -> Self {
        Self::from_offsets(entity, (0..length).map(|y| Offset::new(0, y)))
    }

    /// The outline of a `width` x `height` rectangle.
    pub fn rectangle(stroke: T, width: i32, height: i32) -> Self {
        let outline = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| y == 0 || y == height - 1 || x == 0 || x == width - 1)
            .map(|(x, y)| Offset::new(x, y));
        Self::from_offsets(stroke, outline)
    }

    /// A midpoint-algorithm circle outline, top-left at the anchor.
    ///
    /// Radius 0 is a single cell; negative radii are empty.
    pub fn circle(stroke: T, radius: i32) -> Self {
        let mut offsets: Vec<Offset> = Vec::new();
        let (mut x, mut y, mut err) = (radius, 0, 0);
        while x >= y {
            for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
                offsets.push(Offset::new(radius + dx, radius + dy));
            }
            y += 1;
            if err <= 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err -= 2 * x + 1;
            }
        }
        Self::from_offsets(stroke, offsets).normalized()
    }

    /// Insert `entity` at `offset`, returning the entity it replaced.
    pub fn insert(&mut self, offset: Offset, entity: T) -> Option<T> {
        self.cells.insert(offset, entity)
    }

    /// Entity at `offset`.
    pub fn get(&self, offset: Offset) -> Option<&T> {
        self.cells.get(&offset)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the pattern has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Offset, &T)> {
        self.cells.iter().map(|(&o, e)| (o, e))
    }

    /// Horizontal extent in cells; 0 when empty.
    pub fn width(&self) -> i32 {
        self.extent(|o| o.dx)
    }

    /// Vertical extent in cells; 0 when empty.
    pub fn height(&self) -> i32 {
        self.extent(|o| o.dy)
    }

    /// Every offset moved by `by`.
    pub fn shifted(&self, by: Offset) -> Self {
        self.remap(|o| o + by)
    }

    /// Whether the smallest dx and dy are both 0.
    pub fn is_top_left_at_origin(&self) -> bool {
        self.min_offset() == Offset::ZERO
    }

    /// Shifted so that the smallest dx and dy are 0.
    pub fn normalized(&self) -> Self {
        self.shifted(-self.min_offset())
    }

    /// Mirrored left to right within the same bounding box.
    pub fn flipped_x(&self) -> Self {
        let mid = self.span(|o| o.dx).map_or(0, |(lo, hi)| lo + hi);
        self.remap(|o| Offset::new(mid - o.dx, o.dy))
    }

    /// Mirrored top to bottom within the same bounding box.
    pub fn flipped_y(&self) -> Self {
        let mid = self.span(|o| o.dy).map_or(0, |(lo, hi)| lo + hi);
        self.remap(|o| Offset::new(o.dx, mid - o.dy))
    }

    /// Union with `other`; `other` wins where both have a cell.
    pub fn combined(&self, other: &Self) -> Self {
        let mut cells = self.cells.clone();
        cells.extend(other.cells.iter().map(|(&o, e)| (o, e.clone())));
        Self { cells }
    }

    /// Same offsets, entities transformed by `f`.
    pub fn map_entities<U: GridEntity>(&self, mut f: impl FnMut(&T) -> U) -> GridPattern<U> {
        self.cells.iter().map(|(&o, e)| (o, f(e))).collect()
    }

    fn remap(&self, f: impl Fn(Offset) -> Offset) -> Self {
        self.cells.iter().map(|(&o, e)| (f(o), e.clone())).collect()
    }

    /// Smallest and largest value of `axis` over all offsets.
    fn span(&self, axis: impl Fn(Offset) -> i32) -> Option<(i32, i32)> {
        self.cells.keys().map(|&o| axis(o)).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    fn min_offset(&self) -> Offset {
        let lo = |span: Option<(i32, i32)>| span.map_or(0, |(lo, _)| lo);
        Offset::new(lo(self.span(|o| o.dx)), lo(self.span(|o| o.dy)))
    }

    fn extent(&self, axis: impl Fn(Offset) -> i32) -> i32 {
        self.span(axis).map_or(0, |(lo, hi)| hi - lo + 1)
    }
}

impl<T> FromIterator<(Offset, T)> for GridPattern<T> {
    fn from_iter<I: IntoIterator<Item = (Offset, T)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
