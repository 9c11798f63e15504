//! Edge (boundary) policies and their resolution.

use std::fmt;

use tessera_core::Coordinate;

/// One of the two grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Columns (width).
    X,
    /// Rows (height).
    Y,
}

impl Axis {
    /// `"width"` or `"height"`.
    pub const fn dimension_name(self) -> &'static str {
        match self {
            Self::X => "width",
            Self::Y => "height",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// How one axis of a grid treats coordinates beyond its bounds.
///
/// Policies are chosen per axis, so a grid can be a cylinder
/// (wrap-X/block-Y) or a mirrored strip (reflect-X/absorb-Y).
///
/// # Examples
///
/// ```
/// use tessera_space::{EdgeBehavior, EdgeBehaviorAction};
///
/// assert_eq!(EdgeBehavior::Wrap.resolve(-1, 20), (19, EdgeBehaviorAction::Wrapped));
/// assert_eq!(EdgeBehavior::Reflect.resolve(20, 20), (19, EdgeBehaviorAction::Reflected));
/// assert_eq!(EdgeBehavior::Block.resolve(-1, 20), (-1, EdgeBehaviorAction::Blocked));
/// assert_eq!(EdgeBehavior::Absorb.resolve(5, 20), (5, EdgeBehaviorAction::Valid));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds coordinates are forbidden.
    Block,
    /// Out-of-bounds coordinates wrap to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds coordinates are a sink: whatever moves there is
    /// consumed.
    Absorb,
    /// Out-of-bounds coordinates mirror back across the nearest bound.
    Reflect,
}

impl EdgeBehavior {
    /// All policies.
    pub const ALL: [EdgeBehavior; 4] = [
        EdgeBehavior::Block,
        EdgeBehavior::Wrap,
        EdgeBehavior::Absorb,
        EdgeBehavior::Reflect,
    ];

    /// Resolve one axis value against `[0, bound)`.
    ///
    /// Returns the mapped value and the action taken. Block and Absorb
    /// leave the value unchanged. Reflection folds with period `2 * bound`,
    /// so values arbitrarily far outside still land in range. A
    /// non-positive bound has no addressable values and always blocks.
    pub fn resolve(self, value: i32, bound: i32) -> (i32, EdgeBehaviorAction) {
        if value >= 0 && value < bound {
            return (value, EdgeBehaviorAction::Valid);
        }
        if bound <= 0 {
            return (value, EdgeBehaviorAction::Blocked);
        }
        match self {
            Self::Block => (value, EdgeBehaviorAction::Blocked),
            Self::Absorb => (value, EdgeBehaviorAction::Absorbed),
            Self::Wrap => (value.rem_euclid(bound), EdgeBehaviorAction::Wrapped),
            Self::Reflect => (reflect(value, bound), EdgeBehaviorAction::Reflected),
        }
    }
}

/// Mirror arithmetic: `-1 -> 0`, `-2 -> 1`, `n -> n-1`, `n+1 -> n-2`.
fn reflect(value: i32, bound: i32) -> i32 {
    let period = 2 * i64::from(bound);
    let folded = i64::from(value).rem_euclid(period);
    let mirrored = if folded >= i64::from(bound) {
        period - 1 - folded
    } else {
        folded
    };
    // `mirrored` lies in [0, bound).
    mirrored as i32
}

impl fmt::Display for EdgeBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Block => "block",
            Self::Wrap => "wrap",
            Self::Absorb => "absorb",
            Self::Reflect => "reflect",
        })
    }
}

/// The combined two-axis boundary policy of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridEdgeBehavior {
    /// Policy for columns outside `[0, width)`.
    pub x: EdgeBehavior,
    /// Policy for rows outside `[0, height)`.
    pub y: EdgeBehavior,
}

impl GridEdgeBehavior {
    /// Closed box.
    pub const BLOCK_XY: Self = Self::new(EdgeBehavior::Block, EdgeBehavior::Block);
    /// Horizontal cylinder.
    pub const BLOCK_X_WRAP_Y: Self = Self::new(EdgeBehavior::Block, EdgeBehavior::Wrap);
    /// Vertical cylinder.
    pub const WRAP_X_BLOCK_Y: Self = Self::new(EdgeBehavior::Wrap, EdgeBehavior::Block);
    /// Torus.
    pub const WRAP_XY: Self = Self::new(EdgeBehavior::Wrap, EdgeBehavior::Wrap);
    /// Sink on every side.
    pub const ABSORB_XY: Self = Self::new(EdgeBehavior::Absorb, EdgeBehavior::Absorb);
    /// Mirror on every side.
    pub const REFLECT_XY: Self = Self::new(EdgeBehavior::Reflect, EdgeBehavior::Reflect);

    /// The named presets.
    pub const PRESETS: [Self; 6] = [
        Self::BLOCK_XY,
        Self::BLOCK_X_WRAP_Y,
        Self::WRAP_X_BLOCK_Y,
        Self::WRAP_XY,
        Self::ABSORB_XY,
        Self::REFLECT_XY,
    ];

    /// Combine two per-axis policies.
    pub const fn new(x: EdgeBehavior, y: EdgeBehavior) -> Self {
        Self { x, y }
    }

    /// The same policy on both axes.
    pub const fn uniform(edge: EdgeBehavior) -> Self {
        Self { x: edge, y: edge }
    }

    /// Policy for `axis`.
    pub const fn for_axis(&self, axis: Axis) -> EdgeBehavior {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Whether both axes share a policy.
    pub fn is_uniform(&self) -> bool {
        self.x == self.y
    }

    /// Whether either axis wraps.
    pub fn has_wrap(&self) -> bool {
        self.x == EdgeBehavior::Wrap || self.y == EdgeBehavior::Wrap
    }
}

impl Default for GridEdgeBehavior {
    fn default() -> Self {
        Self::BLOCK_XY
    }
}

impl fmt::Display for GridEdgeBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_uniform() {
            write!(f, "{}-xy", self.x)
        } else {
            write!(f, "{}-x/{}-y", self.x, self.y)
        }
    }
}

/// What edge resolution did to a coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehaviorAction {
    /// Already inside the grid.
    Valid,
    /// Outside and forbidden; the coordinate is unchanged.
    Blocked,
    /// Wrapped to the opposite side.
    Wrapped,
    /// Outside and consumed at the edge; the coordinate is unchanged.
    Absorbed,
    /// Mirrored back inside.
    Reflected,
}

impl EdgeBehaviorAction {
    /// Whether the mapped coordinate is addressable.
    pub const fn is_resolvable(self) -> bool {
        matches!(self, Self::Valid | Self::Wrapped | Self::Reflected)
    }

    /// Rank used when combining axes; the higher rank wins.
    const fn severity(self) -> u8 {
        match self {
            Self::Valid => 0,
            Self::Wrapped => 1,
            Self::Reflected => 2,
            Self::Absorbed => 3,
            Self::Blocked => 4,
        }
    }

    /// The dominant of two per-axis actions.
    pub const fn combine(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for EdgeBehaviorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Blocked => "blocked",
            Self::Wrapped => "wrapped",
            Self::Absorbed => "absorbed",
            Self::Reflected => "reflected",
        })
    }
}

/// A coordinate before and after edge resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeBehaviorResult {
    /// The coordinate as asked.
    pub original: Coordinate,
    /// Where it resolves to. Equal to `original` unless wrapped or reflected.
    pub mapped: Coordinate,
    /// What resolution did.
    pub action: EdgeBehaviorAction,
}

impl EdgeBehaviorResult {
    /// Whether `mapped` is addressable.
    pub const fn is_resolvable(&self) -> bool {
        self.action.is_resolvable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_axis() {
        assert_eq!(EdgeBehavior::Wrap.resolve(-1, 20), (19, EdgeBehaviorAction::Wrapped));
        assert_eq!(EdgeBehavior::Wrap.resolve(20, 20), (0, EdgeBehaviorAction::Wrapped));
        assert_eq!(EdgeBehavior::Wrap.resolve(-21, 20), (19, EdgeBehaviorAction::Wrapped));
    }

    #[test]
    fn reflect_axis() {
        assert_eq!(EdgeBehavior::Reflect.resolve(-1, 20), (0, EdgeBehaviorAction::Reflected));
        assert_eq!(EdgeBehavior::Reflect.resolve(-2, 20), (1, EdgeBehaviorAction::Reflected));
        assert_eq!(EdgeBehavior::Reflect.resolve(-3, 20), (2, EdgeBehaviorAction::Reflected));
        assert_eq!(EdgeBehavior::Reflect.resolve(20, 20), (19, EdgeBehaviorAction::Reflected));
        assert_eq!(EdgeBehavior::Reflect.resolve(21, 20), (18, EdgeBehaviorAction::Reflected));
    }

    #[test]
    fn reflect_extremes_stay_in_range() {
        for v in [i32::MIN, i32::MIN + 1, -40, -39, 39, 40, i32::MAX] {
            let (m, a) = EdgeBehavior::Reflect.resolve(v, 20);
            assert!((0..20).contains(&m), "{v} -> {m}");
            assert_eq!(a, EdgeBehaviorAction::Reflected);
        }
    }

    #[test]
    fn combine_prefers_terminal_actions() {
        use EdgeBehaviorAction::*;
        assert_eq!(Valid.combine(Valid), Valid);
        assert_eq!(Wrapped.combine(Valid), Wrapped);
        assert_eq!(Wrapped.combine(Reflected), Reflected);
        assert_eq!(Reflected.combine(Absorbed), Absorbed);
        assert_eq!(Absorbed.combine(Blocked), Blocked);
        assert_eq!(Blocked.combine(Wrapped), Blocked);
    }

    #[test]
    fn display() {
        assert_eq!(GridEdgeBehavior::WRAP_XY.to_string(), "wrap-xy");
        assert_eq!(GridEdgeBehavior::BLOCK_X_WRAP_Y.to_string(), "block-x/wrap-y");
    }

    proptest! {
        #[test]
        fn in_bounds_is_identity(v in 0i32..64, bound in 8i32..64) {
            prop_assume!(v < bound);
            for edge in EdgeBehavior::ALL {
                prop_assert_eq!(edge.resolve(v, bound), (v, EdgeBehaviorAction::Valid));
            }
        }

        #[test]
        fn block_and_absorb_never_move(v in any::<i32>(), bound in 8i32..64) {
            prop_assert_eq!(EdgeBehavior::Block.resolve(v, bound).0, v);
            prop_assert_eq!(EdgeBehavior::Absorb.resolve(v, bound).0, v);
        }

        #[test]
        fn wrap_and_reflect_always_land_inside(v in any::<i32>(), bound in 8i32..16384) {
            let (w, _) = EdgeBehavior::Wrap.resolve(v, bound);
            let (r, _) = EdgeBehavior::Reflect.resolve(v, bound);
            prop_assert!((0..bound).contains(&w));
            prop_assert!((0..bound).contains(&r));
        }
    }
}
