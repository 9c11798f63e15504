//! The trait every value stored in a grid model implements.

use std::fmt;

/// A value occupying one grid cell.
///
/// Entities are compared by value: a model's "non-default" cells are
/// exactly those whose entity is not equal to the model's default.
/// `descriptor_id` names the kind of entity independently of any state it
/// carries (a shark with 3 energy and a shark with 7 energy share one
/// descriptor), which is what random placement and diagnostics key on.
pub trait GridEntity: Clone + PartialEq + fmt::Debug {
    /// Stable identifier of this entity's kind.
    fn descriptor_id(&self) -> &'static str;
}

impl GridEntity for bool {
    fn descriptor_id(&self) -> &'static str {
        if *self {
            "true"
        } else {
            "false"
        }
    }
}

impl GridEntity for u8 {
    fn descriptor_id(&self) -> &'static str {
        "u8"
    }
}
