//! Widget vocabulary
//!
//! Orientations, sizes, relative positions and the gravity values they map to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The screen orientations a widget view can belong to
///
/// If only one orientation is configured, it is used for both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// The other orientation
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Portrait => Orientation::Landscape,
            Orientation::Landscape => Orientation::Portrait,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

/// Size classes of the main button and its options
///
/// `Custom` means the client sized the view manually; it is never pushed to
/// the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FabSize {
    Mini,
    #[default]
    Normal,
    Auto,
    Custom,
}

/// Where a label sits relative to its owner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Left,
    Right,
}

impl LabelPosition {
    pub fn gravity(self) -> Gravity {
        match self {
            LabelPosition::Left => Gravity::START | Gravity::CENTER_VERTICAL,
            LabelPosition::Right => Gravity::END | Gravity::CENTER_VERTICAL,
        }
    }

    /// Sign applied to horizontal offsets (labels on the left move negative)
    pub fn direction(self) -> f32 {
        match self {
            LabelPosition::Left => -1.0,
            LabelPosition::Right => 1.0,
        }
    }
}

/// Where options stack relative to the main button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FabOptionPosition {
    #[default]
    Above,
    Below,
}

impl FabOptionPosition {
    pub fn gravity(self) -> Gravity {
        match self {
            FabOptionPosition::Above => Gravity::TOP | Gravity::CENTER_HORIZONTAL,
            FabOptionPosition::Below => Gravity::BOTTOM | Gravity::CENTER_HORIZONTAL,
        }
    }

    /// Sign applied to vertical offsets (stacking upward moves negative)
    pub fn direction(self) -> f32 {
        match self {
            FabOptionPosition::Above => -1.0,
            FabOptionPosition::Below => 1.0,
        }
    }
}

/// Anchor gravity flags, combinable with `|`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Gravity(u8);

impl Gravity {
    pub const NONE: Gravity = Gravity(0);
    pub const START: Gravity = Gravity(1 << 0);
    pub const END: Gravity = Gravity(1 << 1);
    pub const TOP: Gravity = Gravity(1 << 2);
    pub const BOTTOM: Gravity = Gravity(1 << 3);
    pub const CENTER_HORIZONTAL: Gravity = Gravity(1 << 4);
    pub const CENTER_VERTICAL: Gravity = Gravity(1 << 5);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Gravity) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Gravity {
    type Output = Gravity;

    fn bitor(self, rhs: Gravity) -> Gravity {
        Gravity(self.0 | rhs.0)
    }
}

/// View visibility as seen by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Visible,
    /// Hidden and excluded from layout
    Gone,
}

/// Float properties a declarative animation can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewProperty {
    TranslationX,
    TranslationY,
    ScaleX,
    ScaleY,
    Alpha,
}

impl ViewProperty {
    /// Value of the property on a freshly created view
    pub fn initial(self) -> f32 {
        match self {
            ViewProperty::TranslationX | ViewProperty::TranslationY => 0.0,
            ViewProperty::ScaleX | ViewProperty::ScaleY | ViewProperty::Alpha => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_combination() {
        let gravity = LabelPosition::Left.gravity();
        assert!(gravity.contains(Gravity::START));
        assert!(gravity.contains(Gravity::CENTER_VERTICAL));
        assert!(!gravity.contains(Gravity::END));
    }

    #[test]
    fn test_option_position_direction() {
        assert_eq!(FabOptionPosition::Above.direction(), -1.0);
        assert_eq!(FabOptionPosition::Below.direction(), 1.0);
        assert!(FabOptionPosition::Below.gravity().contains(Gravity::BOTTOM));
    }

    #[test]
    fn test_orientation_opposite() {
        assert_eq!(Orientation::Portrait.opposite(), Orientation::Landscape);
        assert_eq!(Orientation::Landscape.opposite(), Orientation::Portrait);
        assert_eq!(Orientation::default(), Orientation::Portrait);
    }
}
