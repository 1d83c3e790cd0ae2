//! Collision layer masks.

use std::ops::{BitAnd, BitOr};

/// Bitmask of collision layers (32 layers, one bit each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Layer 0.
    pub const DEFAULT: LayerMask = LayerMask(1);

    /// Mask containing only `layer`. Layers above 31 yield an empty mask.
    pub const fn layer(layer: u32) -> Self {
        if layer < 32 {
            LayerMask(1 << layer)
        } else {
            LayerMask(0)
        }
    }

    /// True if any bit is shared.
    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = LayerMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 & rhs.0)
    }
}
