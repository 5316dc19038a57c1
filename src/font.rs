//! Font metrics.
//!
//! The tree root owns the one font used by its whole subtree. Layout only
//! needs two numbers from it: the line height, and the uniform padding
//! derived from it (half the line height on every edge).

use crate::geometry::Insets;

/// Line height and derived padding of the tree's font.
///
/// When the host font query fails these stay zero: labels then measure
/// against the host default font and padding collapses to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    /// Line height in pixels.
    pub height: u32,
    /// Uniform padding amount, derived from the height.
    pub pad: u32,
}

impl FontMetrics {
    /// Metrics for a font of the given line height.
    #[inline]
    pub fn from_height(height: u32) -> Self {
        Self {
            height,
            pad: height / 2,
        }
    }

    /// The uniform insets this font pads widgets with.
    #[inline]
    pub fn padding(&self) -> Insets {
        Insets::uniform(self.pad)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_is_half_height() {
        let metrics = FontMetrics::from_height(18);
        assert_eq!(metrics.pad, 9);
        assert_eq!(metrics.padding(), Insets::uniform(9));
    }

    #[test]
    fn test_degraded_metrics_are_zero() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.height, 0);
        assert_eq!(metrics.padding(), Insets::ZERO);
    }
}
