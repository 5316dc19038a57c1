//! Core geometric primitives.
//!
//! Areas, positions, and padding are all unsigned: negative sizes or
//! screen positions are meaningless in this domain.

/// Sentinel for either axis of an area: "take this axis from whichever
/// ancestor first fixes it explicitly."
pub const MAX: u32 = u32::MAX;

/// An unsigned x/y pair, used both for sizes and for absolute positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub x: u32,
    pub y: u32,
}

impl Extent {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Extent {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Padding amounts around a node's content, one per edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// The same amount on all four edges.
    #[inline]
    pub const fn uniform(value: u32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    /// Total horizontal padding.
    #[inline]
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Total vertical padding.
    #[inline]
    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Horizontal placement of a child within a group's resolved width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Add insets around an area.
///
/// Axes holding the [`MAX`] sentinel stay `MAX`: unbounded plus anything
/// is still unbounded.
#[inline]
pub fn pad(area: Extent, insets: Insets) -> Extent {
    Extent {
        x: if area.x == MAX {
            MAX
        } else {
            area.x.saturating_add(insets.horizontal())
        },
        y: if area.y == MAX {
            MAX
        } else {
            area.y.saturating_add(insets.vertical())
        },
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_adds_both_edges() {
        let area = Extent::new(100, 40);
        let padded = pad(area, Insets::uniform(10));
        assert_eq!(padded, Extent::new(120, 60));
    }

    #[test]
    fn test_pad_keeps_max_unbounded() {
        let area = Extent::new(MAX, 40);
        let padded = pad(area, Insets::uniform(10));
        assert_eq!(padded.x, MAX);
        assert_eq!(padded.y, 60);
    }

    #[test]
    fn test_insets_totals() {
        let insets = Insets {
            left: 1,
            top: 2,
            right: 3,
            bottom: 4,
        };
        assert_eq!(insets.horizontal(), 4);
        assert_eq!(insets.vertical(), 6);
    }

    #[test]
    fn test_pad_saturates_near_max() {
        let area = Extent::new(MAX - 1, 0);
        let padded = pad(area, Insets::uniform(10));
        assert_eq!(padded.x, MAX);
    }
}
