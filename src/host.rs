//! Abstract windowing contract.
//!
//! Everything the layout tree needs from the native window system, kept
//! independent of any concrete binding. One implementation per platform
//! ([`crate::platform::win32`]), plus a recording double for tests.

use std::ops::{BitOr, BitOrAssign};

use thiserror::Error;

use crate::font::FontMetrics;
use crate::geometry::Extent;

/// Errors surfaced from the host boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("window creation failed: {0}")]
    WindowCreation(String),
}

/// Native window class a widget instantiates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetClass {
    Label,
    ProgressBar,
    Dialog,
}

/// Frame and control style bits carried by widget nodes.
///
/// Deliberately tiny: only the bits layout itself has to reason about.
/// The platform host maps them onto its own style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStyle(u32);

impl FrameStyle {
    /// A bare frame with no decorations requested.
    pub const BARE: Self = Self(0);
    /// Title bar / caption.
    pub const CAPTION: Self = Self(1 << 0);
    /// Smooth (non-segmented) progress fill.
    pub const SMOOTH_FILL: Self = Self(1 << 1);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether this is the exact bare frame request, with nothing else set.
    #[inline]
    pub fn is_bare(self) -> bool {
        self == Self::BARE
    }
}

impl BitOr for FrameStyle {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FrameStyle {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// What a node needs from the native window system.
///
/// All methods are called from the one thread that owns the handles and the
/// message pump, except [`request_close`](Host::request_close), which only
/// enqueues into the host message queue and is callable from anywhere.
pub trait Host {
    /// Native window handle. `Copy + Send` so a cross-thread close request
    /// can carry it without the host instance.
    type Handle: Copy + PartialEq + Send + std::fmt::Debug + 'static;
    /// Native font resource, owned by the tree root.
    type Font;

    /// Create a native window. `parent` is `None` only for the root; the
    /// host adds its own child styling when a parent is given.
    fn create_window(
        &mut self,
        class: WidgetClass,
        style: FrameStyle,
        title: &str,
        pos: Extent,
        size: Extent,
        parent: Option<Self::Handle>,
    ) -> Result<Self::Handle, Error>;

    /// Replace the displayed text of a handle.
    fn set_text(&mut self, handle: Self::Handle, text: &str);

    /// Direct a handle to render with the given font.
    fn apply_font(&mut self, handle: Self::Handle, font: &Self::Font);

    /// Move and resize a handle in one step.
    fn move_resize(&mut self, handle: Self::Handle, pos: Extent, size: Extent);

    /// Force a repaint of a handle.
    fn repaint(&mut self, handle: Self::Handle);

    /// Make a handle visible.
    fn show(&mut self, handle: Self::Handle);

    /// Measure the extents of `text` under `font`; `None` measures against
    /// the host default font.
    fn measure_text(&mut self, font: Option<&Self::Font>, text: &str) -> Extent;

    /// The host "message box" font plus its metrics, or `None` when the
    /// query fails. Callers then run with zero metrics and no custom font.
    fn message_font(&mut self) -> Option<(Self::Font, FontMetrics)>;

    /// Usable desktop area, or `None` when the query fails.
    fn work_area(&mut self) -> Option<Extent>;

    /// Full screen size; the fallback when the work area is unavailable.
    fn screen_size(&mut self) -> Extent;

    /// Outer window size wrapping a desired client area under `style`.
    fn outer_size(&mut self, client: Extent, style: FrameStyle) -> Extent;

    /// Swap in the real root window procedure. Called once, after the whole
    /// tree of handles exists.
    fn install_root_proc(&mut self, handle: Self::Handle);

    /// Post a close request into the host queue. Associated function so a
    /// cross-thread caller needs only the handle.
    fn request_close(handle: Self::Handle);

    /// Run the message pump until a quit signal; returns the exit code.
    fn run_loop(&mut self) -> i32;
}

// =========================================================================
// Test double
// =========================================================================


// =========================================================================
// Tests
// =========================================================================
