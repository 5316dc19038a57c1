//! A thin, pixel-agnostic layout layer over the native window API.
//!
//! The crate sizes and positions a small tree of native widgets from their
//! content alone: labels measure their text, progress bars stretch to fill,
//! vertical groups stack and align their children, and the single
//! top-level window wraps the result in frame decoration and centers it on
//! the work area. Every geometric quantity is computed on demand and
//! memoized; edits invalidate exactly the caches they can affect.
//!
//! The layout core never touches the OS. Everything native goes through
//! the [`host::Host`] trait, implemented for Win32 in [`platform`] and by
//! a recording double in the tests.
//!
//! ```ignore
//! let mut tree = veneer::Tree::new(veneer::Win32Host::new()?);
//! let top = tree.top();
//! let group = tree.vertical_group(top, veneer::HAlign::Center);
//! let status = tree.label(group, "Downloading...");
//! tree.progress_bar(group);
//!
//! let remote = tree.remote();
//! std::thread::spawn(move || {
//!     remote.wait_ready();
//!     // ... work ...
//!     remote.close();
//! });
//! tree.run("Updater")?;
//! ```

pub mod cache;
pub mod font;
pub mod geometry;
pub mod host;
pub mod platform;
pub mod top;
pub mod tree;
pub mod widgets;

pub use cache::Cached;
pub use font::FontMetrics;
pub use geometry::{Extent, HAlign, Insets, MAX};
pub use host::{Error, FrameStyle, Host, WidgetClass};
pub use top::Remote;
pub use tree::{NodeId, Tree};

#[cfg(windows)]
pub use platform::{Win32Host, WindowHandle};
