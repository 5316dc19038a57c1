//! Platform backends.
//!
//! One [`crate::host::Host`] implementation per OS. Only the Win32 backend
//! exists today; the layout core itself is host-agnostic and fully
//! exercised through the test double on any platform.

#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub use win32::{Win32Host, WindowHandle};
