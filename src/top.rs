//! The top-level window: root resolution, frame decoration, and the
//! one-shot create-and-pump lifecycle.
//!
//! The host API requires window creation and its message pump to share a
//! thread, so [`Tree::run`] combines both. Other threads interact with the
//! running window only through [`Remote`]: wait for creation to complete,
//! then post a close request into the host queue.

use std::sync::{Arc, Condvar, Mutex};

use crate::geometry::{Extent, MAX};
use crate::host::{Error, FrameStyle, Host};
use crate::tree::{NodeId, Tree};

impl<H: Host> Tree<H> {
    /// The root's content area: its single child's padded area.
    ///
    /// # Panics
    ///
    /// If the root has no child, or the child is unbounded on an axis no
    /// descendant fixes — the window cannot size itself to that.
    pub(crate) fn top_area(&mut self, id: NodeId) -> Extent {
        let child = *self.nodes[id.0]
            .children
            .first()
            .expect("top-level window has no child to size against");
        let area = self.padded_area(child);
        assert!(
            area.x != MAX && area.y != MAX,
            "unbounded child of the top-level window; give some descendant an explicit size"
        );
        area
    }

    /// Content area wrapped in the host's frame decoration. Identity for
    /// everything but the root.
    pub(crate) fn decorated_area(&mut self, id: NodeId) -> Extent {
        let area = self.area(id);
        let style = self.nodes[id.0].style;
        self.host.outer_size(area, style)
    }

    /// Center the decorated window in the host work area. When that query
    /// fails, fall back to the full screen metrics.
    pub(crate) fn top_position(&mut self, id: NodeId) -> Extent {
        let area = self.decorated_area(id);
        let bounds = self.host.work_area().unwrap_or_else(|| {
            tracing::warn!("work area query failed; centering on the full screen");
            self.host.screen_size()
        });
        Extent::new(
            (bounds.x / 2).saturating_sub(area.x / 2),
            (bounds.y / 2).saturating_sub(area.y / 2),
        )
    }

    /// Create the native window tree and run the message pump to
    /// completion. One-shot and blocking; returns the pump's exit code.
    ///
    /// Must run on the thread that is to own every native handle.
    ///
    /// # Panics
    ///
    /// If the tree has no top-level window.
    pub fn run(&mut self, title: &str) -> Result<i32, Error> {
        let root = self.root.expect("tree has no top-level window to run");

        // Window creation gives a bare frame a caption anyway, but the
        // outer-size computation does not know that; patch the style so
        // decoration and creation agree on the frame.
        if self.nodes[root.0].style.is_bare() {
            self.nodes[root.0].style |= FrameStyle::CAPTION;
        }
        self.nodes[root.0].text = title.to_owned();

        tracing::debug!(title, "creating window tree");
        self.instantiate(root, None)?;
        self.propagate_font(root);

        let handle = self.nodes[root.0]
            .handle
            .expect("instantiation left the root without a handle");
        self.host.show(handle);
        self.host.repaint(handle);
        // Swapped in only now: before the tree exists, the default
        // procedure must handle every message.
        self.host.install_root_proc(handle);
        self.ready.signal(handle);

        Ok(self.host.run_loop())
    }

    /// Post a close request to the root window. No-op before creation.
    pub fn close(&mut self) {
        if let Some(handle) = self.root.and_then(|root| self.nodes[root.0].handle) {
            H::request_close(handle);
        }
    }

    /// A cheap cross-thread handle onto the (future) running window.
    pub fn remote(&self) -> Remote<H> {
        Remote {
            ready: Arc::clone(&self.ready),
        }
    }
}

// =========================================================================
// Cross-thread handle
// =========================================================================

/// Creation-complete signal: a slot for the root handle plus a condvar.
pub(crate) struct Ready<T> {
    slot: Mutex<Option<T>>,
    cond: Condvar,
}

impl<T: Copy> Ready<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            cond: Condvar::new(),
        }
    }

    pub(crate) fn signal(&self, value: T) {
        *self.slot.lock().expect("ready signal poisoned") = Some(value);
        self.cond.notify_all();
    }

    fn get(&self) -> Option<T> {
        *self.slot.lock().expect("ready signal poisoned")
    }

    fn wait(&self) -> T {
        let mut slot = self.slot.lock().expect("ready signal poisoned");
        loop {
            if let Some(value) = *slot {
                return value;
            }
            slot = self.cond.wait(slot).expect("ready signal poisoned");
        }
    }
}

/// Handle for threads other than the pump thread.
///
/// [`close`](Remote::close) is safe from anywhere: it only posts a request
/// into the host message queue, and the actual teardown happens back on the
/// pump thread when that request is dispatched.
pub struct Remote<H: Host> {
    ready: Arc<Ready<H::Handle>>,
}

impl<H: Host> Clone for Remote<H> {
    fn clone(&self) -> Self {
        Self {
            ready: Arc::clone(&self.ready),
        }
    }
}

impl<H: Host> Remote<H> {
    /// Block until [`Tree::run`] has finished creating the window tree;
    /// returns the root handle.
    pub fn wait_ready(&self) -> H::Handle {
        self.ready.wait()
    }

    /// Post a close request to the root window. No-op if creation has not
    /// completed yet.
    pub fn close(&self) {
        if let Some(handle) = self.ready.get() {
            H::request_close(handle);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HAlign;
    use crate::host::WidgetClass;
    use crate::host::test_host::{CLOSE_REQUESTS, Call, TestHost};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn dialog() -> (Tree<TestHost>, NodeId) {
        let mut tree = Tree::new(TestHost::new().with_metrics(16, 8));
        let top = tree.top();
        let group = tree.vertical_group(top, HAlign::Center);
        tree.label(group, "downloading");
        tree.progress_bar(group);
        (tree, top)
    }

    #[test]
    fn test_top_area_is_child_padded_area() {
        let (mut tree, top) = dialog();
        // label 110 + 16 padding, group padding 16 on top of that.
        assert_eq!(tree.area(top).x, 142);
    }

    #[test]
    #[should_panic(expected = "no child to size against")]
    fn test_top_without_child_panics() {
        let mut tree = Tree::new(TestHost::new());
        let top = tree.top();
        tree.area(top);
    }

    #[test]
    fn test_decoration_wraps_client_area() {
        let (mut tree, top) = dialog();
        tree.nodes[top.0].style |= FrameStyle::CAPTION;
        let client = tree.area(top);
        let outer = tree.decorated_area(top);
        assert!(outer.x >= client.x && outer.y >= client.y);
        assert_eq!(outer.x - client.x, tree.host.frame.horizontal());
        assert_eq!(outer.y - client.y, tree.host.frame.vertical());
    }

    #[test]
    fn test_bare_frame_patched_to_caption_on_run() {
        init_tracing();
        let (mut tree, top) = dialog();
        assert!(tree.nodes[top.0].style.is_bare());
        tree.run("title").unwrap();
        assert!(tree.nodes[top.0].style.contains(FrameStyle::CAPTION));
        // Decoration was computed under the patched style.
        assert!(
            tree.host
                .calls
                .iter()
                .all(|c| !matches!(c, Call::OuterSize(s) if !s.contains(FrameStyle::CAPTION)))
        );
    }

    #[test]
    fn test_explicit_caption_not_patched_twice() {
        let (mut tree, top) = dialog();
        tree.nodes[top.0].style |= FrameStyle::CAPTION;
        tree.run("title").unwrap();
        assert_eq!(tree.nodes[top.0].style, FrameStyle::CAPTION);
    }

    #[test]
    fn test_window_centers_in_work_area() {
        let (mut tree, top) = dialog();
        tree.nodes[top.0].style |= FrameStyle::CAPTION;
        let outer = tree.decorated_area(top);
        let pos = tree.position(top);
        assert_eq!(pos.x, 1600 / 2 - outer.x / 2);
        assert_eq!(pos.y, 1200 / 2 - outer.y / 2);
    }

    #[test]
    fn test_work_area_failure_falls_back_to_screen() {
        let (mut tree, top) = dialog();
        tree.host.work_area = None;
        tree.nodes[top.0].style |= FrameStyle::CAPTION;
        let outer = tree.decorated_area(top);
        let pos = tree.position(top);
        assert_eq!(pos.x, 1920 / 2 - outer.x / 2);
        assert_eq!(pos.y, 1080 / 2 - outer.y / 2);
    }

    #[test]
    fn test_run_sequences_creation_font_show_proc_pump() {
        let (mut tree, top) = dialog();
        let exit = tree.run("progress").unwrap();
        assert_eq!(exit, 0);
        assert_eq!(tree.nodes[top.0].text, "progress");

        let order: Vec<usize> = [
            tree.host
                .calls
                .iter()
                .position(|c| matches!(c, Call::Create { class: WidgetClass::Dialog, .. })),
            tree.host
                .calls
                .iter()
                .position(|c| matches!(c, Call::ApplyFont(_))),
            tree.host.calls.iter().position(|c| matches!(c, Call::Show(_))),
            tree.host
                .calls
                .iter()
                .position(|c| matches!(c, Call::InstallProc(_))),
            tree.host.calls.iter().position(|c| matches!(c, Call::RunLoop)),
        ]
        .into_iter()
        .map(|p| p.expect("phase missing"))
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "phases out of order: {order:?}");
    }

    #[test]
    fn test_root_created_with_title() {
        let (mut tree, _top) = dialog();
        tree.run("hello there").unwrap();
        assert!(tree.host.calls.iter().any(
            |c| matches!(c, Call::Create { class: WidgetClass::Dialog, title, .. } if title == "hello there")
        ));
    }

    #[test]
    fn test_close_before_creation_is_noop() {
        let (mut tree, _top) = dialog();
        tree.close();
        tree.remote().close();
        CLOSE_REQUESTS.with_borrow(|v| assert!(v.is_empty()));
    }

    #[test]
    fn test_close_posts_to_root_after_run() {
        let (mut tree, top) = dialog();
        tree.run("t").unwrap();
        let root_handle = tree.nodes[top.0].handle.unwrap();
        tree.close();
        CLOSE_REQUESTS.with_borrow(|v| assert_eq!(v.as_slice(), &[root_handle]));
    }

    #[test]
    fn test_remote_ready_and_close() {
        let (mut tree, top) = dialog();
        let remote = tree.remote();
        tree.run("t").unwrap();
        let root_handle = tree.nodes[top.0].handle.unwrap();
        assert_eq!(remote.wait_ready(), root_handle);
        remote.clone().close();
        CLOSE_REQUESTS.with_borrow(|v| assert_eq!(v.as_slice(), &[root_handle]));
    }

    #[test]
    fn test_run_surfaces_creation_failure() {
        let (mut tree, _top) = dialog();
        tree.host.fail_create = true;
        assert!(tree.run("t").is_err());
    }
}
