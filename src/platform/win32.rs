//! Win32 backend.
//!
//! The only module that talks to the Windows API. Widgets map onto the
//! system window classes (`Static`, `msctls_progress32`, the `#32770`
//! dialog class); measurement and metrics go through GDI and
//! `SystemParametersInfoW`; the pump is a plain `GetMessage` loop.

use std::ffi::c_void;

use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateFontIndirectW, DT_CALCRECT, DeleteObject, DrawTextW, GetDC, HDC, HFONT, ReleaseDC,
    SelectObject, UpdateWindow,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Controls::PBS_SMOOTH;
use windows::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, CreateWindowExW, DefDlgProcW, DestroyWindow, DispatchMessageW,
    GWLP_WNDPROC, GetMessageW, GetSystemMetrics, MSG, MoveWindow, NONCLIENTMETRICSW,
    PostMessageW, PostQuitMessage, SM_CXSCREEN, SM_CYSCREEN, SPI_GETNONCLIENTMETRICS,
    SPI_GETWORKAREA, SW_SHOW, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, SendMessageW,
    SetWindowLongPtrW, SetWindowTextW, ShowWindow, SystemParametersInfoW, TranslateMessage,
    WINDOW_EX_STYLE, WINDOW_STYLE, WM_CLOSE, WM_DESTROY, WM_SETFONT, WS_CAPTION, WS_CHILD,
    WS_EX_NOPARENTNOTIFY, WS_OVERLAPPED, WS_VISIBLE,
};
use windows::core::{HSTRING, PCWSTR, w};

use crate::font::FontMetrics;
use crate::geometry::Extent;
use crate::host::{Error, FrameStyle, Host, WidgetClass};

/// A raw window handle value.
///
/// Stored as the pointer value so it is `Send`: posting a close request to
/// a window from another thread is explicitly supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(isize);

impl From<HWND> for WindowHandle {
    fn from(hwnd: HWND) -> Self {
        Self(hwnd.0 as isize)
    }
}

impl From<WindowHandle> for HWND {
    fn from(handle: WindowHandle) -> Self {
        Self(handle.0 as *mut c_void)
    }
}

/// An owned GDI font.
pub struct Win32Font {
    hfont: HFONT,
}

impl Drop for Win32Font {
    fn drop(&mut self) {
        let _ = unsafe { DeleteObject(self.hfont.into()) };
    }
}

/// The Win32 [`Host`].
///
/// Holds the owning module handle (threaded through window creation) and a
/// screen device context used for text measurement.
pub struct Win32Host {
    hinstance: HINSTANCE,
    hdc: HDC,
}

impl Win32Host {
    pub fn new() -> Result<Self, Error> {
        let hmodule = unsafe { GetModuleHandleW(None) }
            .map_err(|e| Error::WindowCreation(format!("module handle: {e}")))?;
        let hdc = unsafe { GetDC(None) };
        Ok(Self {
            hinstance: hmodule.into(),
            hdc,
        })
    }
}

impl Drop for Win32Host {
    fn drop(&mut self) {
        unsafe { ReleaseDC(None, self.hdc) };
    }
}

/// Map a widget class and the abstract style bits onto Win32 styles.
fn native_style(
    class: WidgetClass,
    style: FrameStyle,
    child: bool,
) -> (WINDOW_STYLE, WINDOW_EX_STYLE) {
    let mut ws = match class {
        WidgetClass::Dialog => WS_OVERLAPPED,
        _ => WINDOW_STYLE(0),
    };
    if style.contains(FrameStyle::CAPTION) {
        ws |= WS_CAPTION;
    }
    if class == WidgetClass::ProgressBar && style.contains(FrameStyle::SMOOTH_FILL) {
        ws |= WINDOW_STYLE(PBS_SMOOTH as u32);
    }
    let mut ex = WINDOW_EX_STYLE(0);
    if child {
        ws |= WS_CHILD | WS_VISIBLE;
        ex |= WS_EX_NOPARENTNOTIFY;
    }
    (ws, ex)
}

fn class_name(class: WidgetClass) -> PCWSTR {
    match class {
        WidgetClass::Label => w!("Static"),
        WidgetClass::ProgressBar => w!("msctls_progress32"),
        WidgetClass::Dialog => w!("#32770"),
    }
}

impl Host for Win32Host {
    type Handle = WindowHandle;
    type Font = Win32Font;

    fn create_window(
        &mut self,
        class: WidgetClass,
        style: FrameStyle,
        title: &str,
        pos: Extent,
        size: Extent,
        parent: Option<WindowHandle>,
    ) -> Result<WindowHandle, Error> {
        let (ws, ex) = native_style(class, style, parent.is_some());
        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                class_name(class),
                &HSTRING::from(title),
                ws,
                pos.x as i32,
                pos.y as i32,
                size.x as i32,
                size.y as i32,
                parent.map(HWND::from),
                None,
                Some(self.hinstance),
                None,
            )
        }
        .map_err(|e| Error::WindowCreation(e.to_string()))?;
        Ok(hwnd.into())
    }

    fn set_text(&mut self, handle: WindowHandle, text: &str) {
        let _ = unsafe { SetWindowTextW(handle.into(), &HSTRING::from(text)) };
    }

    fn apply_font(&mut self, handle: WindowHandle, font: &Win32Font) {
        unsafe {
            SendMessageW(
                handle.into(),
                WM_SETFONT,
                Some(WPARAM(font.hfont.0 as usize)),
                Some(LPARAM(0)),
            );
        }
    }

    fn move_resize(&mut self, handle: WindowHandle, pos: Extent, size: Extent) {
        let _ = unsafe {
            MoveWindow(
                handle.into(),
                pos.x as i32,
                pos.y as i32,
                size.x as i32,
                size.y as i32,
                true,
            )
        };
    }

    fn repaint(&mut self, handle: WindowHandle) {
        let _ = unsafe { UpdateWindow(handle.into()) };
    }

    fn show(&mut self, handle: WindowHandle) {
        let _ = unsafe { ShowWindow(handle.into(), SW_SHOW) };
    }

    fn measure_text(&mut self, font: Option<&Win32Font>, text: &str) -> Extent {
        if let Some(font) = font {
            unsafe { SelectObject(self.hdc, font.hfont.into()) };
        }
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        let mut rect = RECT::default();
        unsafe { DrawTextW(self.hdc, &mut wide, &mut rect, DT_CALCRECT) };
        Extent::new(rect.right.max(0) as u32, rect.bottom.max(0) as u32)
    }

    fn message_font(&mut self) -> Option<(Win32Font, FontMetrics)> {
        let mut nc_metrics = NONCLIENTMETRICSW {
            cbSize: std::mem::size_of::<NONCLIENTMETRICSW>() as u32,
            ..Default::default()
        };
        unsafe {
            SystemParametersInfoW(
                SPI_GETNONCLIENTMETRICS,
                nc_metrics.cbSize,
                Some(&mut nc_metrics as *mut _ as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        }
        .ok()?;
        let hfont = unsafe { CreateFontIndirectW(&nc_metrics.lfMessageFont) };
        if hfont.is_invalid() {
            return None;
        }
        unsafe { SelectObject(self.hdc, hfont.into()) };
        let height = nc_metrics.lfMessageFont.lfHeight.unsigned_abs();
        Some((Win32Font { hfont }, FontMetrics::from_height(height)))
    }

    fn work_area(&mut self) -> Option<Extent> {
        let mut rect = RECT::default();
        unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut rect as *mut _ as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        }
        .ok()?;
        Some(Extent::new(rect.right.max(0) as u32, rect.bottom.max(0) as u32))
    }

    fn screen_size(&mut self) -> Extent {
        let x = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let y = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        Extent::new(x.max(0) as u32, y.max(0) as u32)
    }

    fn outer_size(&mut self, client: Extent, style: FrameStyle) -> Extent {
        let (ws, ex) = native_style(WidgetClass::Dialog, style, false);
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: client.x as i32,
            bottom: client.y as i32,
        };
        if unsafe { AdjustWindowRectEx(&mut rect, ws, false, ex) }.is_err() {
            tracing::warn!("frame size computation failed; using the bare client area");
            return client;
        }
        Extent::new(
            (rect.right - rect.left).max(0) as u32,
            (rect.bottom - rect.top).max(0) as u32,
        )
    }

    fn install_root_proc(&mut self, handle: WindowHandle) {
        unsafe { SetWindowLongPtrW(handle.into(), GWLP_WNDPROC, root_proc as usize as isize) };
    }

    fn request_close(handle: WindowHandle) {
        let _ = unsafe { PostMessageW(Some(handle.into()), WM_CLOSE, WPARAM(0), LPARAM(0)) };
    }

    fn run_loop(&mut self) -> i32 {
        let mut msg = MSG::default();
        loop {
            let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            if ret.0 == 0 {
                break;
            }
            if ret.0 == -1 {
                continue;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        msg.wParam.0 as i32
    }
}

/// Root window procedure. The default dialog procedure handles neither
/// close nor destroy, so both are dispatched here before deferring to it.
unsafe extern "system" fn root_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CLOSE => {
            let _ = unsafe { DestroyWindow(hwnd) };
        }
        WM_DESTROY => unsafe { PostQuitMessage(0) },
        _ => {}
    }
    unsafe { DefDlgProcW(hwnd, msg, wparam, lparam) }
}
