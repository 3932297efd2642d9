use winit::event::WindowEvent;

use super::ctx::FrameCtx;
use crate::render::RenderCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// Lifecycle: `on_init` once when the GPU is ready, then `on_frame` once per
/// redraw until the window is closed, then `on_exit` before the window and
/// device are released.
pub trait App {
    /// Builds GPU resources. An error aborts startup.
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once after a close request, while the device is still alive.
    fn on_exit(&mut self) {}
}
