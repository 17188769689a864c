//! Window surface and the egui pass that paints the debug overlay.

mod overlay_pass;
mod window_surface;

pub use overlay_pass::{paint_overlay, project_primitives, render as render_overlay, to_color32};
pub use window_surface::{SurfaceFrame, WindowSurface};
