//! Rendering: draw commands in, pixels (vertex strips) out, and hit tests
//! answered against the frame currently on screen.

pub mod frame;
pub mod inline;
pub mod surface;
pub mod worker;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::data_types::{HoverElement, Sample, SurfaceSize, Viewport};

pub use frame::{FrameSeries, RenderedFrame};
pub use inline::SurfaceRenderer;
pub use surface::{DrawSurface, LineStrip, Vertex, VertexSurface};
pub use worker::WorkerRenderer;

/// Samples of one series to draw, already limited to the visible window.
#[derive(Clone, Debug)]
pub struct SeriesDraw {
    pub config_index: usize,
    pub line_width: f32,
    pub samples: Arc<[Sample]>,
}

/// Everything the renderer needs to produce one frame.
#[derive(Clone, Debug)]
pub struct DrawCommand {
    pub generation: u64,
    pub viewport: Viewport,
    pub size: SurfaceSize,
    pub hit_tolerance_px: f64,
    pub series: Vec<SeriesDraw>,
}

/// Trait for renderers driven by a coordinator.
pub trait Renderer: Send + Sync {
    /// Submits a frame. May return before the frame is on screen.
    fn draw(&self, command: DrawCommand);

    /// Samples near a surface-relative pixel in the frame on screen.
    fn elements_at_pixel(&self, pixel_x: f64, pixel_y: f64) -> BoxFuture<'static, Vec<HoverElement>>;
}

/// Paints a built frame onto a surface, one polyline per series.
pub fn paint_frame<S: DrawSurface + ?Sized>(surface: &mut S, frame: &RenderedFrame) {
    surface.begin_frame(frame.size);
    for series in &frame.series {
        let vertices: Vec<Vertex> = series.screen.iter().copied().map(Vertex::from).collect();
        surface.draw_polyline(series.config_index, series.line_width, &vertices);
    }
    surface.end_frame();
}
