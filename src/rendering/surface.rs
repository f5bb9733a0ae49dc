use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::data_types::SurfaceSize;

/// Screen-space vertex, laid out for direct upload to a GPU buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl From<DVec2> for Vertex {
    fn from(p: DVec2) -> Self {
        Self {
            position: [p.x as f32, p.y as f32],
        }
    }
}

/// Target the renderer paints a frame onto.
pub trait DrawSurface: Send {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn draw_polyline(&mut self, config_index: usize, line_width: f32, points: &[Vertex]);
    fn end_frame(&mut self);
}

impl<S: DrawSurface> DrawSurface for std::sync::Arc<parking_lot::Mutex<S>> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.lock().begin_frame(size);
    }

    fn draw_polyline(&mut self, config_index: usize, line_width: f32, points: &[Vertex]) {
        self.lock().draw_polyline(config_index, line_width, points);
    }

    fn end_frame(&mut self) {
        self.lock().end_frame();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineStrip {
    pub config_index: usize,
    pub line_width: f32,
    pub vertices: Vec<Vertex>,
}

/// Surface that keeps one vertex strip per series, ready for upload.
#[derive(Debug, Default)]
pub struct VertexSurface {
    size: SurfaceSize,
    pending: Vec<LineStrip>,
    strips: Vec<LineStrip>,
    frames_presented: u64,
}

impl VertexSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Strips of the last presented frame.
    pub fn strips(&self) -> &[LineStrip] {
        &self.strips
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Raw bytes of one strip's vertex buffer.
    pub fn strip_bytes(&self, index: usize) -> Option<&[u8]> {
        self.strips
            .get(index)
            .map(|s| bytemuck::cast_slice(&s.vertices))
    }
}

impl DrawSurface for VertexSurface {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
        self.pending.clear();
    }

    fn draw_polyline(&mut self, config_index: usize, line_width: f32, points: &[Vertex]) {
        self.pending.push(LineStrip {
            config_index,
            line_width,
            vertices: points.to_vec(),
        });
    }

    fn end_frame(&mut self) {
        std::mem::swap(&mut self.strips, &mut self.pending);
        self.pending.clear();
        self.frames_presented += 1;
    }
}
