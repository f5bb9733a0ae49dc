use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::trace;

use super::{paint_frame, DrawCommand, DrawSurface, RenderedFrame, Renderer};
use crate::data_types::HoverElement;

/// Renderer that paints on the calling thread.
pub struct SurfaceRenderer<S: DrawSurface> {
    surface: Mutex<S>,
    frame: RwLock<Arc<RenderedFrame>>,
}

impl<S: DrawSurface> SurfaceRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface: Mutex::new(surface),
            frame: RwLock::new(Arc::new(RenderedFrame::empty())),
        }
    }

    pub fn surface(&self) -> MutexGuard<'_, S> {
        self.surface.lock()
    }

    pub fn current_frame(&self) -> Arc<RenderedFrame> {
        self.frame.read().clone()
    }
}

impl<S: DrawSurface> Renderer for SurfaceRenderer<S> {
    fn draw(&self, command: DrawCommand) {
        let mut surface = self.surface.lock();
        if command.generation <= self.frame.read().generation {
            trace!(generation = command.generation, "stale frame dropped");
            return;
        }
        let frame = Arc::new(RenderedFrame::build(&command));
        paint_frame(&mut *surface, &frame);
        // Swap while the surface lock is held so the published frame always
        // matches the presented pixels.
        *self.frame.write() = frame;
        trace!(generation = command.generation, "frame presented");
    }

    fn elements_at_pixel(&self, pixel_x: f64, pixel_y: f64) -> BoxFuture<'static, Vec<HoverElement>> {
        let frame = self.current_frame();
        future::ready(frame.hit_test(pixel_x, pixel_y)).boxed()
    }
}
