use std::sync::Arc;

use glam::DVec2;
use rayon::prelude::*;

use super::DrawCommand;
use crate::data_types::{HoverElement, Sample, SurfaceSize, Viewport};
use crate::transform::PlotTransform;

/// One series as it was laid out on the surface.
#[derive(Clone, Debug)]
pub struct FrameSeries {
    pub config_index: usize,
    pub line_width: f32,
    pub samples: Arc<[Sample]>,
    /// Screen position of each sample, same order as `samples`.
    pub screen: Vec<DVec2>,
    sorted_by_x: bool,
}

impl FrameSeries {
    /// Index of the sample closest to `pixel`, if within `tolerance`.
    fn nearest(&self, pixel: DVec2, tolerance: f64) -> Option<usize> {
        let candidates = if self.sorted_by_x {
            let start = self.screen.partition_point(|p| p.x < pixel.x - tolerance);
            let end = self.screen.partition_point(|p| p.x <= pixel.x + tolerance);
            start..end.max(start)
        } else {
            0..self.screen.len()
        };

        let mut best: Option<(usize, f64)> = None;
        for i in candidates {
            let sample = &self.samples[i];
            if !sample.x.is_finite() || !sample.y.is_finite() {
                continue;
            }
            let d = self.screen[i].distance_squared(pixel);
            if !d.is_finite() || d > tolerance * tolerance {
                continue;
            }
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// The last frame drawn on the surface. Published whole, never mutated
/// after construction.
#[derive(Clone, Debug, Default)]
pub struct RenderedFrame {
    pub generation: u64,
    pub viewport: Viewport,
    pub size: SurfaceSize,
    pub hit_tolerance_px: f64,
    pub series: Vec<FrameSeries>,
}

impl RenderedFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Projects every series of a draw command onto the surface.
    pub fn build(command: &DrawCommand) -> Self {
        let transform = PlotTransform::new(&command.viewport, command.size);
        let series = command
            .series
            .par_iter()
            .map(|s| {
                let screen: Vec<DVec2> = s
                    .samples
                    .iter()
                    .map(|p| transform.data_to_screen(DVec2::new(p.x, p.y)))
                    .collect();
                let sorted_by_x = screen.windows(2).all(|w| w[0].x <= w[1].x);
                FrameSeries {
                    config_index: s.config_index,
                    line_width: s.line_width,
                    samples: s.samples.clone(),
                    screen,
                    sorted_by_x,
                }
            })
            .collect();

        Self {
            generation: command.generation,
            viewport: command.viewport,
            size: command.size,
            hit_tolerance_px: command.hit_tolerance_px,
            series,
        }
    }

    /// Nearest sample of each series within the hit tolerance of a pixel,
    /// in series order.
    pub fn hit_test(&self, pixel_x: f64, pixel_y: f64) -> Vec<HoverElement> {
        if !pixel_x.is_finite() || !pixel_y.is_finite() {
            return Vec::new();
        }
        let pixel = DVec2::new(pixel_x, pixel_y);
        let tolerance = self.hit_tolerance_px.max(0.0);
        self.series
            .par_iter()
            .filter_map(|s| {
                s.nearest(pixel, tolerance).map(|i| HoverElement {
                    config_index: s.config_index,
                    data: s.samples[i],
                })
            })
            .collect()
    }
}
