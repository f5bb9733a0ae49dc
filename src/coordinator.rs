//! Plot coordinator
//!
//! `PlotCoordinator` is the single source of truth for one plot's viewport
//! and zoom mode. Data arrives through `update_series`/`append_samples` (or
//! is pulled with `load_from`), interaction events mutate the viewport, and
//! every change that affects the picture is turned into a `DrawCommand` for
//! the renderer.
//!
//! Until the user pans or zooms, the viewport follows the data. After that
//! it stays where the user left it until `reset_bounds`.

use std::sync::Arc;

use eyre::Result;
use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::csv_export::CsvDataset;
use crate::data_types::{
    AxisRange, DataExtent, InteractionEvent, PlotConfig, PlotDataSource, Sample, SeriesConfig,
    StreamingDataSource, SurfaceSize, VecDataSource, Viewport, ZoomMode,
};
use crate::notifications::Notifications;
use crate::rendering::{DrawCommand, Renderer, SeriesDraw};
use crate::transform::PlotTransform;
use crate::view_controller::ViewController;

/// Default ring-buffer size for series fed through `append_samples`.
pub const DEFAULT_STREAMING_CAPACITY: usize = 100_000;

/// Operations the interaction layer issues against a plot.
pub trait Coordinator: Send + Sync {
    /// Data-space x under a surface-relative pixel; None before the first
    /// viewport exists.
    fn x_value_at_pixel(&self, canvas_x: f64) -> Option<f64>;

    fn reset_bounds(&self);

    fn set_zoom_mode(&self, mode: ZoomMode);

    fn add_interaction_event(&self, event: InteractionEvent);

    fn csv_data(&self) -> Vec<CsvDataset>;

    fn current_viewport(&self) -> Option<Viewport>;

    /// Adopts an x range decided elsewhere (bounds sync).
    fn set_x_bounds(&self, min: f64, max: f64);
}

/// Pull interface to the upstream store of samples.
pub trait SampleQuery: Send + Sync {
    fn query_series(&self, index: usize, config: &SeriesConfig) -> Result<Vec<Sample>>;
}

struct CoordinatorState {
    config: PlotConfig,
    sources: Vec<Option<Box<dyn PlotDataSource>>>,
    size: SurfaceSize,
    viewport: Option<Viewport>,
    user_interacted: bool,
    zoom_mode: ZoomMode,
    generation: u64,
}

impl CoordinatorState {
    fn source_slot(&mut self, index: usize) -> &mut Option<Box<dyn PlotDataSource>> {
        if self.sources.len() <= index {
            self.sources.resize_with(index + 1, || None);
        }
        &mut self.sources[index]
    }

    fn data_extent(&self) -> Option<DataExtent> {
        let merged = self
            .sources
            .iter()
            .enumerate()
            .filter(|(i, _)| self.config.is_series_enabled(*i))
            .filter_map(|(_, s)| s.as_ref().and_then(|s| s.extent()))
            .fold(DataExtent::empty(), |acc, e| acc.union(&e));
        (!merged.is_empty()).then_some(merged)
    }

    fn y_range_in(&self, x_min: f64, x_max: f64) -> Option<(f64, f64)> {
        self.sources
            .iter()
            .enumerate()
            .filter(|(i, _)| self.config.is_series_enabled(*i))
            .filter_map(|(_, s)| s.as_ref().and_then(|s| s.y_range(x_min, x_max)))
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
    }

    /// Viewport derived from the data alone.
    fn data_viewport(&self) -> Option<Viewport> {
        let extent = self.data_extent()?;
        let (x_min, x_max) = match self.config.following_view_width {
            Some(width) if width > 0.0 => (extent.x_max - width, extent.x_max),
            _ => (extent.x_min, extent.x_max),
        };
        let (y_min, y_max) = self
            .y_range_in(x_min, x_max)
            .unwrap_or((extent.y_min, extent.y_max));
        let (min_limit, max_limit) = (self.config.min_y_value, self.config.max_y_value);
        let mut viewport = Viewport::from_extent(
            x_min,
            x_max,
            min_limit.unwrap_or(y_min),
            max_limit.unwrap_or(y_max),
        )?;
        // Fixed y values also bound later pan and zoom.
        viewport.y = viewport.y.with_limits(min_limit, max_limit);
        Some(viewport)
    }

    fn refresh_viewport(&mut self) {
        if self.user_interacted && self.viewport.is_some() {
            return;
        }
        if let Some(vp) = self.data_viewport() {
            self.viewport = Some(vp);
        }
    }

    fn draw_command(&mut self) -> Option<DrawCommand> {
        let viewport = self.viewport?;
        if self.size.is_empty() {
            return None;
        }
        self.generation += 1;
        let max_points = self.config.max_render_points.max(2);
        let series = self
            .sources
            .iter()
            .enumerate()
            .filter(|(i, _)| self.config.is_series_enabled(*i))
            .filter_map(|(i, s)| {
                let source = s.as_ref()?;
                let samples = source.visible_samples(viewport.x.min, viewport.x.max, max_points);
                Some(SeriesDraw {
                    config_index: i,
                    line_width: self.config.series.get(i).map_or(1.0, |c| c.line_width),
                    samples: Arc::from(samples),
                })
            })
            .collect();
        Some(DrawCommand {
            generation: self.generation,
            viewport,
            size: self.size,
            hit_tolerance_px: self.config.hit_tolerance_px,
            series,
        })
    }
}

pub struct PlotCoordinator {
    state: Mutex<CoordinatorState>,
    renderer: Arc<dyn Renderer>,
    /// Generation of the last command handed to the renderer.
    submitted: Mutex<u64>,
    notifications: Notifications,
    streaming_capacity: usize,
}

impl PlotCoordinator {
    pub fn new(config: PlotConfig, renderer: Arc<dyn Renderer>) -> Self {
        debug!(series = config.series.len(), "plot coordinator created");
        Self {
            state: Mutex::new(CoordinatorState {
                config,
                sources: Vec::new(),
                size: SurfaceSize::default(),
                viewport: None,
                user_interacted: false,
                zoom_mode: ZoomMode::default(),
                generation: 0,
            }),
            renderer,
            submitted: Mutex::new(0),
            notifications: Notifications::new(),
            streaming_capacity: DEFAULT_STREAMING_CAPACITY,
        }
    }

    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn with_streaming_capacity(mut self, capacity: usize) -> Self {
        self.streaming_capacity = capacity;
        self
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn config(&self) -> PlotConfig {
        self.state.lock().config.clone()
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.state.lock().zoom_mode
    }

    pub fn is_user_interacting(&self) -> bool {
        self.state.lock().user_interacted
    }

    /// Builds the next frame under the state lock and hands it to the
    /// renderer once the lock is released. Submissions are serialised and a
    /// command older than the last one submitted is dropped, so racing
    /// writers never leave a stale frame on screen.
    fn redraw_with(&self, f: impl FnOnce(&mut CoordinatorState) -> bool) {
        let command = {
            let mut state = self.state.lock();
            if !f(&mut state) {
                return;
            }
            state.draw_command()
        };
        let Some(command) = command else {
            return;
        };
        let mut submitted = self.submitted.lock();
        if command.generation <= *submitted {
            trace!(generation = command.generation, latest = *submitted, "stale draw dropped");
            return;
        }
        *submitted = command.generation;
        trace!(generation = command.generation, "draw submitted");
        self.renderer.draw(command);
    }

    pub fn set_size(&self, size: SurfaceSize) {
        self.redraw_with(|state| {
            if state.size == size {
                return false;
            }
            state.size = size;
            true
        });
    }

    /// Replaces the samples of one series. The whole dataset is kept, even
    /// when the series was streaming before.
    pub fn update_series(&self, index: usize, samples: Vec<Sample>) {
        self.redraw_with(|state| {
            *state.source_slot(index) = Some(Box::new(VecDataSource::new(samples)));
            state.refresh_viewport();
            true
        });
    }

    /// Appends newly arrived samples to one series. Redraws only when the
    /// viewport moved or a new sample falls inside it.
    pub fn append_samples(&self, index: usize, samples: &[Sample]) {
        let capacity = self.streaming_capacity;
        self.redraw_with(|state| {
            let slot = state.source_slot(index);
            let source = slot.get_or_insert_with(|| {
                Box::new(StreamingDataSource::new(capacity)) as Box<dyn PlotDataSource>
            });
            for s in samples {
                source.push(*s);
            }
            let before = state.viewport;
            state.refresh_viewport();
            match state.viewport {
                Some(vp) => before != Some(vp) || samples.iter().any(|s| vp.x.contains(s.x)),
                None => false,
            }
        });
    }

    /// Pulls every configured series from an upstream query. On failure the
    /// error is logged and queued as a retryable notification; current data
    /// and viewport stay untouched.
    pub fn load_from(&self, query: &dyn SampleQuery) -> Result<()> {
        let series = self.state.lock().config.series.clone();
        let mut loaded = Vec::with_capacity(series.len());
        for (index, cfg) in series.iter().enumerate() {
            match query.query_series(index, cfg) {
                Ok(samples) => loaded.push(samples),
                Err(err) => {
                    warn!(index, "failed to load series: {err:#}");
                    self.notifications
                        .retryable_error(format!("Failed to load plot data: {err}"));
                    return Err(err);
                }
            }
        }
        self.redraw_with(|state| {
            for (index, samples) in loaded.into_iter().enumerate() {
                *state.source_slot(index) = Some(Box::new(VecDataSource::new(samples)));
            }
            state.refresh_viewport();
            true
        });
        Ok(())
    }

    /// Runs the CSV snapshot on the rayon pool so a large export does not
    /// stall the caller.
    pub fn csv_data_in_background(self: &Arc<Self>) -> BoxFuture<'static, Vec<CsvDataset>> {
        let this = self.clone();
        let (tx, rx) = oneshot::channel();
        rayon::spawn(move || {
            let _ = tx.send(this.csv_data());
        });
        async move { rx.await.unwrap_or_default() }.boxed()
    }
}

impl Coordinator for PlotCoordinator {
    fn x_value_at_pixel(&self, canvas_x: f64) -> Option<f64> {
        let state = self.state.lock();
        let viewport = state.viewport?;
        PlotTransform::new(&viewport, state.size).x_value_at_pixel(canvas_x)
    }

    fn reset_bounds(&self) {
        self.redraw_with(|state| {
            state.user_interacted = false;
            state.refresh_viewport();
            debug!(viewport = ?state.viewport, "bounds reset");
            state.viewport.is_some()
        });
    }

    fn set_zoom_mode(&self, mode: ZoomMode) {
        let mut state = self.state.lock();
        if state.zoom_mode != mode {
            trace!(?mode, "zoom mode");
            state.zoom_mode = mode;
        }
    }

    fn add_interaction_event(&self, event: InteractionEvent) {
        self.redraw_with(|state| {
            let Some(viewport) = state.viewport else {
                trace!(kind = ?event.kind, "interaction before first data ignored");
                return false;
            };
            let next = ViewController::apply_interaction(&viewport, &event, state.zoom_mode);
            if next == viewport {
                return false;
            }
            state.viewport = Some(next);
            state.user_interacted = true;
            true
        });
    }

    fn csv_data(&self) -> Vec<CsvDataset> {
        let state = self.state.lock();
        let Some(viewport) = state.viewport else {
            return Vec::new();
        };
        state
            .sources
            .iter()
            .enumerate()
            .filter(|(i, _)| state.config.is_series_enabled(*i))
            .filter_map(|(i, s)| {
                let source = s.as_ref()?;
                Some(CsvDataset {
                    label: state.config.series_label(i),
                    rows: source
                        .iter_range(viewport.x.min, viewport.x.max)
                        .map(|s| (s.x, s.y))
                        .collect(),
                })
            })
            .collect()
    }

    fn current_viewport(&self) -> Option<Viewport> {
        self.state.lock().viewport
    }

    fn set_x_bounds(&self, min: f64, max: f64) {
        let Some(x) = AxisRange::from_extent(min, max) else {
            return;
        };
        self.redraw_with(|state| {
            let Some(viewport) = state.viewport.as_mut() else {
                return false;
            };
            if viewport.x.min == x.min && viewport.x.max == x.max {
                return false;
            }
            viewport.x.min = x.min;
            viewport.x.max = x.max;
            state.user_interacted = true;
            true
        });
    }
}
