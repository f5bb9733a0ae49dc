use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eyre::{eyre, Result};
use futures::executor::block_on;
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use rand::Rng;

use plot_panel::coordinator::{Coordinator, PlotCoordinator, SampleQuery};
use plot_panel::data_types::*;
use plot_panel::rendering::{DrawCommand, Renderer};
use plot_panel::view_controller::ViewController;

#[derive(Default)]
struct RecordingRenderer {
    commands: Mutex<Vec<DrawCommand>>,
}

impl RecordingRenderer {
    fn count(&self) -> usize {
        self.commands.lock().len()
    }

    fn last(&self) -> DrawCommand {
        self.commands.lock().last().cloned().expect("no draw submitted")
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&self, command: DrawCommand) {
        self.commands.lock().push(command);
    }

    fn elements_at_pixel(&self, _x: f64, _y: f64) -> BoxFuture<'static, Vec<HoverElement>> {
        future::ready(Vec::new()).boxed()
    }
}

fn setup(config: PlotConfig) -> (PlotCoordinator, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::default());
    let coordinator = PlotCoordinator::new(config, renderer.clone());
    (coordinator, renderer)
}

fn line(from: i32, to: i32) -> Vec<Sample> {
    (from..=to).map(|i| Sample::new(i as f64, i as f64)).collect()
}

const RECT: BoundingRect = BoundingRect {
    left: 20.0,
    top: 10.0,
    width: 200.0,
    height: 100.0,
};

fn wheel(delta_y: f64, client_x: f64, client_y: f64) -> InteractionEvent {
    InteractionEvent::wheel(
        &WheelEvent {
            delta_x: 0.0,
            delta_y,
            client_x,
            client_y,
            current_target: &RECT,
        },
        RECT,
    )
}

fn x_bounds(c: &PlotCoordinator) -> (f64, f64) {
    let vp = c.current_viewport().unwrap();
    (vp.x.min, vp.x.max)
}

#[test]
fn test_unready_coordinator_returns_none() {
    let (c, renderer) = setup(PlotConfig::default());
    assert_eq!(c.x_value_at_pixel(10.0), None);
    assert!(c.current_viewport().is_none());
    assert!(c.csv_data().is_empty());

    c.add_interaction_event(wheel(-100.0, 120.0, 60.0));
    c.reset_bounds();
    assert_eq!(renderer.count(), 0);
}

#[test]
fn test_viewport_follows_data_and_draws_once_sized() {
    let (c, renderer) = setup(PlotConfig::default());
    c.update_series(0, line(0, 10));
    assert_eq!(x_bounds(&c), (0.0, 10.0));
    assert_eq!(renderer.count(), 0, "no draw before the surface has a size");
    assert_eq!(c.x_value_at_pixel(100.0), None);

    c.set_size(SurfaceSize::new(200.0, 100.0));
    assert_eq!(renderer.count(), 1);
    assert_eq!(c.x_value_at_pixel(100.0), Some(5.0));

    // Same size again is not a change.
    c.set_size(SurfaceSize::new(200.0, 100.0));
    assert_eq!(renderer.count(), 1);

    let cmd = renderer.last();
    assert_eq!(cmd.size, SurfaceSize::new(200.0, 100.0));
    assert_eq!(cmd.series.len(), 1);
    assert_eq!(cmd.series[0].samples.len(), 11);
    assert_eq!(cmd.hit_tolerance_px, 8.0);
}

#[test]
fn test_wheel_zoom_then_reset() {
    let (c, renderer) = setup(PlotConfig::default());
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 10));

    // Client (120, 60) is the centre of the surface.
    c.add_interaction_event(wheel(-100.0, 120.0, 60.0));
    assert_eq!(x_bounds(&c), (2.5, 7.5));
    assert!(c.is_user_interacting());

    // New data no longer moves a viewport the user placed.
    c.update_series(0, line(0, 20));
    assert_eq!(x_bounds(&c), (2.5, 7.5));

    let before = renderer.count();
    c.reset_bounds();
    assert_eq!(x_bounds(&c), (0.0, 20.0));
    assert!(!c.is_user_interacting());
    assert_eq!(renderer.count(), before + 1);
}

#[test]
fn test_zoom_mode_restricts_axes() {
    let (c, _) = setup(PlotConfig::default());
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 10));
    assert_eq!(c.zoom_mode(), ZoomMode::X);

    c.set_zoom_mode(ZoomMode::Y);
    c.add_interaction_event(wheel(-100.0, 120.0, 60.0));
    let vp = c.current_viewport().unwrap();
    assert_eq!((vp.x.min, vp.x.max), (0.0, 10.0));
    assert_eq!((vp.y.min, vp.y.max), (2.5, 7.5));

    c.set_zoom_mode(ZoomMode::XY);
    c.add_interaction_event(wheel(-100.0, 120.0, 60.0));
    let vp = c.current_viewport().unwrap();
    assert_eq!(vp.x.span(), 5.0);
    assert_eq!(vp.y.span(), 2.5);
}

#[test]
fn test_events_apply_in_arrival_order() {
    let (c, _) = setup(PlotConfig::default());
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 100));
    let mut expected = c.current_viewport().unwrap();

    let mut rng = rand::rng();
    for _ in 0..200 {
        let event = if rng.random_bool(0.5) {
            wheel(
                rng.random_range(-50.0..50.0),
                rng.random_range(20.0..220.0),
                rng.random_range(10.0..110.0),
            )
        } else {
            InteractionEvent::pan(
                InteractionKind::PanMove,
                rng.random_range(-30.0..30.0),
                rng.random_range(-30.0..30.0),
                RECT,
            )
        };
        expected = ViewController::apply_interaction(&expected, &event, ZoomMode::X);
        c.add_interaction_event(event);
    }
    assert_eq!(c.current_viewport().unwrap(), expected);
}

#[test]
fn test_append_follows_view_width() {
    let mut config = PlotConfig::default();
    config.following_view_width = Some(5.0);
    let (c, _) = setup(config);
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.append_samples(0, &line(0, 20));

    let vp = c.current_viewport().unwrap();
    assert_eq!((vp.x.min, vp.x.max), (15.0, 20.0));
    assert_eq!((vp.y.min, vp.y.max), (15.0, 20.0));
}

#[test]
fn test_append_redraws_only_when_visible() {
    let (c, renderer) = setup(PlotConfig::default());
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.append_samples(0, &line(0, 10));
    c.set_x_bounds(5.0, 15.0);
    let before = renderer.count();

    c.append_samples(0, &[Sample::new(11.0, 1.0)]);
    assert_eq!(renderer.count(), before + 1);

    c.append_samples(0, &[Sample::new(50.0, 1.0)]);
    assert_eq!(renderer.count(), before + 1);
    assert_eq!(x_bounds(&c), (5.0, 15.0));
}

#[test]
fn test_streaming_capacity_evicts_oldest() {
    let renderer = Arc::new(RecordingRenderer::default());
    let c = PlotCoordinator::new(PlotConfig::default(), renderer).with_streaming_capacity(5);
    c.append_samples(0, &line(0, 9));
    assert_eq!(x_bounds(&c), (5.0, 9.0));
}

#[test]
fn test_config_y_limits_override_data() {
    let mut config = PlotConfig::default();
    config.min_y_value = Some(-1.0);
    config.max_y_value = Some(1.0);
    let (c, _) = setup(config);
    c.update_series(0, line(0, 10));
    let vp = c.current_viewport().unwrap();
    assert_eq!((vp.y.min, vp.y.max), (-1.0, 1.0));
}

#[test]
fn test_disabled_series_are_not_drawn() {
    let config = PlotConfig::default().with_series(vec![
        SeriesConfig::labelled("on"),
        SeriesConfig {
            enabled: false,
            ..SeriesConfig::labelled("off")
        },
    ]);
    let (c, renderer) = setup(config);
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 10));
    c.update_series(1, line(100, 200));

    assert_eq!(x_bounds(&c), (0.0, 10.0));
    let cmd = renderer.last();
    assert_eq!(cmd.series.len(), 1);
    assert_eq!(cmd.series[0].config_index, 0);
}

#[test]
fn test_draw_command_is_decimated() {
    let mut config = PlotConfig::default();
    config.max_render_points = 100;
    let (c, renderer) = setup(config);
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, (0..10_000).map(|i| Sample::new(i as f64, (i % 13) as f64)).collect());
    assert!(renderer.last().series[0].samples.len() <= 100);
}

#[test]
fn test_generations_increase() {
    let (c, renderer) = setup(PlotConfig::default());
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 10));
    c.add_interaction_event(wheel(-10.0, 120.0, 60.0));
    let gens: Vec<u64> = renderer.commands.lock().iter().map(|c| c.generation).collect();
    assert!(gens.windows(2).all(|w| w[0] < w[1]));
}

struct FlakyQuery {
    fail_index: Option<usize>,
}

impl SampleQuery for FlakyQuery {
    fn query_series(&self, index: usize, _config: &SeriesConfig) -> Result<Vec<Sample>> {
        if Some(index) == self.fail_index {
            return Err(eyre!("upstream rejected series {index}"));
        }
        Ok(line(index as i32 * 10, index as i32 * 10 + 10))
    }
}

fn two_series() -> PlotConfig {
    PlotConfig::default().with_series(vec![SeriesConfig::labelled("a"), SeriesConfig::labelled("b")])
}

#[test]
fn test_load_from_fills_every_series() {
    let (c, _) = setup(two_series());
    c.load_from(&FlakyQuery { fail_index: None }).unwrap();
    assert_eq!(x_bounds(&c), (0.0, 20.0));
    assert!(c.notifications().is_empty());
}

#[test]
fn test_load_failure_is_notified_and_keeps_state() {
    let (c, renderer) = setup(two_series());
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 3));
    let viewport = c.current_viewport();
    let draws = renderer.count();

    let err = c.load_from(&FlakyQuery { fail_index: Some(1) }).unwrap_err();
    assert!(err.to_string().contains("series 1"));

    let notes = c.notifications().drain();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].retryable);
    assert!(notes[0].message.contains("upstream rejected"));

    assert_eq!(c.current_viewport(), viewport);
    assert_eq!(renderer.count(), draws);
}

#[test]
fn test_csv_data_limited_to_view() {
    let config = PlotConfig::default().with_series(vec![
        SeriesConfig::labelled("alpha"),
        SeriesConfig {
            enabled: false,
            ..Default::default()
        },
        SeriesConfig::default(),
    ]);
    let (c, _) = setup(config);
    c.update_series(0, line(0, 10));
    c.update_series(1, line(0, 10));
    c.update_series(2, line(0, 10));
    c.set_x_bounds(2.0, 4.0);

    let data = c.csv_data();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].label, "alpha");
    assert_eq!(data[0].rows, vec![(2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
    assert_eq!(data[1].label, "series 2");
}

#[test]
fn test_csv_data_in_background() {
    let renderer = Arc::new(RecordingRenderer::default());
    let c = Arc::new(PlotCoordinator::new(PlotConfig::default(), renderer));
    c.update_series(0, line(0, 4));
    let data = block_on(c.csv_data_in_background());
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].rows.len(), 5);
}

#[test]
fn test_set_x_bounds_ignores_invalid() {
    let (c, _) = setup(PlotConfig::default());
    c.update_series(0, line(0, 10));
    c.set_x_bounds(f64::NAN, 3.0);
    assert_eq!(x_bounds(&c), (0.0, 10.0));
    assert!(!c.is_user_interacting());

    c.set_x_bounds(8.0, 2.0);
    assert_eq!(x_bounds(&c), (2.0, 8.0));
}

#[test]
fn test_streaming_series_replaced_wholesale_keeps_all_samples() {
    let renderer = Arc::new(RecordingRenderer::default());
    let c = PlotCoordinator::new(PlotConfig::default(), renderer).with_streaming_capacity(10);
    c.append_samples(0, &line(0, 0));
    c.update_series(0, line(0, 49));
    assert_eq!(c.csv_data()[0].rows.len(), 50);

    // Later appends extend the replaced dataset instead of a ring buffer.
    c.append_samples(0, &line(50, 50));
    assert_eq!(c.csv_data()[0].rows.len(), 51);
    assert_eq!(x_bounds(&c), (0.0, 50.0));
}

#[test]
fn test_config_y_limits_bound_pan_and_zoom() {
    let mut config = PlotConfig::default();
    config.min_y_value = Some(-1.0);
    config.max_y_value = Some(1.0);
    let (c, _) = setup(config);
    c.set_size(SurfaceSize::new(200.0, 100.0));
    c.update_series(0, line(0, 10));
    c.set_zoom_mode(ZoomMode::Y);

    // Zooming out cannot go past the fixed values.
    c.add_interaction_event(wheel(100.0, 120.0, 60.0));
    let vp = c.current_viewport().unwrap();
    assert_eq!((vp.y.min, vp.y.max), (-1.0, 1.0));

    c.add_interaction_event(wheel(-100.0, 120.0, 60.0));
    let vp = c.current_viewport().unwrap();
    assert_eq!((vp.y.min, vp.y.max), (-0.5, 0.5));

    // Panning far up stops at the upper limit and keeps the span.
    c.add_interaction_event(InteractionEvent::pan(InteractionKind::PanMove, 0.0, 1000.0, RECT));
    let vp = c.current_viewport().unwrap();
    assert_eq!(vp.y.max, 1.0);
    assert!(vp.y.min.abs() < 1e-9);
}

/// Records commands only after its first draw has been held up, so a
/// frame submitted meanwhile would otherwise be overwritten.
#[derive(Default)]
struct SlowFirstDraw {
    entered: AtomicBool,
    commands: Mutex<Vec<DrawCommand>>,
}

impl Renderer for SlowFirstDraw {
    fn draw(&self, command: DrawCommand) {
        if !self.entered.swap(true, Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(100));
        }
        self.commands.lock().push(command);
    }

    fn elements_at_pixel(&self, _x: f64, _y: f64) -> BoxFuture<'static, Vec<HoverElement>> {
        future::ready(Vec::new()).boxed()
    }
}

#[test]
fn test_concurrent_writers_present_latest_frame() {
    let renderer = Arc::new(SlowFirstDraw::default());
    let c = PlotCoordinator::new(PlotConfig::default(), renderer.clone());
    c.update_series(0, line(0, 0));

    std::thread::scope(|s| {
        // The first draw (1 sample) is slow; the second (3 samples) races it.
        let slow = s.spawn(|| c.set_size(SurfaceSize::new(200.0, 100.0)));
        while !renderer.entered.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        c.update_series(0, line(0, 2));
        slow.join().unwrap();
    });

    let commands = renderer.commands.lock();
    let last = commands.last().unwrap();
    assert_eq!(last.series[0].samples.len(), 3);
    assert!(commands.windows(2).all(|w| w[0].generation < w[1].generation));
}

#[test]
fn test_many_writers_never_submit_older_generation() {
    let (c, renderer) = setup(PlotConfig::default());
    c.set_size(SurfaceSize::new(200.0, 100.0));

    std::thread::scope(|s| {
        for t in 0..4 {
            let c = &c;
            s.spawn(move || {
                for i in 0..50 {
                    if t % 2 == 0 {
                        c.update_series(t, line(0, i));
                    } else {
                        c.add_interaction_event(wheel(if i % 2 == 0 { -5.0 } else { 5.0 }, 120.0, 60.0));
                    }
                }
            });
        }
    });

    let gens: Vec<u64> = renderer.commands.lock().iter().map(|c| c.generation).collect();
    assert!(!gens.is_empty());
    assert!(gens.windows(2).all(|w| w[0] < w[1]));
}
