use glam::DVec2;
use plot_panel::data_types::{SurfaceSize, Viewport};
use plot_panel::scales::LinearScale;
use plot_panel::transform::PlotTransform;

#[test]
fn test_linear_scale() {
    let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0));

    assert_eq!(scale.map(0.0), 0.0);
    assert_eq!(scale.map(50.0), 250.0);
    assert_eq!(scale.map(100.0), 500.0);

    assert_eq!(scale.invert(0.0), 0.0);
    assert_eq!(scale.invert(250.0), 50.0);
    assert_eq!(scale.invert(500.0), 100.0);
}

#[test]
fn test_linear_scale_inverted_range() {
    let scale = LinearScale::new((0.0, 10.0), (100.0, 0.0));
    assert_eq!(scale.map(0.0), 100.0);
    assert_eq!(scale.map(10.0), 0.0);
    assert_eq!(scale.invert(25.0), 7.5);
}

#[test]
fn test_plot_transform() {
    let viewport = Viewport::from_extent(0.0, 100.0, 0.0, 100.0).unwrap();
    let transform = PlotTransform::new(&viewport, SurfaceSize::new(200.0, 200.0));

    // Data origin sits at the bottom-left corner.
    let origin = transform.data_to_screen(DVec2::new(0.0, 0.0));
    assert_eq!(origin, DVec2::new(0.0, 200.0));

    let center = transform.data_to_screen(DVec2::new(50.0, 50.0));
    assert_eq!(center, DVec2::new(100.0, 100.0));

    let restored = transform.screen_to_data(center);
    assert!((restored.x - 50.0).abs() < 0.001);
    assert!((restored.y - 50.0).abs() < 0.001);
}

#[test]
fn test_x_value_at_pixel() {
    let viewport = Viewport::from_extent(1000.0, 1010.0, 0.0, 1.0).unwrap();
    let transform = PlotTransform::new(&viewport, SurfaceSize::new(200.0, 50.0));
    assert_eq!(transform.x_value_at_pixel(100.0), Some(1005.0));
    assert_eq!(transform.x_value_at_pixel(0.0), Some(1000.0));
    // Outside the surface still extrapolates linearly.
    assert_eq!(transform.x_value_at_pixel(-20.0), Some(999.0));
    assert_eq!(transform.x_value_at_pixel(f64::NAN), None);
}

#[test]
fn test_x_value_at_pixel_zero_width() {
    let viewport = Viewport::from_extent(0.0, 1.0, 0.0, 1.0).unwrap();
    let transform = PlotTransform::new(&viewport, SurfaceSize::new(0.0, 50.0));
    assert_eq!(transform.x_value_at_pixel(10.0), None);
}

#[test]
fn test_timestamp_precision_survives_projection() {
    // Seconds since epoch keep sub-millisecond precision in f64.
    let t0 = 1_700_000_000.0;
    let viewport = Viewport::from_extent(t0, t0 + 1.0, 0.0, 1.0).unwrap();
    let transform = PlotTransform::new(&viewport, SurfaceSize::new(1000.0, 100.0));
    let x = transform.x_value_at_pixel(1.0).unwrap();
    assert!((x - (t0 + 0.001)).abs() < 1e-6);
}
