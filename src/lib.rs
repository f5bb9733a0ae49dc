//! plot_panel: coordination and interaction layer for interactive time-series plots

pub mod bounds_sync;
pub mod coordinator;
pub mod csv_export;
pub mod data_types;
pub mod debounce;
pub mod decimation;
pub mod hover_state;
pub mod interaction;
pub mod notifications;
pub mod rendering;
pub mod scales;
pub mod transform;
pub mod view_controller;

pub use bounds_sync::{BoundsSyncContext, SyncedBounds};
pub use coordinator::{Coordinator, PlotCoordinator, SampleQuery};
pub use csv_export::{write_csv, CsvDataset};
pub use data_types::{
    ActiveTooltip, HoverElement, HoverValue, InteractionEvent, PlotConfig, Sample, SubscriberId,
    Viewport, ZoomMode,
};
pub use debounce::{Debounced, Debouncer, RequestToken};
pub use hover_state::HoverContext;
pub use interaction::{HandlerDeps, PlotInteractionHandlers};
pub use notifications::{Notification, Notifications};
pub use rendering::{Renderer, SurfaceRenderer, WorkerRenderer};
