//! Pointer, wheel and keyboard handlers for one plot panel.
//!
//! Handlers live on the interactive thread. Everything they touch that may
//! be missing (coordinator, renderer) is optional and its absence turns the
//! handler into a no-op. Tooltip construction is the only asynchronous step:
//! it runs through a [`Debouncer`] on the panel's local executor and its
//! result is applied only while its [`RequestToken`] is still current.
//!
//! [`RequestToken`]: crate::debounce::RequestToken

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use futures::future::FutureExt;
use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, trace, warn};

use crate::bounds_sync::{BoundsSyncContext, SyncedBounds};
use crate::coordinator::Coordinator;
use crate::data_types::{
    ActiveTooltip, BoundingRectSource, HoverEntry, HoverValue, InteractionEvent, InteractionKind,
    Key, MouseEvent, PlotConfig, SubscriberId, TooltipRequest, WheelEvent, ZoomMode,
};
use crate::debounce::{Debounced, Debouncer};
use crate::hover_state::HoverContext;
use crate::rendering::Renderer;

pub type TooltipSetter = Rc<dyn Fn(Option<ActiveTooltip>)>;

/// Collaborators a panel hands to its handlers.
pub struct HandlerDeps {
    pub coordinator: Option<Arc<dyn Coordinator>>,
    pub renderer: Option<Arc<dyn Renderer>>,
    pub subscriber_id: SubscriberId,
    pub config: PlotConfig,
    pub hover: HoverContext,
    pub bounds_sync: BoundsSyncContext,
    pub set_active_tooltip: TooltipSetter,
    /// Pointer-down flag shared with the view.
    pub dragging: Rc<Cell<bool>>,
    pub spawner: Rc<dyn LocalSpawn>,
}

pub struct PlotInteractionHandlers {
    coordinator: Option<Arc<dyn Coordinator>>,
    subscriber_id: SubscriberId,
    config: PlotConfig,
    hover: HoverContext,
    bounds_sync: BoundsSyncContext,
    set_active_tooltip: TooltipSetter,
    dragging: Rc<Cell<bool>>,
    spawner: Rc<dyn LocalSpawn>,
    build_tooltip: Option<Debouncer<TooltipRequest, Option<ActiveTooltip>>>,
}

fn tooltip_builder(renderer: Arc<dyn Renderer>) -> Debouncer<TooltipRequest, Option<ActiveTooltip>> {
    Debouncer::new(move |request: TooltipRequest| {
        let hits = renderer.elements_at_pixel(request.canvas_x, request.canvas_y);
        async move {
            let elements = hits.await;
            ActiveTooltip::from_elements(&request, &elements)
        }
        .boxed()
    })
}

impl PlotInteractionHandlers {
    pub fn new(deps: HandlerDeps) -> Self {
        Self {
            coordinator: deps.coordinator,
            subscriber_id: deps.subscriber_id,
            config: deps.config,
            hover: deps.hover,
            bounds_sync: deps.bounds_sync,
            set_active_tooltip: deps.set_active_tooltip,
            dragging: deps.dragging,
            spawner: deps.spawner,
            build_tooltip: deps.renderer.map(tooltip_builder),
        }
    }

    pub fn subscriber_id(&self) -> &SubscriberId {
        &self.subscriber_id
    }

    pub fn title(&self) -> Option<&str> {
        self.config.title.as_deref()
    }

    pub fn on_mouse_move(&self, event: &MouseEvent<'_>) {
        let Some(coordinator) = &self.coordinator else {
            return;
        };
        let rect = event.current_target.bounding_client_rect();
        let (canvas_x, canvas_y) = rect.to_canvas(event.client_x, event.client_y);

        if let Some(seconds) = coordinator.x_value_at_pixel(canvas_x) {
            let value = if self.config.x_axis_mode.is_timestamp() {
                HoverValue::PlaybackSeconds(seconds)
            } else {
                HoverValue::Other(seconds)
            };
            self.hover.set(HoverEntry {
                component_id: self.subscriber_id.clone(),
                value,
            });
        }

        self.request_tooltip(TooltipRequest {
            client_x: event.client_x,
            client_y: event.client_y,
            canvas_x,
            canvas_y,
        });
    }

    fn request_tooltip(&self, request: TooltipRequest) {
        let Some(build) = &self.build_tooltip else {
            return;
        };
        let Some(driver) = build.call(request) else {
            return;
        };
        let setter = self.set_active_tooltip.clone();
        let task = async move {
            let Some(Debounced { output, token }) = driver.await else {
                return;
            };
            if token.is_current() {
                setter(output);
            } else {
                trace!(generation = token.generation(), "stale tooltip dropped");
            }
        };
        if let Err(err) = self.spawner.spawn_local(task) {
            warn!(panel = %self.subscriber_id, "tooltip build not scheduled: {err}");
        }
    }

    /// Clears tooltip, hover entry and drag state. Safe to call repeatedly.
    pub fn on_mouse_out(&self) {
        if let Some(build) = &self.build_tooltip {
            build.invalidate();
        }
        (self.set_active_tooltip)(None);
        self.hover.clear(&self.subscriber_id);
        self.dragging.set(false);
    }

    pub fn on_wheel(&self, event: &WheelEvent<'_>) {
        let Some(coordinator) = &self.coordinator else {
            return;
        };
        let rect = event.current_target.bounding_client_rect();
        coordinator.add_interaction_event(InteractionEvent::wheel(event, rect));
        self.publish_bounds(coordinator.as_ref());
    }

    /// Forwards a drag step. `PanStart` and `PanEnd` also toggle the
    /// dragging flag.
    pub fn on_pan(
        &self,
        kind: InteractionKind,
        delta_x: f64,
        delta_y: f64,
        current_target: &dyn BoundingRectSource,
    ) {
        match kind {
            InteractionKind::PanStart => self.dragging.set(true),
            InteractionKind::PanEnd => self.dragging.set(false),
            _ => {}
        }
        let Some(coordinator) = &self.coordinator else {
            return;
        };
        let rect = current_target.bounding_client_rect();
        coordinator.add_interaction_event(InteractionEvent::pan(kind, delta_x, delta_y, rect));
        if kind != InteractionKind::PanEnd {
            self.publish_bounds(coordinator.as_ref());
        }
    }

    pub fn on_reset_view(&self) {
        let Some(coordinator) = &self.coordinator else {
            return;
        };
        coordinator.reset_bounds();
        if self.config.sync.should_sync {
            self.bounds_sync.clear();
        }
    }

    /// Returns true when the key is a zoom-mode binding.
    pub fn on_key_down(&self, key: Key) -> bool {
        let keys = self.config.zoom_keys;
        let mode = if key.matches(keys.y_axis) {
            ZoomMode::Y
        } else if key.matches(keys.both_axes) {
            ZoomMode::XY
        } else {
            return false;
        };
        if let Some(coordinator) = &self.coordinator {
            coordinator.set_zoom_mode(mode);
        }
        true
    }

    pub fn on_key_up(&self, key: Key) -> bool {
        let keys = self.config.zoom_keys;
        if !key.matches(keys.y_axis) && !key.matches(keys.both_axes) {
            return false;
        }
        if let Some(coordinator) = &self.coordinator {
            coordinator.set_zoom_mode(ZoomMode::X);
        }
        true
    }

    fn publish_bounds(&self, coordinator: &dyn Coordinator) {
        if !self.config.sync.should_sync {
            return;
        }
        if let Some(viewport) = coordinator.current_viewport() {
            self.bounds_sync.publish(SyncedBounds {
                source_id: self.subscriber_id.clone(),
                min: viewport.x.min,
                max: viewport.x.max,
            });
        }
    }

    /// Adopts x bounds another synced panel published. Returns true when
    /// bounds were applied.
    pub fn sync_from_shared(&self) -> bool {
        if !self.config.sync.should_sync {
            return false;
        }
        let (Some(coordinator), Some(bounds)) =
            (&self.coordinator, self.bounds_sync.foreign(&self.subscriber_id))
        else {
            return false;
        };
        debug!(panel = %self.subscriber_id, from = %bounds.source_id, "adopting synced bounds");
        coordinator.set_x_bounds(bounds.min, bounds.max);
        true
    }

    /// Where this panel should draw the shared hover cursor.
    pub fn cursor_x(&self) -> Option<f64> {
        self.hover
            .synced_cursor(&self.subscriber_id, self.config.x_axis_mode)
    }

    /// Detaches the panel: pending tooltip results are never applied and
    /// this panel's hover entry is removed.
    pub fn unmount(&self) {
        if let Some(build) = &self.build_tooltip {
            build.cancel_all();
        }
        self.hover.clear(&self.subscriber_id);
        self.dragging.set(false);
    }
}

impl Drop for PlotInteractionHandlers {
    fn drop(&mut self) {
        self.unmount();
    }
}
