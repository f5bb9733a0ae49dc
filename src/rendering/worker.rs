use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eyre::{eyre, Result, WrapErr};
use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use super::{paint_frame, DrawCommand, DrawSurface, RenderedFrame, Renderer};
use crate::data_types::HoverElement;

enum RenderMessage {
    Draw(DrawCommand),
    HitTest {
        x: f64,
        y: f64,
        reply: oneshot::Sender<Vec<HoverElement>>,
    },
    Shutdown,
}

/// Renderer running on its own thread. The interactive thread only sends
/// messages; hit tests come back through a oneshot channel.
pub struct WorkerRenderer {
    tx: Sender<RenderMessage>,
    presented: Arc<RwLock<Arc<RenderedFrame>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerRenderer {
    pub fn spawn<S: DrawSurface + 'static>(surface: S) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let presented = Arc::new(RwLock::new(Arc::new(RenderedFrame::empty())));
        let worker_presented = presented.clone();
        let handle = std::thread::Builder::new()
            .name("plot-render".into())
            .spawn(move || run_worker(surface, rx, worker_presented))
            .wrap_err("failed to spawn render worker")?;
        info!("render worker started");
        Ok(Self {
            tx,
            presented,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Last frame the worker put on screen.
    pub fn presented_frame(&self) -> Arc<RenderedFrame> {
        self.presented.read().clone()
    }

    /// Stops the worker after it finishes the message in progress.
    pub fn shutdown(&self) -> Result<()> {
        let Some(handle) = self.handle.lock().take() else {
            return Ok(());
        };
        // The worker may already be gone; joining reports that.
        let _ = self.tx.send(RenderMessage::Shutdown);
        handle
            .join()
            .map_err(|_| eyre!("render worker panicked"))?;
        info!("render worker stopped");
        Ok(())
    }
}

impl Drop for WorkerRenderer {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("{err:#}");
        }
    }
}

impl Renderer for WorkerRenderer {
    fn draw(&self, command: DrawCommand) {
        if self.tx.send(RenderMessage::Draw(command)).is_err() {
            debug!("draw dropped, render worker stopped");
        }
    }

    fn elements_at_pixel(&self, pixel_x: f64, pixel_y: f64) -> BoxFuture<'static, Vec<HoverElement>> {
        let (reply, rx) = oneshot::channel();
        let msg = RenderMessage::HitTest {
            x: pixel_x,
            y: pixel_y,
            reply,
        };
        if self.tx.send(msg).is_err() {
            return future::ready(Vec::new()).boxed();
        }
        async move { rx.await.unwrap_or_default() }.boxed()
    }
}

fn answer(presented: &RwLock<Arc<RenderedFrame>>, x: f64, y: f64, reply: oneshot::Sender<Vec<HoverElement>>) {
    let frame = presented.read().clone();
    // The requester may have gone away; nothing to report then.
    let _ = reply.send(frame.hit_test(x, y));
}

fn run_worker<S: DrawSurface>(
    mut surface: S,
    rx: Receiver<RenderMessage>,
    presented: Arc<RwLock<Arc<RenderedFrame>>>,
) {
    while let Ok(msg) = rx.recv() {
        let mut command = match msg {
            RenderMessage::Draw(command) => command,
            RenderMessage::HitTest { x, y, reply } => {
                answer(&presented, x, y, reply);
                continue;
            }
            RenderMessage::Shutdown => return,
        };

        // Only the newest queued draw is worth painting. Hit tests found on
        // the way are answered against the frame still on screen.
        let mut stop = false;
        loop {
            match rx.try_recv() {
                Ok(RenderMessage::Draw(newer)) => {
                    if newer.generation > command.generation {
                        trace!(skipped = command.generation, "coalesced draw");
                        command = newer;
                    }
                }
                Ok(RenderMessage::HitTest { x, y, reply }) => answer(&presented, x, y, reply),
                Ok(RenderMessage::Shutdown) => {
                    stop = true;
                    break;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if command.generation > presented.read().generation {
            let frame = Arc::new(RenderedFrame::build(&command));
            paint_frame(&mut surface, &frame);
            *presented.write() = frame;
            trace!(generation = command.generation, "frame presented");
        } else {
            trace!(generation = command.generation, "stale frame dropped");
        }

        if stop {
            return;
        }
    }
}
