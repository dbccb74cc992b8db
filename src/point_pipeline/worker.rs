//! Background colormap computation with generation-token supersession.
//!
//! Transform applies are synchronous, but the O(N) color derivation runs on
//! a dedicated worker thread per sensor. Each apply takes a fresh token; a
//! finished colormap is committed only if its token is still current, so a
//! stale result computed against an outdated displayed cloud is discarded
//! rather than published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tracing::debug;

use crate::point_pipeline::colormap::{self, ColorBuffer};
use crate::point_pipeline::common::cloud::PointCloud;

/// Committed (displayed cloud, color buffer) pair, published as one unit.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub generation: u64,
    pub cloud: PointCloud,
    pub colors: ColorBuffer,
}

/// Per-sensor publication slot guarded by a generation counter.
///
/// `next_generation` invalidates every outstanding colormap job; `commit`
/// swaps in a whole frame at once, so a reader never observes a cloud
/// paired with a buffer from another apply.
#[derive(Debug, Default)]
pub struct FrameSlot {
    generation: AtomicU64,
    frame: Mutex<Option<Arc<RenderFrame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the token for a new apply request, invalidating all prior
    /// tokens. Serialized against `commit` via the frame lock so a commit
    /// in flight either finishes under the old token or observes the new
    /// one, never a mix.
    pub fn next_generation(&self) -> u64 {
        let _guard = self.frame.lock().expect("frame slot poisoned");
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Publishes a frame if its token is still current. Returns whether the
    /// frame was committed; a stale frame is dropped silently.
    pub fn commit(&self, frame: RenderFrame) -> bool {
        let mut slot = self.frame.lock().expect("frame slot poisoned");
        if frame.generation != self.generation.load(Ordering::SeqCst) {
            debug!(
                "Discarding stale colormap result (generation {} behind {})",
                frame.generation,
                self.generation.load(Ordering::SeqCst)
            );
            return false;
        }
        *slot = Some(Arc::new(frame));
        true
    }

    /// Most recently committed frame, if any.
    pub fn latest(&self) -> Option<Arc<RenderFrame>> {
        self.frame.lock().expect("frame slot poisoned").clone()
    }
}

struct Job {
    generation: u64,
    cloud: PointCloud,
}

/// Dedicated colormap thread for one sensor.
///
/// Jobs arrive over a channel; before computing, the worker drains the
/// queue to the newest pending job, so at most one colormap runs per
/// sensor at a time and superseded requests are skipped entirely.
pub struct ColormapWorker {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl ColormapWorker {
    pub fn spawn(name: &str, slot: Arc<FrameSlot>) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = std::thread::Builder::new()
            .name(format!("colormap-{name}"))
            .spawn(move || {
                while let Ok(mut job) = receiver.recv() {
                    while let Ok(newer) = receiver.try_recv() {
                        job = newer;
                    }
                    let colors = colormap::generate(&job.cloud);
                    slot.commit(RenderFrame {
                        generation: job.generation,
                        cloud: job.cloud,
                        colors,
                    });
                }
            })
            .expect("failed to spawn colormap worker thread");

        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Queues a colormap job for the displayed cloud produced under
    /// `generation`.
    pub fn submit(&self, generation: u64, cloud: PointCloud) {
        if let Some(sender) = &self.sender {
            // The worker only disappears on drop, so a send failure here
            // means shutdown is already underway.
            let _ = sender.send(Job { generation, cloud });
        }
    }
}

impl Drop for ColormapWorker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
