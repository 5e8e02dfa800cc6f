//! The chunk forge: per-tick scheduler between the quadtrees and the
//! worker pool.
//!
//! Build tasks flow queue → worker → apply queue → chunk; delete tasks are
//! grouped behind the build that precedes them and resolve through the
//! deferred-deletion list only once every replacement chunk is usable.
//! Everything here runs on the controlling thread.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::chunk::PlanetChunk;
use crate::task::{ApplyTask, BuildTask, DeleteTask, ForgeTask};
use crate::worker_pool::WorkerPool;

struct PendingBuild {
    chunk: Arc<PlanetChunk>,
    callbacks: Vec<DeleteTask>,
}

/// Scheduler turning queued build requests into applied chunk geometry.
pub struct ChunkForge {
    pool: WorkerPool,
    task_queue: VecDeque<ForgeTask>,
    /// Builds dispatched to a worker, keyed by job id.
    pending: HashMap<u64, PendingBuild>,
    apply_queue: VecDeque<ApplyTask>,
    /// Deferred-deletion groups waiting for their replacements.
    trash: Vec<DeleteTask>,
    next_job_id: u64,
    max_applies_per_tick: usize,
}

impl ChunkForge {
    /// Create a forge with the given number of build workers.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        Self {
            pool: WorkerPool::new(worker_count),
            task_queue: VecDeque::new(),
            pending: HashMap::new(),
            apply_queue: VecDeque::new(),
            trash: Vec::new(),
            next_job_id: 0,
            max_applies_per_tick: 1,
        }
    }

    /// Create a forge sized for this machine
    /// ([`WorkerPool::default_worker_count`]).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(WorkerPool::default_worker_count())
    }

    /// Raise the per-tick apply budget.
    ///
    /// # Panics
    ///
    /// Panics if `max_applies` is zero.
    pub fn set_max_applies_per_tick(&mut self, max_applies: usize) {
        assert!(max_applies > 0, "apply budget must be at least 1");
        self.max_applies_per_tick = max_applies;
    }

    /// Enqueue a build or delete task.
    ///
    /// Delete tasks must follow the builds of their replacement chunks;
    /// the trees uphold this by creating chunks (which submit builds)
    /// before requesting the deletion of what they replace.
    pub fn add_task(&mut self, task: ForgeTask) {
        self.task_queue.push_back(task);
    }

    /// One scheduler tick: dispatch queued builds to available workers,
    /// collect finished builds, apply a bounded number of results, and
    /// resolve deferred deletions whose replacements are usable.
    ///
    /// Never blocks; work that finds no worker simply stays queued.
    pub fn update(&mut self) {
        self.dispatch_queued();
        self.collect_replies();
        self.pool.reintegrate();
        self.apply_next();
        self.empty_trash();
    }

    fn dispatch_queued(&mut self) {
        loop {
            match self.task_queue.front() {
                None => break,
                Some(ForgeTask::Delete(_)) => {
                    let Some(ForgeTask::Delete(task)) = self.task_queue.pop_front() else {
                        unreachable!("front was just observed to be a delete task");
                    };
                    // Delete tasks only exist as callbacks behind a build;
                    // one at the head of the queue is a protocol violation.
                    // It still resolves through the deferred list so no
                    // chunk leaks, but no work happens for it.
                    tracing::error!(
                        old_chunks = task.old_chunks.len(),
                        "solitary delete task dequeued without a preceding build"
                    );
                    self.trash.push(task);
                }
                Some(ForgeTask::Build(_)) => {
                    if !self.pool.has_available() {
                        break;
                    }
                    let Some(ForgeTask::Build(build)) = self.task_queue.pop_front() else {
                        unreachable!("front was just observed to be a build task");
                    };
                    self.dispatch_build(build);
                }
            }
        }
    }

    /// Dispatch one build, attaching any immediately-following delete
    /// tasks as its callbacks. This groups "replace X with Y" into one
    /// atomic hand-off.
    fn dispatch_build(&mut self, build: BuildTask) {
        let mut callbacks = Vec::new();
        while matches!(self.task_queue.front(), Some(ForgeTask::Delete(_))) {
            if let Some(ForgeTask::Delete(delete)) = self.task_queue.pop_front() {
                callbacks.push(delete);
            }
        }

        let BuildTask { payload, chunk } = build;
        let job_id = self.next_job_id;
        self.next_job_id += 1;

        tracing::trace!(chunk = %chunk, job_id, "dispatching build");
        let dispatched = self.pool.dispatch(job_id, payload);
        debug_assert!(dispatched, "dispatch_queued checked for an available worker");
        self.pending.insert(job_id, PendingBuild { chunk, callbacks });
    }

    fn collect_replies(&mut self) {
        for reply in self.pool.drain_replies() {
            let Some(pending) = self.pending.remove(&reply.job_id) else {
                tracing::error!(job_id = reply.job_id, "reply for unknown build job");
                continue;
            };
            self.apply_queue.push_back(ApplyTask {
                data: reply.data,
                chunk: pending.chunk,
                callbacks: pending.callbacks,
            });
        }
    }

    fn apply_next(&mut self) {
        let mut applied = 0;
        while applied < self.max_applies_per_tick {
            let Some(task) = self.apply_queue.pop_front() else {
                break;
            };
            if task.chunk.is_disposed() {
                // The chunk was retired (its replacement became usable)
                // while this build was still in flight; the result is
                // stale and harmless. Its callbacks still count.
                tracing::debug!(chunk = %task.chunk, "discarding build result for retired chunk");
                self.trash.extend(task.callbacks);
                continue;
            }
            task.chunk.apply_vertex_data(&task.data);
            tracing::trace!(
                chunk = %task.chunk,
                vertices = task.data.vertex_count(),
                "applied vertex data"
            );
            self.trash.extend(task.callbacks);
            applied += 1;
        }
    }

    /// Resolve deferred-deletion groups.
    ///
    /// A group is settled once every replacement chunk either has vertex
    /// data or has itself been replaced. Resolution enables the new chunks
    /// first, then hides and disposes the old — the swap happens within
    /// one tick, so the covered area never goes dark.
    fn empty_trash(&mut self) {
        let groups = std::mem::take(&mut self.trash);
        for group in groups {
            let settled = group
                .new_chunks
                .iter()
                .all(|chunk| chunk.has_vertex_data() || chunk.is_disposed());
            if !settled {
                self.trash.push(group);
                continue;
            }

            for chunk in &group.new_chunks {
                if !chunk.is_disposed() {
                    chunk.set_ready(true);
                }
            }
            for old in &group.old_chunks {
                if !old.is_disposed() {
                    old.set_ready(false);
                    old.dispose();
                    tracing::trace!(chunk = %old, "disposed replaced chunk");
                }
            }
        }
    }

    /// Tasks still waiting in the queue.
    #[must_use]
    pub fn queued_task_count(&self) -> usize {
        self.task_queue.len()
    }

    /// Builds currently running on a worker.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.pending.len()
    }

    /// Completed builds waiting for their apply slot.
    #[must_use]
    pub fn pending_apply_count(&self) -> usize {
        self.apply_queue.len()
    }

    /// Deferred-deletion groups not yet resolved.
    #[must_use]
    pub fn pending_deletion_groups(&self) -> usize {
        self.trash.len()
    }

    /// Number of build workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    /// Whether the forge has no queued, running, or unapplied work left.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.task_queue.is_empty()
            && self.pending.is_empty()
            && self.apply_queue.is_empty()
            && self.trash.is_empty()
    }
}
