//! A bounded pool of background build workers.
//!
//! Each worker is an OS thread with a private job channel; completed
//! builds come back over one shared reply channel. The pool tracks three
//! disjoint worker sets — available, busy, finished — that only the
//! controlling thread mutates, through the explicit transitions
//! [`dispatch`](WorkerPool::dispatch), [`complete`](WorkerPool::complete)
//! and [`reintegrate`](WorkerPool::reintegrate). Their union is constant
//! and equal to the configured worker count.

use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::generator::generate_chunk_geometry;
use crate::task::{BuildPayload, ChunkVertexData};

struct WorkerJob {
    job_id: u64,
    payload: BuildPayload,
}

/// A completed build delivered back to the controlling thread.
pub struct WorkerReply {
    /// Index of the worker that produced the result.
    pub worker: usize,
    /// The job id passed to [`WorkerPool::dispatch`].
    pub job_id: u64,
    /// The generated buffers.
    pub data: ChunkVertexData,
}

/// Fixed-size pool of build workers.
pub struct WorkerPool {
    job_senders: Vec<Sender<WorkerJob>>,
    reply_receiver: Receiver<WorkerReply>,
    available: Vec<usize>,
    busy: Vec<usize>,
    finished: Vec<usize>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `worker_count` build workers.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` is zero or a worker thread cannot be
    /// spawned.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        assert!(worker_count > 0, "worker pool needs at least one worker");

        let (reply_sender, reply_receiver) = crossbeam_channel::unbounded::<WorkerReply>();
        let mut job_senders = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);

        for worker in 0..worker_count {
            let (job_sender, job_receiver) = crossbeam_channel::unbounded::<WorkerJob>();
            let replies = reply_sender.clone();

            let handle = std::thread::Builder::new()
                .name(format!("chunk-build-{worker}"))
                .spawn(move || {
                    while let Ok(job) = job_receiver.recv() {
                        let data = generate_chunk_geometry(&job.payload);
                        if replies
                            .send(WorkerReply {
                                worker,
                                job_id: job.job_id,
                                data,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                })
                .expect("failed to spawn chunk build worker");

            job_senders.push(job_sender);
            handles.push(handle);
        }

        Self {
            job_senders,
            reply_receiver,
            available: (0..worker_count).collect(),
            busy: Vec::with_capacity(worker_count),
            finished: Vec::with_capacity(worker_count),
            handles,
        }
    }

    /// Worker count leaving headroom for the controlling thread and one
    /// other concurrent subsystem: `cpus − 2`, at least 1.
    #[must_use]
    pub fn default_worker_count() -> usize {
        num_cpus::get().saturating_sub(2).max(1)
    }

    /// Whether a worker is free to take a job this tick.
    #[must_use]
    pub fn has_available(&self) -> bool {
        !self.available.is_empty()
    }

    /// Hand a job to an available worker, moving it to the busy set.
    ///
    /// Returns `false` without consuming anything if no worker is
    /// available; the caller leaves the task queued for a later tick.
    pub fn dispatch(&mut self, job_id: u64, payload: BuildPayload) -> bool {
        let Some(worker) = self.available.pop() else {
            return false;
        };
        self.job_senders[worker]
            .send(WorkerJob { job_id, payload })
            .expect("build worker exited while pool is alive");
        self.busy.push(worker);
        true
    }

    /// Collect every reply posted since the last tick, moving each
    /// worker from busy to finished.
    #[must_use]
    pub fn drain_replies(&mut self) -> Vec<WorkerReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.reply_receiver.try_recv() {
            self.complete(reply.worker);
            replies.push(reply);
        }
        replies
    }

    /// Move one worker from the busy set to the finished set.
    ///
    /// # Panics
    ///
    /// Panics if the worker is not busy — a reply for a worker that was
    /// never dispatched means the pool's bookkeeping is broken.
    pub fn complete(&mut self, worker: usize) {
        let position = self
            .busy
            .iter()
            .position(|&w| w == worker)
            .unwrap_or_else(|| panic!("worker {worker} completed but was not busy"));
        self.busy.swap_remove(position);
        self.finished.push(worker);
    }

    /// Return every finished worker to the available set.
    pub fn reintegrate(&mut self) {
        self.available.append(&mut self.finished);
    }

    /// Total number of workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.job_senders.len()
    }

    /// Workers currently free.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Workers currently computing a job.
    #[must_use]
    pub fn busy_count(&self) -> usize {
        self.busy.len()
    }

    /// Workers done but not yet reintegrated.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.finished.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the job channels ends each worker's recv loop.
        self.job_senders.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
