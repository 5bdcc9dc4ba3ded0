//! Background thread running a move source
//!
//! Requests and replies travel over channels, so the caller never blocks on the move source.
//! Each job waits for its presentational delay first, then asks the source. A job superseded by a
//! newer one, queued before it gets to the source, is skipped without a reply.

use crate::controller::{BotReply, BotRequest};
use crate::source::{self, MoveSource, SourceError};

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, warn};

struct Job {
    request: BotRequest,
    delay: Duration,
}

pub struct Worker {
    jobs: Option<Sender<Job>>,
    replies: Receiver<BotReply>,
    handle: Option<JoinHandle<()>>,
}

fn run<S: MoveSource>(mut source: S, jobs: Receiver<Job>, replies: Sender<BotReply>) {
    let mut next = None;
    loop {
        let mut job = match next.take() {
            Some(job) => job,
            None => match jobs.recv() {
                Ok(job) => job,
                Err(_) => break,
            },
        };
        // Only the newest request matters, older ones belong to abandoned games.
        while let Ok(newer) = jobs.try_recv() {
            debug!(epoch = job.request.epoch, "superseded job skipped");
            job = newer;
        }
        if !job.delay.is_zero() {
            match jobs.recv_timeout(job.delay) {
                Ok(newer) => {
                    debug!(epoch = job.request.epoch, "superseded job skipped");
                    next = Some(newer);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        let BotRequest { epoch, request } = job.request;
        let result = source::query(&mut source, &request);
        debug!(epoch, ?result, "move source answered");
        if replies.send(BotReply { epoch, result }).is_err() {
            break;
        }
    }
}

impl Worker {
    /// Starts a thread which serves requests with `source`
    pub fn spawn<S: MoveSource + 'static>(source: S) -> Worker {
        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();
        let handle = thread::spawn(move || run(source, job_rx, reply_tx));
        Worker {
            jobs: Some(job_tx),
            replies: reply_rx,
            handle: Some(handle),
        }
    }

    /// Queues a request, to be sent to the move source after `delay`
    pub fn submit(&self, request: BotRequest, delay: Duration) -> Result<(), SourceError> {
        let jobs = self.jobs.as_ref().ok_or(SourceError::NotReady)?;
        jobs.send(Job { request, delay }).map_err(|_| {
            warn!("move source thread is gone");
            SourceError::NotReady
        })
    }

    /// Returns a reply if one is ready, without blocking
    pub fn try_recv(&self) -> Option<BotReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Waits for a reply for at most `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BotReply> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the job channel stops the thread once the current job is done.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("move source thread panicked");
            }
        }
    }
}
