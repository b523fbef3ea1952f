//! Autosave coordinator.
//!
//! A single local task per editor session owns the debounce timer and the
//! backend writes. `schedule` hands it a snapshot of the canvas; the last
//! snapshot per canvas wins. When the timer expires the pending snapshots
//! are written one at a time, so there is never more than one write in
//! flight. Snapshots scheduled during a write are written as soon as it
//! finishes. Failures are reported through the status channel and never
//! retried.
//!
//! The coordinator uses `spawn_local`: create it from inside a
//! `tokio::task::LocalSet`.

use ic_core::{Canvas, CanvasBackend};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error(String),
}

enum Request {
    Schedule(Box<Canvas>),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

pub struct Autosave {
    requests: mpsc::UnboundedSender<Request>,
    status: Rc<watch::Sender<SaveStatus>>,
    task: JoinHandle<()>,
}

impl Autosave {
    pub fn spawn<B: CanvasBackend + 'static>(backend: Rc<B>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let status = Rc::new(watch::Sender::new(SaveStatus::Idle));
        let worker = Worker {
            backend,
            debounce,
            status: status.clone(),
            pending: Vec::new(),
            deadline: None,
        };
        let task = tokio::task::spawn_local(worker.run(rx));
        Self {
            requests: tx,
            status,
            task,
        }
    }

    /// Queue a save of `doc`, restarting the debounce timer.
    pub fn schedule(&self, doc: Canvas) {
        self.status.send_replace(SaveStatus::Saving);
        if self.requests.send(Request::Schedule(Box::new(doc))).is_err() {
            log::warn!("autosave: coordinator stopped, save dropped");
        }
    }

    /// Write everything pending now and wait for it.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.requests.send(Request::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Flush pending saves and stop the coordinator.
    pub async fn shutdown(self) {
        let _ = self.requests.send(Request::Shutdown);
        if let Err(e) = self.task.await {
            log::error!("autosave: coordinator panicked: {e}");
        }
    }
}

struct Worker<B> {
    backend: Rc<B>,
    debounce: Duration,
    status: Rc<watch::Sender<SaveStatus>>,
    /// Snapshots waiting for the timer, one per canvas, in schedule order.
    pending: Vec<Canvas>,
    deadline: Option<Instant>,
}

impl<B: CanvasBackend> Worker<B> {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Request>) {
        loop {
            let request = match self.deadline {
                Some(at) => tokio::select! {
                    req = rx.recv() => req,
                    _ = sleep_until(at) => {
                        self.deadline = None;
                        self.save_pending(&mut rx).await;
                        continue;
                    }
                },
                None => rx.recv().await,
            };
            match request {
                Some(Request::Schedule(doc)) => {
                    self.enqueue(*doc);
                    self.deadline = Some(Instant::now() + self.debounce);
                }
                Some(Request::Flush(done)) => {
                    self.deadline = None;
                    self.save_pending(&mut rx).await;
                    let _ = done.send(());
                }
                Some(Request::Shutdown) | None => {
                    self.save_pending(&mut rx).await;
                    break;
                }
            }
        }
        log::debug!("autosave: stopped");
    }

    fn enqueue(&mut self, doc: Canvas) {
        match self.pending.iter_mut().find(|c| c.id == doc.id) {
            Some(slot) => *slot = doc,
            None => self.pending.push(doc),
        }
    }

    /// Write pending snapshots one at a time. Anything scheduled while a
    /// write was in flight is written right after it.
    async fn save_pending(&mut self, rx: &mut mpsc::UnboundedReceiver<Request>) {
        let mut flushes = Vec::new();
        while !self.pending.is_empty() {
            let doc = self.pending.remove(0);
            self.status.send_replace(SaveStatus::Saving);
            log::debug!("autosave: writing {} ({} elements)", doc.id, doc.elements.len());
            let result = self.backend.update_canvas(&doc.id, &doc).await;

            while let Ok(req) = rx.try_recv() {
                match req {
                    Request::Schedule(doc) => self.enqueue(*doc),
                    Request::Flush(done) => flushes.push(done),
                    Request::Shutdown => rx.close(),
                }
            }
            match result {
                Ok(_) if self.pending.is_empty() => {
                    self.status.send_replace(SaveStatus::Saved);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("autosave: saving {} failed: {e}", doc.id);
                    self.status.send_replace(SaveStatus::Error(e.to_string()));
                }
            }
        }
        for done in flushes {
            let _ = done.send(());
        }
    }
}
