//! Completion-handler front end over `HostClient`.
//!
//! # Design
//! `CallbackClient` builds the request on the calling thread, spawns
//! `HostClient::send` on a Tokio runtime, and hands the outcome to a
//! `CompletionContext`, which decides where the completion runs.
//! Request-building failures take the same route, so a completion never runs
//! before the method returns.
//!
//! `CallbackQueue` models a main-thread run loop: completions pile up in a
//! channel and run only when the owner of the matching `CallbackPump` drains
//! it.

use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::HostClient;
use crate::error::NetworkingError;
use crate::http::HttpMethod;
use crate::transport::{ReqwestTransport, Transport};

/// A completion ready to run on its context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where completions run.
pub trait CompletionContext: Send + Sync + 'static {
    fn dispatch(&self, job: Job);
}

/// Runs completions inline on the runtime task that performed the request,
/// so they execute on a runtime worker thread rather than the caller's.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl CompletionContext for Immediate {
    fn dispatch(&self, job: Job) {
        job();
    }
}

/// Sending half of a run-loop style completion queue.
#[derive(Debug, Clone)]
pub struct CallbackQueue {
    tx: mpsc::UnboundedSender<Job>,
}

/// Receiving half of a `CallbackQueue`; completions run on the thread that
/// drains it.
#[derive(Debug)]
pub struct CallbackPump {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl CallbackQueue {
    pub fn channel() -> (CallbackQueue, CallbackPump) {
        let (tx, rx) = mpsc::unbounded_channel();
        (CallbackQueue { tx }, CallbackPump { rx })
    }
}

impl CompletionContext for CallbackQueue {
    fn dispatch(&self, job: Job) {
        if self.tx.send(job).is_err() {
            debug!("callback pump dropped, discarding completion");
        }
    }
}

impl CallbackPump {
    /// Run every completion queued so far without waiting. Returns how many
    /// ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next completion and run it. Returns `false` once every
    /// `CallbackQueue` handle is gone and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run completions until every `CallbackQueue` handle is dropped.
    pub async fn run(&mut self) {
        while self.run_next().await {}
    }
}

/// `HostClient` wrapper that reports results through completion closures.
#[derive(Debug)]
pub struct CallbackClient<C, T = ReqwestTransport> {
    client: Arc<HostClient<T>>,
    context: Arc<C>,
    runtime: Handle,
}

impl<C, T> Clone for CallbackClient<C, T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            context: Arc::clone(&self.context),
            runtime: self.runtime.clone(),
        }
    }
}

impl<C, T> CallbackClient<C, T>
where
    C: CompletionContext,
    T: Transport + 'static,
{
    /// Spawn dispatches on `runtime` and deliver results through `context`.
    pub fn new(client: HostClient<T>, context: C, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            context: Arc::new(context),
            runtime,
        }
    }

    /// Same as `new`, spawning on the runtime of the current task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn on_current_runtime(client: HostClient<T>, context: C) -> Self {
        Self::new(client, context, Handle::current())
    }

    pub fn client(&self) -> &HostClient<T> {
        &self.client
    }

    pub fn request<R, B, F>(
        &self,
        method: HttpMethod,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(Result<R, NetworkingError>) + Send + 'static,
    {
        let request = self.client.build_request(method, route, params, body);
        let client = Arc::clone(&self.client);
        let context = Arc::clone(&self.context);

        self.runtime.spawn(async move {
            let result = match request {
                Ok(request) => client.send(request).await,
                Err(err) => Err(err),
            };
            context.dispatch(Box::new(move || completion(result)));
        })
    }

    /// Always issues `GET`.
    pub fn get<R, B, F>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(Result<R, NetworkingError>) + Send + 'static,
    {
        self.request(HttpMethod::Get, route, params, body, completion)
    }

    pub fn post<R, B, F>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(Result<R, NetworkingError>) + Send + 'static,
    {
        self.request(HttpMethod::Post, route, params, body, completion)
    }

    pub fn put<R, B, F>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(Result<R, NetworkingError>) + Send + 'static,
    {
        self.request(HttpMethod::Put, route, params, body, completion)
    }

    /// Same as [`CallbackClient::put`].
    pub fn update<R, B, F>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(Result<R, NetworkingError>) + Send + 'static,
    {
        self.put(route, params, body, completion)
    }

    pub fn delete<R, B, F>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(Result<R, NetworkingError>) + Send + 'static,
    {
        self.request(HttpMethod::Delete, route, params, body, completion)
    }
}
