//! Per-endpoint resource binding: `{data, loading, error}` plus mutations.
//!
//! DESIGN
//! ======
//! A binding owns one published [`ResourceState`] (a `watch` channel, so
//! views can await changes) and one bound endpoint. Every call through
//! [`ResourceBinding::fetch`] takes a new generation number; only the call
//! holding the latest generation may write `data`, `error` or `loading`. An
//! older call that resolves late still returns its result to its own caller
//! but leaves the published state alone.
//!
//! Generations are bumped and compared only inside the channel's write
//! closures, so taking a generation and raising `loading` is one write, and
//! checking the generation and settling `data`/`error`/`loading` is another.
//!
//! SOURCE MODE
//! ===========
//! The first network attempt decides where the binding reads from. Any
//! response at all makes it `Live`. A transport failure on a binding that
//! carries a [`DemoDataset`] switches it to `Demo`: from then on reads and
//! mutations are served from the local dataset until
//! [`ResourceBinding::reconnect`] is called.
//!
//! A successful mutation publishes its own payload as `data` (the created or
//! updated record, or the success sentinel). Mutations never refetch;
//! callers invoke [`ResourceBinding::refetch`] to reload the list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use records::Resource;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ApiError, RequestOutcome};
use crate::http::{self, HttpClient, Method};

/// Error text shown while a binding serves its demo dataset.
pub const DEMO_BANNER: &str = "could not reach the server; showing demo data";

/// Published state of a binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState {
    /// Payload of the last successful call. Kept across failures.
    pub data: Option<Value>,
    /// A call holding the latest generation is in flight.
    pub loading: bool,
    /// Message of the last failure, or the demo banner.
    pub error: Option<String>,
}

/// Where a binding's calls are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// No attempt has reached a verdict yet.
    #[default]
    Undecided,
    /// Calls go to the backend.
    Live,
    /// Calls are served by the local demo dataset.
    Demo,
}

/// Method and body for one [`ResourceBinding::fetch`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method, body: Option<Value>) -> Self {
        Self { method, body }
    }
}

// =============================================================================
// DEMO DATASET
// =============================================================================

/// Local stand-in for one REST collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoDataset {
    collection: String,
    id_field: String,
    records: Vec<Value>,
}

impl DemoDataset {
    /// Dataset for `collection` (e.g. `"/articulos/"`) keyed by `id_field`.
    #[must_use]
    pub fn new(collection: &str, id_field: &str, records: Vec<Value>) -> Self {
        Self { collection: collection.to_owned(), id_field: id_field.to_owned(), records }
    }

    /// The placeholder records of `R`.
    #[must_use]
    pub fn of<R: Resource>() -> Self {
        let records = R::demo_records()
            .iter()
            .filter_map(|record| serde_json::to_value(record).ok())
            .collect();
        Self::new(R::COLLECTION, R::ID_FIELD, records)
    }

    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn snapshot(&self) -> Value {
        Value::Array(self.records.clone())
    }

    fn id_of(&self, record: &Value) -> Option<i64> {
        record.get(&self.id_field).and_then(Value::as_i64)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|record| self.id_of(record) == Some(id))
    }

    /// Serve one call locally.
    ///
    /// Understood endpoints are the collection itself, its `todos/` listing,
    /// and `<collection><id>`. Anything else fails with 404.
    pub(crate) fn apply(&mut self, method: Method, url: &str, body: Option<&Value>) -> RequestOutcome {
        let Some(target) = self.parse_target(url) else {
            return Err(offline(404, format!("{url} is not available offline")));
        };
        match (method, target) {
            (Method::Get, Target::Collection) => Ok(self.snapshot()),
            (Method::Post, Target::Collection) => self.insert(body),
            (Method::Get, Target::Item(id)) => {
                let index = self.position(id).ok_or_else(|| not_found(id))?;
                Ok(self.records[index].clone())
            }
            (Method::Put, Target::Item(id)) => self.merge(id, body),
            (Method::Delete, Target::Item(id)) => {
                let index = self.position(id).ok_or_else(|| not_found(id))?;
                self.records.remove(index);
                Ok(http::success_sentinel())
            }
            (method, _) => Err(offline(405, format!("{method} {url} is not supported offline"))),
        }
    }

    fn parse_target(&self, url: &str) -> Option<Target> {
        let rest = url.strip_prefix(self.collection.as_str())?;
        match rest.trim_end_matches('/') {
            "" | "todos" => Some(Target::Collection),
            id => id.parse().ok().map(Target::Item),
        }
    }

    fn insert(&mut self, body: Option<&Value>) -> RequestOutcome {
        let mut record = object_body(body)?;
        let next_id = self.records.iter().filter_map(|r| self.id_of(r)).max().unwrap_or(0) + 1;
        record.insert(self.id_field.clone(), Value::from(next_id));
        let record = Value::Object(record);
        self.records.push(record.clone());
        Ok(record)
    }

    fn merge(&mut self, id: i64, body: Option<&Value>) -> RequestOutcome {
        let changes = object_body(body)?;
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        let id_field = self.id_field.clone();
        let record = &mut self.records[index];
        if let Value::Object(fields) = record {
            for (key, value) in changes {
                if key != id_field {
                    fields.insert(key, value);
                }
            }
        }
        Ok(record.clone())
    }
}

enum Target {
    Collection,
    Item(i64),
}

fn object_body(body: Option<&Value>) -> Result<Map<String, Value>, ApiError> {
    match body {
        Some(Value::Object(fields)) => Ok(fields.clone()),
        _ => Err(offline(400, "expected a JSON object body".to_owned())),
    }
}

fn not_found(id: i64) -> ApiError {
    offline(404, format!("record {id} not found"))
}

fn offline(status: u16, message: String) -> ApiError {
    ApiError::RequestFailed { status, message }
}

// =============================================================================
// BINDING
// =============================================================================

struct Source {
    endpoint: String,
    auto_fetch: bool,
    mode: SourceMode,
    demo: Option<DemoDataset>,
}

struct Inner {
    client: HttpClient,
    source: Mutex<Source>,
    state: watch::Sender<ResourceState>,
    generation: AtomicU64,
}

impl Inner {
    fn source(&self) -> MutexGuard<'_, Source> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Resets `loading` when a fetch future is dropped before it settles,
/// unless a newer fetch has taken over.
struct LoadingGuard<'a> {
    inner: &'a Inner,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.inner.state.send_if_modified(|state| {
            self.inner.is_latest(self.generation) && std::mem::replace(&mut state.loading, false)
        });
    }
}

/// Handle on one endpoint's data. Clones share state.
#[derive(Clone)]
pub struct ResourceBinding {
    inner: Arc<Inner>,
}

impl ResourceBinding {
    /// Binding on `endpoint` that has not fetched anything yet.
    #[must_use]
    pub fn new(client: HttpClient, endpoint: &str) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        let source = Source { endpoint: endpoint.to_owned(), auto_fetch: true, mode: SourceMode::Undecided, demo: None };
        Self {
            inner: Arc::new(Inner { client, source: Mutex::new(source), state, generation: AtomicU64::new(0) }),
        }
    }

    /// Attach a dataset to fall back to when the backend is unreachable.
    #[must_use]
    pub fn with_demo(self, dataset: DemoDataset) -> Self {
        self.inner.source().demo = Some(dataset);
        self
    }

    /// Record the auto-fetch policy and, when enabled, issue the initial GET.
    ///
    /// Returns the initial outcome, or `None` when auto-fetch is off.
    pub async fn start(self, auto_fetch: bool) -> (Self, Option<RequestOutcome>) {
        self.inner.source().auto_fetch = auto_fetch;
        let initial = if auto_fetch { Some(self.refetch().await) } else { None };
        (self, initial)
    }

    /// Bind `endpoint`, fetching it immediately when `auto_fetch` is set.
    pub async fn bind(client: HttpClient, endpoint: &str, auto_fetch: bool) -> (Self, Option<RequestOutcome>) {
        Self::new(client, endpoint).start(auto_fetch).await
    }

    /// Bind the list endpoint of `R`, with `R`'s demo dataset as fallback.
    pub async fn for_resource<R: Resource>(
        client: HttpClient,
        auto_fetch: bool,
    ) -> (Self, Option<RequestOutcome>) {
        Self::new(client, &R::list_endpoint())
            .with_demo(DemoDataset::of::<R>())
            .start(auto_fetch)
            .await
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        self.inner.source().endpoint.clone()
    }

    #[must_use]
    pub fn mode(&self) -> SourceMode {
        self.inner.source().mode
    }

    /// Snapshot of the published state.
    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified whenever the published state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResourceState> {
        self.inner.state.subscribe()
    }

    /// Decode the current `data` into `T`. `None` until a call succeeded.
    #[must_use]
    pub fn typed_data<T: DeserializeOwned>(&self) -> Option<RequestOutcome<T>> {
        self.state().data.map(http::decode)
    }

    /// Rebind to `endpoint`. Returns the refetch outcome when the endpoint
    /// changed and auto-fetch is on, `None` otherwise.
    pub async fn set_endpoint(&self, endpoint: &str) -> Option<RequestOutcome> {
        {
            let mut source = self.inner.source();
            if source.endpoint == endpoint {
                return None;
            }
            source.endpoint = endpoint.to_owned();
            if !source.auto_fetch {
                return None;
            }
        }
        Some(self.refetch().await)
    }

    /// Perform one call against `url` and settle the outcome.
    ///
    /// Any successful call replaces `data` with its payload; any failure
    /// replaces `error` and leaves `data` as it was. The outcome is returned
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`], after recording its message.
    pub async fn fetch(&self, url: &str, options: RequestOptions) -> RequestOutcome {
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });
        let _guard = LoadingGuard { inner: &self.inner, generation };

        let outcome = self.execute(url, &options).await;

        let demo = self.mode() == SourceMode::Demo;
        let published = self.inner.state.send_if_modified(|state| {
            if !self.inner.is_latest(generation) {
                return false;
            }
            match &outcome {
                Ok(value) => {
                    state.data = Some(value.clone());
                    state.error = demo.then(|| DEMO_BANNER.to_owned());
                }
                Err(e) => state.error = Some(e.to_string()),
            }
            state.loading = false;
            true
        });
        if !published {
            debug!(%url, generation, "discarding superseded result");
        }
        outcome
    }

    async fn execute(&self, url: &str, options: &RequestOptions) -> RequestOutcome {
        if self.mode() == SourceMode::Demo {
            return self.apply_demo(url, options);
        }

        let outcome = self.inner.client.request(options.method, url, options.body.as_ref()).await;

        let mut source = self.inner.source();
        match &outcome {
            Err(e) if e.is_transport() => {
                if source.mode == SourceMode::Undecided && source.demo.is_some() {
                    warn!(%url, error = %e, "backend unreachable; switching to demo data");
                    source.mode = SourceMode::Demo;
                    drop(source);
                    return self.apply_demo(url, options);
                }
            }
            _ => source.mode = SourceMode::Live,
        }
        outcome
    }

    fn apply_demo(&self, url: &str, options: &RequestOptions) -> RequestOutcome {
        let mut source = self.inner.source();
        match source.demo.as_mut() {
            Some(dataset) => dataset.apply(options.method, url, options.body.as_ref()),
            None => Err(ApiError::Transport("no demo dataset configured".to_owned())),
        }
    }

    /// Re-issue the GET for the bound endpoint.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn refetch(&self) -> RequestOutcome {
        let endpoint = self.endpoint();
        self.fetch(&endpoint, RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn post_data(&self, url: &str, body: Value) -> RequestOutcome {
        self.fetch(url, RequestOptions::new(Method::Post, Some(body))).await
    }

    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn put_data(&self, url: &str, body: Value) -> RequestOutcome {
        self.fetch(url, RequestOptions::new(Method::Put, Some(body))).await
    }

    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn delete_data(&self, url: &str) -> RequestOutcome {
        self.fetch(url, RequestOptions::new(Method::Delete, None)).await
    }

    /// Forget the demo verdict and try the backend again.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`]. If the backend is still unreachable the binding
    /// falls back to its demo dataset again, keeping local edits.
    pub async fn reconnect(&self) -> RequestOutcome {
        self.inner.source().mode = SourceMode::Undecided;
        info!(endpoint = %self.endpoint(), "retrying backend");
        self.refetch().await
    }
}

impl std::fmt::Debug for ResourceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (endpoint, mode) = {
            let source = self.inner.source();
            (source.endpoint.clone(), source.mode)
        };
        f.debug_struct("ResourceBinding")
            .field("endpoint", &endpoint)
            .field("mode", &mode)
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "resource_test.rs"]
mod tests;
