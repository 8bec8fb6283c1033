//! # Hashmux
//!
//! A URL hash router for single-page applications with support for:
//! - Literal routes (`/about`)
//! - Named parameters (`/users/{id}`)
//! - Inline patterns (`/search/{q:[a-z]+}`)
//! - Open-ended routes (`/files/` also matches `/files/a/b`)
//! - Multi-valued query parameters (`?tag=a&tag=b`)
//! - Status-code error handlers and pre/post-handle hooks
//!
//! ## Dispatch
//!
//! Routes are tried in registration order and the first match wins. The
//! matched handler receives the decoded [`Params`] and the [`Query`]. A
//! handler returning a JSON object with a `status` other than `200` is
//! routed to the error handler for that status.
//!
//! ## Hosts
//!
//! The router never touches global state. It reads and writes the hash
//! through a [`Location`](location::Location) and is driven by the host's
//! navigation events. [`MemoryLocation`](location::MemoryLocation) runs
//! everything headless; the `web` feature provides the browser host.
//!
//! ## Example
//!
//! ```
//! use hashmux::location::MemoryLocation;
//! use hashmux::Hashmux;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let location = Rc::new(MemoryLocation::new("#/users/42"));
//! let mut router = Hashmux::new(Rc::clone(&location));
//!
//! let seen = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&seen);
//! router
//!     .handle("/users/{id}", move |params, _query| {
//!         *sink.borrow_mut() = params.get("id").map(str::to_string);
//!         None
//!     })
//!     .unwrap();
//!
//! router.listen();
//! assert_eq!(seen.borrow().as_deref(), Some("42"));
//! ```

use std::fmt;

use serde_json::{json, Value};
use tracing::{debug, trace, warn};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
mod error;
pub mod location;
mod params;
pub mod path;
mod query;
pub mod route;
pub mod status;
#[cfg(feature = "web")]
pub mod web;

pub use config::{RedirectRule, RouterConfig};
pub use error::{Result, RouterError};
pub use location::{ChangeSource, Location, MemoryLocation};
pub use params::{CaptureKey, Params};
pub use query::Query;
pub use route::{Action, Capture, CompiledMatcher, CompiledPattern, SegmentMatcher};
pub use status::{ErrorHandler, ErrorTable};

use path::{encode_component, normalize_fragment, page_name, segments, split_query, to_hash};
use status::{FALLBACK, NOT_FOUND, OK};

// ============================================================================
// Core Types
// ============================================================================

/// Route handler receiving the captured params and the query
///
/// Returning a JSON object with a `status` other than `200` routes the
/// object, with the current `page` added, to the error handler for that
/// status.
pub type Handler = Box<dyn Fn(&Params, &Query) -> Option<Value>>;

/// Hook run before a matched handler; returning `true` vetoes the navigation
///
/// The path is passed without the leading `#` or the query (`"/user/5"`).
pub type PreHandle = Box<dyn Fn(&str, &Params) -> bool>;

/// Hook run after a handler; returning `true` skips status inspection
///
/// The path is passed without the leading `#` or the query (`"/user/5"`).
pub type PostHandle = Box<dyn Fn(&str, &Params, Option<&Value>) -> bool>;

/// Where a redirect route sends the user
pub enum RedirectTarget {
    /// Target path; `{name}` is replaced by the captured value of `name`
    Path(String),
    /// Target computed from the captured params
    Computed(Box<dyn Fn(&Params) -> String>),
}

impl RedirectTarget {
    /// Resolves the target path for the captured params
    ///
    /// # Examples
    ///
    /// ```
    /// use hashmux::{CaptureKey, Params, RedirectTarget};
    ///
    /// let mut params = Params::new();
    /// params.insert(CaptureKey::from("slug"), "hello world");
    ///
    /// let target = RedirectTarget::from("/articles/{slug}");
    /// assert_eq!(target.resolve(&params), "/articles/hello%20world");
    /// ```
    pub fn resolve(&self, params: &Params) -> String {
        match self {
            RedirectTarget::Path(target) => {
                params
                    .iter()
                    .fold(target.clone(), |acc, (key, value)| match key {
                        CaptureKey::Named(name) => {
                            acc.replace(&format!("{{{}}}", name), &encode_component(value))
                        }
                        CaptureKey::Index(_) => acc,
                    })
            }
            RedirectTarget::Computed(compute) => compute(params),
        }
    }
}

impl From<&str> for RedirectTarget {
    fn from(target: &str) -> Self {
        RedirectTarget::Path(target.to_string())
    }
}

impl From<String> for RedirectTarget {
    fn from(target: String) -> Self {
        RedirectTarget::Path(target)
    }
}

impl fmt::Debug for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectTarget::Path(target) => f.debug_tuple("Path").field(target).finish(),
            RedirectTarget::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ============================================================================
// Router Implementation
// ============================================================================

/// Hash router dispatching navigation events to registered handlers
///
/// The router keeps:
/// - Routes in registration order (first match wins, never re-sorted)
/// - Error handlers keyed by status code
/// - The last accepted hash, restored when a pre-handle hook vetoes
/// - A one-shot flag that skips the navigation event caused by that restore
pub struct Hashmux<L: Location> {
    location: L,
    handlers: Vec<CompiledMatcher>,
    errors: ErrorTable,
    last_accepted: String,
    ignore_update: bool,
    pre_handle: Option<PreHandle>,
    post_handle: Option<PostHandle>,
    case_sensitive: bool,
    max_redirects: usize,
}

impl<L: Location> Hashmux<L> {
    /// Creates a router on `location` with default settings (case-insensitive)
    pub fn new(location: L) -> Self {
        Self::with_settings(location, &RouterConfig::default())
    }

    /// Creates a router from a configuration, registering its redirect routes
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when a redirect source does not
    /// compile.
    pub fn with_config(location: L, config: &RouterConfig) -> Result<Self> {
        let mut router = Self::with_settings(location, config);
        for rule in &config.redirects {
            let case_sensitive = rule.case_sensitive.unwrap_or(config.case_sensitive);
            router.handle_redirect(&rule.from, rule.to.as_str(), case_sensitive)?;
        }
        Ok(router)
    }

    fn with_settings(location: L, config: &RouterConfig) -> Self {
        let last_accepted = location.current();
        Self {
            location,
            handlers: Vec::new(),
            errors: ErrorTable::new(),
            last_accepted,
            ignore_update: false,
            pre_handle: None,
            post_handle: None,
            case_sensitive: config.case_sensitive,
            max_redirects: config.max_redirects,
        }
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Registered routes in matching order
    pub fn routes(&self) -> &[CompiledMatcher] {
        &self.handlers
    }

    pub fn errors(&self) -> &ErrorTable {
        &self.errors
    }

    /// Hash of the most recently dispatched route, without its query
    pub fn last_accepted(&self) -> &str {
        &self.last_accepted
    }

    /// Whether the next navigation event will be skipped
    pub fn is_ignoring_update(&self) -> bool {
        self.ignore_update
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a handler for `template` with the router's default case
    /// sensitivity
    ///
    /// An empty template registers the root `/`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when an inline pattern does not
    /// compile.
    pub fn handle<F>(&mut self, template: &str, handler: F) -> Result<()>
    where
        F: Fn(&Params, &Query) -> Option<Value> + 'static,
    {
        self.handle_with(template, Some(Box::new(handler)), self.case_sensitive)
    }

    /// Registers a handler with explicit case sensitivity
    ///
    /// A missing handler is replaced by a stub that logs the template, so
    /// registration only fails on an invalid inline pattern.
    pub fn handle_with(
        &mut self,
        template: &str,
        handler: Option<Handler>,
        case_sensitive: bool,
    ) -> Result<()> {
        let template = if template.is_empty() { "/" } else { template };
        let handler = handler.unwrap_or_else(|| missing_handler(template));
        let pattern = route::compile(template, case_sensitive)?;

        trace!(template, case_sensitive, "Registered route");
        self.handlers.push(CompiledMatcher::new(pattern, handler));
        Ok(())
    }

    /// Appends a pre-built matcher without compiling a template
    pub fn handle_raw(&mut self, matcher: CompiledMatcher) {
        self.handlers.push(matcher);
    }

    /// Registers a route that replaces the hash with `target`
    ///
    /// The replacement creates no history entry. The new hash is dispatched
    /// in the same navigation event.
    pub fn handle_redirect(
        &mut self,
        template: &str,
        target: impl Into<RedirectTarget>,
        case_sensitive: bool,
    ) -> Result<()> {
        let template = if template.is_empty() { "/" } else { template };
        let pattern = route::compile(template, case_sensitive)?;
        let target = target.into();

        trace!(template, ?target, "Registered redirect");
        self.handlers.push(CompiledMatcher::redirect(pattern, target));
        Ok(())
    }

    /// Registers the handler for an error status; `520` replaces the fallback
    pub fn handle_error<F>(&mut self, code: u16, handler: F)
    where
        F: Fn(&Value) + 'static,
    {
        self.errors.insert(code, Box::new(handler));
    }

    /// Sets the hook run before each matched handler
    pub fn on_pre_handle<F>(&mut self, hook: F)
    where
        F: Fn(&str, &Params) -> bool + 'static,
    {
        self.pre_handle = Some(Box::new(hook));
    }

    /// Sets the hook run after each handler
    pub fn on_post_handle<F>(&mut self, hook: F)
    where
        F: Fn(&str, &Params, Option<&Value>) -> bool + 'static,
    {
        self.post_handle = Some(Box::new(hook));
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Runs the handler for `code`, or the `520` fallback
    pub fn error(&self, code: u16, data: &Value) {
        debug!(code, handled = self.errors.contains(code), "Dispatching error");
        self.errors.dispatch(code, data);
    }

    /// Replaces the current hash without creating a history entry
    pub fn redirect(&self, fragment: &str) {
        self.location.replace(&to_hash(fragment));
    }

    /// Dispatches the current hash once
    ///
    /// Called for every navigation event. Redirect routes are followed up to
    /// the configured limit within the same call.
    pub fn update(&mut self) {
        if self.ignore_update {
            self.ignore_update = false;
            debug!("Skipped navigation caused by a vetoed update");
            return;
        }

        let mut redirects = 0;
        while self.dispatch() {
            redirects += 1;
            if redirects > self.max_redirects {
                warn!(
                    hash = %self.location.current(),
                    limit = self.max_redirects,
                    "Redirect limit reached"
                );
                break;
            }
        }
    }

    /// Dispatches the hash active at call time
    ///
    /// The host is expected to call [`update`](Self::update) on every
    /// navigation event after this.
    pub fn listen(&mut self) {
        debug!(hash = %self.location.current(), "Listening for navigation");
        self.update();
    }

    /// Runs one dispatch cycle; returns `true` when a redirect replaced the hash
    fn dispatch(&mut self) -> bool {
        let raw = self.location.current();
        let fragment = normalize_fragment(&raw);
        let (path, query_string) = split_query(fragment);
        let query = query_string
            .map(Query::from_query_string)
            .unwrap_or_default();
        let parts = segments(path);

        let selected = self
            .handlers
            .iter()
            .find_map(|matcher| matcher.handle(&parts).map(|params| (matcher, params)));

        let Some((matcher, params)) = selected else {
            debug!(path, "No route matched");
            self.error(NOT_FOUND, &json!({ "page": page_name(path) }));
            return false;
        };

        if let Some(pre_handle) = &self.pre_handle {
            if pre_handle(path, &params) {
                debug!(path, restore = %self.last_accepted, "Navigation vetoed");
                if raw != self.last_accepted {
                    self.ignore_update = true;
                    self.location.assign(&self.last_accepted);
                }
                return false;
            }
        }

        let hash = to_hash(path);
        debug!(path, params = params.len(), "Dispatching route");

        let output = match matcher.action() {
            Action::Call(handler) => handler(&params, &query),
            Action::Redirect(target) => {
                let target = to_hash(&target.resolve(&params));
                debug!(from = %hash, to = %target, "Redirecting");
                self.location.replace(&target);
                self.last_accepted = hash;
                if let Some(post_handle) = &self.post_handle {
                    post_handle(path, &params, None);
                }
                return true;
            }
        };
        self.last_accepted = hash;

        if let Some(post_handle) = &self.post_handle {
            if post_handle(path, &params, output.as_ref()) {
                return false;
            }
        }

        if let Some(Value::Object(mut data)) = output {
            data.insert("page".to_string(), Value::from(page_name(path)));
            if let Some(code) = data.get("status").and_then(error_code) {
                self.error(code, &Value::Object(data));
            }
        }
        false
    }
}

impl<L: Location + ChangeSource> Hashmux<L> {
    /// Runs [`update`](Self::update) once for every pending navigation event
    ///
    /// Events raised while dispatching, such as the restore after a veto, are
    /// drained too. Returns the number of events consumed.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while self.location.take_change() {
            self.update();
            count += 1;
        }
        count
    }
}

impl<L: Location + fmt::Debug> fmt::Debug for Hashmux<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hashmux")
            .field("location", &self.location)
            .field("handlers", &self.handlers)
            .field("errors", &self.errors)
            .field("last_accepted", &self.last_accepted)
            .field("ignore_update", &self.ignore_update)
            .field("case_sensitive", &self.case_sensitive)
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}

/// Stub registered when a route is added without a handler
/// Error code for a handler `status`, or `None` on success
///
/// Whole-number floats count as integers, so `200.0` is a success. Values
/// that are not whole numbers or do not fit a `u16` map to `520`.
fn error_code(status: &Value) -> Option<u16> {
    let whole = status.as_u64().or_else(|| {
        status
            .as_f64()
            .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(n))
            .map(|n| n as u64)
    });
    match whole {
        Some(code) if code == u64::from(OK) => None,
        Some(code) => Some(u16::try_from(code).unwrap_or(FALLBACK)),
        None => Some(FALLBACK),
    }
}

fn missing_handler(template: &str) -> Handler {
    let template = template.to_string();
    Box::new(move |_: &Params, _: &Query| {
        tracing::error!(template = %template, "No handler function provided for {}", template);
        None
    })
}
