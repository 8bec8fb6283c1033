// File: src/status.rs
// Purpose: Error handlers keyed by status code

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Handler for an error status, receiving the error data
pub type ErrorHandler = Box<dyn Fn(&Value)>;

/// Status dispatched when no route matches
pub const NOT_FOUND: u16 = 404;

/// Status whose handler receives every code without a handler of its own
pub const FALLBACK: u16 = 520;

/// Status a handler may return to signal success
pub const OK: u16 = 200;

/// Error handlers keyed by status code
///
/// `404` starts out logging the missing page. The `520` fallback is held
/// apart from the table so that every lookup resolves to a handler; it
/// starts out logging the unhandled status.
pub struct ErrorTable {
    handlers: HashMap<u16, ErrorHandler>,
    fallback: ErrorHandler,
}

impl ErrorTable {
    pub fn new() -> Self {
        let mut handlers: HashMap<u16, ErrorHandler> = HashMap::new();
        handlers.insert(NOT_FOUND, Box::new(log_not_found));
        Self {
            handlers,
            fallback: Box::new(log_unhandled),
        }
    }

    /// Registers the handler for `code`; `520` replaces the fallback
    pub fn insert(&mut self, code: u16, handler: ErrorHandler) {
        if code == FALLBACK {
            self.fallback = handler;
        } else {
            self.handlers.insert(code, handler);
        }
    }

    /// Whether `code` has a handler of its own
    pub fn contains(&self, code: u16) -> bool {
        code == FALLBACK || self.handlers.contains_key(&code)
    }

    /// Handler for `code`, or the `520` fallback
    pub fn resolve(&self, code: u16) -> &ErrorHandler {
        self.handlers.get(&code).unwrap_or(&self.fallback)
    }

    /// Runs the handler resolved for `code`
    pub fn dispatch(&self, code: u16, data: &Value) {
        (self.resolve(code))(data)
    }
}

impl Default for ErrorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<&u16> = self.handlers.keys().collect();
        codes.sort();
        f.debug_struct("ErrorTable")
            .field("codes", &codes)
            .finish_non_exhaustive()
    }
}

fn log_not_found(data: &Value) {
    let page = data.get("page").and_then(Value::as_str).unwrap_or_default();
    tracing::error!(page, "Page {} not found!", page);
}

fn log_unhandled(data: &Value) {
    let status = data.get("status").cloned().unwrap_or(Value::Null);
    tracing::warn!(%status, "Unhandled routing error: {}", data);
}
