// File: src/web.rs
// Purpose: Browser host backed by window.location and window.history

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::location::Location;
use crate::Hashmux;

/// [`Location`] over the browser window
#[derive(Debug, Clone)]
pub struct BrowserLocation {
    window: Window,
}

impl BrowserLocation {
    /// Returns `None` outside a browser window
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl Location for BrowserLocation {
    fn current(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn assign(&self, hash: &str) {
        if let Err(err) = self.window.location().set_hash(hash) {
            tracing::error!(?err, hash, "Failed to set location hash");
        }
    }

    fn replace(&self, hash: &str) {
        let result = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::UNDEFINED, "", Some(hash)));
        if let Err(err) = result {
            tracing::error!(?err, hash, "Failed to replace history entry");
        }
    }
}

/// Wires `window.onhashchange` to [`Hashmux::update`] and dispatches the
/// current hash
///
/// The returned closure must be kept alive (or leaked with
/// [`Closure::forget`]) for as long as the router should listen.
pub fn listen(router: Rc<RefCell<Hashmux<BrowserLocation>>>) -> Closure<dyn FnMut()> {
    let handle = Rc::clone(&router);
    let on_change = Closure::wrap(Box::new(move || match handle.try_borrow_mut() {
        Ok(mut router) => router.update(),
        Err(_) => tracing::warn!("Navigation event raised while the router was dispatching"),
    }) as Box<dyn FnMut()>);

    let mut router = router.borrow_mut();
    router
        .location()
        .window
        .set_onhashchange(Some(on_change.as_ref().unchecked_ref()));
    router.listen();

    on_change
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_assign_sets_window_hash() {
        let location = BrowserLocation::new().unwrap();

        location.assign("#/assigned");

        assert_eq!(location.current(), "#/assigned");
        assert_eq!(location.window.location().hash().unwrap(), "#/assigned");
    }

    #[wasm_bindgen_test]
    fn test_replace_keeps_history_length() {
        let location = BrowserLocation::new().unwrap();
        let history = location.window.history().unwrap();
        location.assign("#/before");
        let length = history.length().unwrap();

        location.replace("#/after");

        assert_eq!(location.current(), "#/after");
        assert_eq!(history.length().unwrap(), length);
    }

    #[wasm_bindgen_test]
    fn test_listen_dispatches_current_hash() {
        let location = BrowserLocation::new().unwrap();
        location.replace("#/users/7");

        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let mut router = Hashmux::new(location);
        router
            .handle("/users/{id}", move |params, _query| {
                *sink.borrow_mut() = params.get("id").map(str::to_string);
                None
            })
            .unwrap();
        let router = Rc::new(RefCell::new(router));

        let on_change = listen(Rc::clone(&router));

        assert_eq!(seen.borrow().as_deref(), Some("7"));
        let window = web_sys::window().unwrap();
        assert!(window.onhashchange().is_some());

        window.set_onhashchange(None);
        drop(on_change);
    }
}
