use meadow_shared::path::ROOT_PATH;
use wasm_bindgen::JsValue;

/// The navigable history the meadow writes to. Reads happen through
/// `current_path`; back/forward notifications arrive separately through
/// `DeepLinks::on_location_change`.
pub trait NavigationPort {
    fn current_path(&self) -> String;
    fn push_location(&mut self, path: &str);
    fn replace_location(&mut self, path: &str);
}

/// `window.history` / `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

impl NavigationPort for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| ROOT_PATH.to_owned())
    }

    fn push_location(&mut self, path: &str) {
        let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
            return;
        };
        if let Err(err) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
            log::warn!("history.pushState({path}) failed: {err:?}");
        }
    }

    fn replace_location(&mut self, path: &str) {
        let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
            return;
        };
        if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(path)) {
            log::warn!("history.replaceState({path}) failed: {err:?}");
        }
    }
}

/// In-memory history stack with the same push/replace/back/forward semantics
/// as the browser's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(ROOT_PATH)
    }
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Moves one entry back and returns the new current path.
    pub fn back(&mut self) -> Option<String> {
        self.index = self.index.checked_sub(1)?;
        Some(self.entries[self.index].clone())
    }

    pub fn forward(&mut self) -> Option<String> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }
}

impl NavigationPort for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push_location(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_owned());
        self.index = self.entries.len() - 1;
    }

    fn replace_location(&mut self, path: &str) {
        self.entries[self.index] = path.to_owned();
    }
}
