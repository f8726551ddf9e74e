//! The page hosting the widget: script element, global callbacks, alerts,
//! navigation and deferred ticks.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// A page operation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no document is available")]
    NoDocument,

    #[error("script #{0} not found")]
    ScriptMissing(String),

    #[error("{operation} failed: {message}")]
    Js {
        operation: &'static str,
        message: String,
    },
}

/// What the integration needs from the page.
///
/// The browser host implements this against the DOM; [`MemoryPage`] is the
/// in-memory version for tests and scenario replay.
pub trait Page {
    /// Returns `true` if a script element with `id` exists.
    fn script_exists(&self, id: &str) -> bool;

    /// Create and append an async script element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be created or inserted.
    fn insert_script(&mut self, id: &str, src: &str) -> Result<(), HostError>;

    /// Set an attribute on the script element `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the script does not exist or the write fails.
    fn set_script_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<(), HostError>;

    /// Returns `true` if the script element `id` has been marked loaded.
    fn script_loaded(&self, id: &str) -> bool;

    /// Mark the script element `id` as loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the script does not exist or the write fails.
    fn mark_script_loaded(&mut self, id: &str) -> Result<(), HostError>;

    /// Returns `true` if the widget's global object is already present.
    fn widget_present(&self) -> bool;

    /// Point the global data and popup-closed callbacks at the integration.
    ///
    /// Called on every attach; later calls overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the globals cannot be assigned.
    fn install_callbacks(&mut self, data_callback: &str, popup_closed: &str) -> Result<(), HostError>;

    /// Ask for [`crate::Integration::tick`] to run on the next turn of the
    /// event loop.
    fn request_tick(&mut self);

    /// Show a blocking, user-visible message.
    fn alert(&mut self, message: &str);

    /// Replace the current location.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation is refused.
    fn navigate(&mut self, url: &str) -> Result<(), HostError>;
}

/// A script element held by [`MemoryPage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryScript {
    pub src: String,
    pub attributes: BTreeMap<String, String>,
    pub loaded: bool,
}

/// In-memory page that records everything the integration does to it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryPage {
    scripts: BTreeMap<String, MemoryScript>,
    inserted: usize,
    widget_present: bool,
    callbacks: Option<(String, String)>,
    pending_ticks: usize,
    alerts: Vec<String>,
    navigations: Vec<String>,
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the widget's global object already exists.
    pub fn set_widget_present(&mut self, present: bool) {
        self.widget_present = present;
    }

    #[must_use]
    pub fn script(&self, id: &str) -> Option<&MemoryScript> {
        self.scripts.get(id)
    }

    /// Number of script elements ever inserted.
    #[must_use]
    pub const fn inserted_scripts(&self) -> usize {
        self.inserted
    }

    /// The installed global callback names (data, popup closed).
    #[must_use]
    pub fn callbacks(&self) -> Option<(&str, &str)> {
        self.callbacks
            .as_ref()
            .map(|(data, closed)| (data.as_str(), closed.as_str()))
    }

    /// Consume one requested tick, if any.
    pub fn take_tick(&mut self) -> bool {
        if self.pending_ticks == 0 {
            return false;
        }
        self.pending_ticks -= 1;
        true
    }

    #[must_use]
    pub const fn pending_ticks(&self) -> usize {
        self.pending_ticks
    }

    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }
}

impl Page for MemoryPage {
    fn script_exists(&self, id: &str) -> bool {
        self.scripts.contains_key(id)
    }

    fn insert_script(&mut self, id: &str, src: &str) -> Result<(), HostError> {
        self.scripts.insert(
            id.to_string(),
            MemoryScript {
                src: src.to_string(),
                ..MemoryScript::default()
            },
        );
        self.inserted += 1;
        Ok(())
    }

    fn set_script_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<(), HostError> {
        let script = self
            .scripts
            .get_mut(id)
            .ok_or_else(|| HostError::ScriptMissing(id.to_string()))?;
        script.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn script_loaded(&self, id: &str) -> bool {
        self.scripts.get(id).is_some_and(|s| s.loaded)
    }

    fn mark_script_loaded(&mut self, id: &str) -> Result<(), HostError> {
        let script = self
            .scripts
            .get_mut(id)
            .ok_or_else(|| HostError::ScriptMissing(id.to_string()))?;
        script.loaded = true;
        Ok(())
    }

    fn widget_present(&self) -> bool {
        self.widget_present
    }

    fn install_callbacks(&mut self, data_callback: &str, popup_closed: &str) -> Result<(), HostError> {
        self.callbacks = Some((data_callback.to_string(), popup_closed.to_string()));
        Ok(())
    }

    fn request_tick(&mut self) {
        self.pending_ticks += 1;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, url: &str) -> Result<(), HostError> {
        self.navigations.push(url.to_string());
        Ok(())
    }
}
