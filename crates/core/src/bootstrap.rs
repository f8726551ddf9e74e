//! Attaching the checkout script to the page.
//!
//! There is one script element per page. Attaching again (for a new
//! storefront) rewrites its attributes and never inserts a second element.

use serde::Serialize;
use tracing::{info, warn};

use crate::page::{HostError, Page};
use crate::types::WidgetStatus;

/// Message shown when the script fails to load.
pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load the checkout script. Check the storefront identifier.";

/// The script element and the global callback names it is wired to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetScript {
    /// Element id used to find an existing script.
    pub id: String,
    pub src: String,
    /// Global function receiving every callback payload.
    pub data_callback: String,
    /// Global function receiving the order reference when the popup closes.
    pub popup_closed: String,
}

impl WidgetScript {
    pub const DEFAULT_ID: &'static str = "fsc-api";
    pub const DEFAULT_SRC: &'static str =
        "https://sbl.onfastspring.com/sbl/1.0.5/fastspring-builder.min.js";
    pub const DEFAULT_DATA_CALLBACK: &'static str = "fastSpringCallBack";
    pub const DEFAULT_POPUP_CLOSED: &'static str = "onFSPopupClosed";
}

impl Default for WidgetScript {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            src: Self::DEFAULT_SRC.to_string(),
            data_callback: Self::DEFAULT_DATA_CALLBACK.to_string(),
            popup_closed: Self::DEFAULT_POPUP_CLOSED.to_string(),
        }
    }
}

/// Script lifecycle: status, error message and the deferred reset.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    script: WidgetScript,
    status: WidgetStatus,
    error: Option<String>,
    storefront_id: String,
    reset_due: bool,
}

impl Bootstrap {
    #[must_use]
    pub fn new(script: WidgetScript) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn script(&self) -> &WidgetScript {
        &self.script
    }

    #[must_use]
    pub const fn status(&self) -> WidgetStatus {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Storefront the script was last attached for.
    #[must_use]
    pub fn storefront_id(&self) -> &str {
        &self.storefront_id
    }

    /// Attach (or re-point) the script for `storefront_id`.
    ///
    /// A blank identifier does nothing. If the script already loaded, or the
    /// widget's global object is present, the status goes straight to ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the page refuses a write; the status is then
    /// `error`.
    pub fn attach<P: Page>(&mut self, page: &mut P, storefront_id: &str) -> Result<(), HostError> {
        if storefront_id.trim().is_empty() {
            return Ok(());
        }

        self.storefront_id = storefront_id.to_string();
        self.status = WidgetStatus::Loading;
        self.error = None;
        info!(storefront = %storefront_id, "attaching checkout script");

        if let Err(e) = self.write_script(page, storefront_id) {
            warn!(error = %e, "could not attach checkout script");
            self.status = WidgetStatus::Error;
            self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            return Err(e);
        }

        if page.script_loaded(&self.script.id) || page.widget_present() {
            self.mark_ready(page);
        }
        Ok(())
    }

    fn write_script<P: Page>(&self, page: &mut P, storefront_id: &str) -> Result<(), HostError> {
        let s = &self.script;
        page.install_callbacks(&s.data_callback, &s.popup_closed)?;

        if !page.script_exists(&s.id) {
            page.insert_script(&s.id, &s.src)?;
            page.set_script_attribute(&s.id, "data-continuous", "true")?;
        }

        page.set_script_attribute(&s.id, "data-data-callback", &s.data_callback)?;
        page.set_script_attribute(&s.id, "data-popup-webhook-received", &s.popup_closed)?;
        page.set_script_attribute(&s.id, "data-storefront", storefront_id)
    }

    /// The script's load event fired.
    pub fn on_load<P: Page>(&mut self, page: &mut P) {
        if self.status == WidgetStatus::Loading {
            self.mark_ready(page);
        }
    }

    /// The script's error event fired.
    pub fn on_error(&mut self) {
        if self.status == WidgetStatus::Loading {
            warn!(storefront = %self.storefront_id, "checkout script failed to load");
            self.status = WidgetStatus::Error;
            self.error = Some(LOAD_ERROR_MESSAGE.to_string());
        }
    }

    fn mark_ready<P: Page>(&mut self, page: &mut P) {
        self.status = WidgetStatus::Ready;
        if let Err(e) = page.mark_script_loaded(&self.script.id) {
            warn!(error = %e, "could not mark checkout script loaded");
        }
        self.reset_due = true;
        page.request_tick();
        info!(storefront = %self.storefront_id, "checkout widget ready");
    }

    /// Returns `true` once after reaching ready: the widget should be reset.
    pub fn take_reset_due(&mut self) -> bool {
        std::mem::take(&mut self.reset_due)
    }
}
