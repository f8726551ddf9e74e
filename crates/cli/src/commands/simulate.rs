//! Replay checkout scenarios against recording doubles.
//!
//! A scenario names a storefront and lists steps: UI actions, widget
//! callbacks and script events. Each step goes through the integration
//! facade exactly as it would in the browser; the widget calls, alerts,
//! navigations and final state are printed as YAML.
//!
//! ```yaml
//! storefront: acme.test.onfastspring.com/popup
//! steps:
//!   - script_loaded
//!   - tick
//!   - select: { path: pro }
//!   - callback: { items: [] }
//!   - callback: { items: [{ path: pro, quantity: 1 }] }
//!   - popup_closed: { id: ORD-1001 }
//! ```

use std::path::Path;

use popup_demo_core::{
    DebugSnapshot, DemoSettings, FallbackPolicy, Industry, Integration, IntegrationOptions,
    MemoryPage, OrderReference, RecordingWidget, WidgetCall, WidgetMethod,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::{CommandError, emit};

const fn one() -> u32 {
    1
}

const fn yes() -> bool {
    true
}

/// A product reference with a quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductStep {
    pub path: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

/// One step of a scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Add(ProductStep),
    AddForce(ProductStep),
    Select {
        path: String,
        #[serde(default = "yes")]
        checkout: bool,
    },
    Checkout,
    Refresh,
    /// Data callback with this payload.
    Callback(Value),
    PopupClosed(OrderReference),
    ScriptLoaded,
    ScriptFailed,
    /// Run one requested deferred tick, if any.
    Tick,
    SetStorefront(String),
    /// Make a widget method fail from now on.
    Fail(WidgetMethod),
    Recover(WidgetMethod),
}

/// A scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub storefront: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// Start without the widget's global object.
    #[serde(default)]
    pub widget_unavailable: bool,
    /// Steps with arguments are written as one-key maps (`- select: {...}`).
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

/// What happened during a replay.
#[derive(Debug, Serialize)]
pub struct Report {
    pub calls: Vec<WidgetCall>,
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
    /// Errors returned by UI actions, in order.
    pub errors: Vec<String>,
    pub snapshot: DebugSnapshot,
}

type Facade = Integration<RecordingWidget, MemoryPage>;

fn step(facade: &mut Facade, step: Step) -> Result<(), String> {
    let result = match step {
        Step::Add(p) => facade.add_to_cart(p.path, p.quantity),
        Step::AddForce(p) => facade.add_to_cart_force(p.path, p.quantity),
        Step::Select { path, checkout } => facade.select_single_and_checkout(path, checkout),
        Step::Checkout => facade.checkout(),
        Step::Refresh => facade.refresh_products(),
        Step::SetStorefront(id) => facade.set_storefront_id(&id),
        Step::Callback(payload) => {
            facade.on_callback(&payload);
            Ok(())
        }
        Step::PopupClosed(order) => {
            facade.on_popup_closed(&order);
            Ok(())
        }
        Step::ScriptLoaded => {
            facade.on_script_loaded();
            Ok(())
        }
        Step::ScriptFailed => {
            facade.on_script_failed();
            Ok(())
        }
        Step::Tick => {
            if facade.page_mut().take_tick() {
                facade.tick();
            }
            Ok(())
        }
        Step::Fail(method) => {
            facade.widget_mut().fail(method);
            Ok(())
        }
        Step::Recover(method) => {
            facade.widget_mut().recover(method);
            Ok(())
        }
    };
    result.map_err(|e| e.to_string())
}

/// Replay `scenario` and report what the facade did.
#[must_use]
pub fn run(scenario: Scenario) -> Report {
    let industry = scenario.industry.map(Industry::new).unwrap_or_default();
    let settings = DemoSettings::for_storefront(scenario.storefront).with_industry(industry);
    let widget = if scenario.widget_unavailable {
        RecordingWidget::unavailable()
    } else {
        RecordingWidget::new()
    };
    let options = IntegrationOptions {
        fallback: scenario.fallback,
        ..IntegrationOptions::default()
    };

    let mut facade = Integration::new(widget, MemoryPage::new(), settings, options);
    let mut errors = Vec::new();
    if let Err(e) = facade.attach() {
        errors.push(e.to_string());
    }

    for (index, s) in scenario.steps.into_iter().enumerate() {
        if let Err(e) = step(&mut facade, s) {
            warn!(step = index, error = %e, "step failed");
            errors.push(e);
        }
    }

    Report {
        calls: facade.widget().calls().to_vec(),
        alerts: facade.page().alerts().to_vec(),
        navigations: facade.page().navigations().to_vec(),
        errors,
        snapshot: facade.debug_snapshot(),
    }
}

/// Replay the scenario in `path` and print the report as YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid scenario.
pub async fn run_file(path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Loading scenario");
    let content = tokio::fs::read_to_string(path).await?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    info!(steps = scenario.steps.len(), "Replaying scenario");

    let report = run(scenario);
    emit(&serde_yaml::to_string(&report)?)
}
