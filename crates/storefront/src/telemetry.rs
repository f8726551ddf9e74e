//! Tracing and Sentry setup for the server binary.
//!
//! Log levels map onto Sentry as follows: `ERROR`/`WARN` become events,
//! `INFO`/`DEBUG` become breadcrumbs attached to the next event, `TRACE` is
//! dropped.

use std::borrow::Cow;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::{Level, Metadata};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::StorefrontConfig;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "popup_demo_storefront=info,tower_http=debug";

/// Start the Sentry client when a DSN is configured.
///
/// The returned guard flushes pending events on drop; keep it alive for the
/// life of the process.
#[must_use]
pub fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;
    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };
    Some(sentry::init((dsn, options)))
}

/// How a tracing event is forwarded to Sentry.
#[must_use]
pub fn sentry_filter(metadata: &Metadata<'_>) -> EventFilter {
    level_filter(*metadata.level())
}

fn level_filter(level: Level) -> EventFilter {
    match level {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

/// Install the global subscriber: env filter, fmt output and the Sentry
/// layer. Call after [`init_sentry`].
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_filter))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_filter(Level::ERROR).bits(), EventFilter::Event.bits());
        assert_eq!(level_filter(Level::WARN).bits(), EventFilter::Event.bits());
        assert_eq!(level_filter(Level::INFO).bits(), EventFilter::Breadcrumb.bits());
        assert_eq!(level_filter(Level::DEBUG).bits(), EventFilter::Breadcrumb.bits());
        assert_eq!(level_filter(Level::TRACE).bits(), EventFilter::Ignore.bits());
    }
}
