//! Brand palette and resolved theme.

use serde::{Deserialize, Serialize};

/// A colour slot of the brand palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Accent,
    Nav,
    Background,
    Text,
}

impl Channel {
    /// All channels, in token order.
    pub const ALL: [Self; 4] = [Self::Accent, Self::Nav, Self::Background, Self::Text];
}

/// Brand colours chosen by the user.
///
/// Every entry is optional: a missing entry means "use the industry theme".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Palette {
    /// Get the colour for a channel, ignoring blank entries.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&str> {
        let value = match channel {
            Channel::Accent => self.accent.as_deref(),
            Channel::Nav => self.nav.as_deref(),
            Channel::Background => self.background.as_deref(),
            Channel::Text => self.text.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Set (or clear) the colour for a channel.
    pub fn set(&mut self, channel: Channel, value: Option<String>) {
        let slot = match channel {
            Channel::Accent => &mut self.accent,
            Channel::Nav => &mut self.nav,
            Channel::Background => &mut self.background,
            Channel::Text => &mut self.text,
        };
        *slot = value;
    }

    /// Returns `true` if no channel carries a colour.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// Layer `other` on top of `self`; entries set in `other` win.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for channel in Channel::ALL {
            if let Some(value) = other.get(channel) {
                out.set(channel, Some(value.to_string()));
            }
        }
        out
    }
}

/// Fully resolved colours used to render a demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary: String,
    pub accent: String,
    pub nav: String,
    pub background: String,
    pub text: String,
}

impl Theme {
    /// Apply palette overrides on top of this theme.
    #[must_use]
    pub fn with_overrides(&self, palette: &Palette) -> Self {
        let pick = |channel, base: &String| {
            palette
                .get(channel)
                .map_or_else(|| base.clone(), ToString::to_string)
        };
        Self {
            primary: self.primary.clone(),
            accent: pick(Channel::Accent, &self.accent),
            nav: pick(Channel::Nav, &self.nav),
            background: pick(Channel::Background, &self.background),
            text: pick(Channel::Text, &self.text),
        }
    }

    /// The theme's colours as a palette.
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette {
            accent: Some(self.accent.clone()),
            nav: Some(self.nav.clone()),
            background: Some(self.background.clone()),
            text: Some(self.text.clone()),
        }
    }
}
