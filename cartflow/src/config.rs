//! Configuration types for the tracker, cart item sessions and logging.

use crate::errors::CartflowError;
use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartflowConfig {
    /// Operation tracker behaviour.
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Cart item session behaviour.
    #[serde(default)]
    pub cart_item: CartItemConfig,
    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CartflowConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, CartflowError> {
        serde_json::from_str(json).map_err(|e| CartflowError::Config(e.to_string()))
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, CartflowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Configuration for an operation registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Abort the spawned task when its handle is cancelled.
    ///
    /// When false, a cancelled operation still runs to completion and only
    /// its continuation is suppressed.
    #[serde(default)]
    pub abort_on_cancel: bool,
}

impl TrackerConfig {
    /// Creates a new tracker configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether cancellation aborts the underlying task.
    #[must_use]
    pub fn with_abort_on_cancel(mut self, abort: bool) -> Self {
        self.abort_on_cancel = abort;
        self
    }
}

/// Configuration for a cart item session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemConfig {
    /// Refresh related items after a successful removal.
    #[serde(default)]
    pub cascade_on_remove: bool,
    /// The item is shown inside the cart overlay.
    #[serde(default)]
    pub is_cart_overlay: bool,
    /// The storefront runs on a mobile device.
    #[serde(default)]
    pub is_mobile: bool,
    /// Whether the loader should be displayed while loading.
    #[serde(default = "default_show_loader")]
    pub show_loader: bool,
    /// Id of the cart the item belongs to.
    #[serde(default)]
    pub cart_id: String,
    /// Currency prices are shown in.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    /// The cart is in edit mode.
    #[serde(default)]
    pub is_editing: bool,
}

fn default_show_loader() -> bool {
    true
}

fn default_currency_code() -> String {
    "USD".to_string()
}

impl Default for CartItemConfig {
    fn default() -> Self {
        Self {
            cascade_on_remove: false,
            is_cart_overlay: false,
            is_mobile: false,
            show_loader: default_show_loader(),
            cart_id: String::new(),
            currency_code: default_currency_code(),
            is_editing: false,
        }
    }
}

impl CartItemConfig {
    /// Creates a new cart item configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether related items are refreshed after removal.
    #[must_use]
    pub fn with_cascade_on_remove(mut self, cascade: bool) -> Self {
        self.cascade_on_remove = cascade;
        self
    }

    /// Sets the cart id.
    #[must_use]
    pub fn with_cart_id(mut self, cart_id: impl Into<String>) -> Self {
        self.cart_id = cart_id.into();
        self
    }

    /// Sets the mobile flag.
    #[must_use]
    pub fn with_mobile(mut self, is_mobile: bool) -> Self {
        self.is_mobile = is_mobile;
        self
    }

    /// Sets the cart overlay flag.
    #[must_use]
    pub fn with_cart_overlay(mut self, is_cart_overlay: bool) -> Self {
        self.is_cart_overlay = is_cart_overlay;
        self
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_directive")]
    pub default_directive: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_directive() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: default_directive(),
            json: false,
        }
    }
}
