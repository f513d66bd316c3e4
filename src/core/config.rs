//! # Registry configuration.
//!
//! Provides [`Config`], the centralized settings consumed by
//! [`RegistryBuilder`](crate::RegistryBuilder).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`Config::bus_capacity_clamped`]

use crate::targets::ModelKind;

/// Configuration for the target registry.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `page_model`: Model kind whose lifecycle events are re-dispatched from the main target
/// - `redispatch_page_events`: Disable to stop the registry from subscribing to page events
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the registry event bus.
    ///
    /// Receivers lagging by more than `bus_capacity` events observe `Lagged` and
    /// skip older items.
    pub bus_capacity: usize,

    /// Model kind acting as the page model.
    ///
    /// Its `MainFrameNavigated` / `Load` / `PageReloadRequested` / `WillReloadPage`
    /// events on the main target are re-published on the registry bus, and
    /// [`Registry::reload_page`](crate::Registry::reload_page) forwards to it.
    pub page_model: ModelKind,

    /// Whether page lifecycle events are re-dispatched at all.
    pub redispatch_page_events: bool,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 256`
    /// - `page_model = ModelKind::RESOURCE_TREE`
    /// - `redispatch_page_events = true`
    fn default() -> Self {
        Self {
            bus_capacity: 256,
            page_model: ModelKind::RESOURCE_TREE,
            redispatch_page_events: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bus_capacity, 256);
        assert_eq!(cfg.page_model, ModelKind::RESOURCE_TREE);
        assert!(cfg.redispatch_page_events);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
