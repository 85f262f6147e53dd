//! Routing helper: builds zone routers for the nodes of a network
//!
//! The setup layer configures one helper and asks it for a router per node,
//! supplying that node's proactive and reactive protocol instances. The
//! helper carries the `ZoneRadius` attribute (default 2) into every router
//! it creates.

use crate::config::ZoneConfig;
use crate::context::NetworkContext;
use crate::error::ConfigError;
use crate::logging;
use crate::protocol::{ProactiveProtocol, ReactiveProtocol};
use crate::routing::{TopologyHint, ZoneRouter};
use std::sync::Arc;
use tracing::debug;

/// Attribute name for the zone radius
pub const ZONE_RADIUS_ATTRIBUTE: &str = "ZoneRadius";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRoutingHelper {
    config: ZoneConfig,
}

impl ZoneRoutingHelper {
    /// Helper with the default radius. Installs the tracing subscriber if none is set.
    pub fn new() -> Self {
        logging::init_tracing("info");
        Self::default()
    }

    pub fn from_config(config: ZoneConfig) -> Self {
        logging::init_tracing("info");
        Self { config }
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn set_zone_radius(&mut self, zone_radius: u32) {
        self.config.zone_radius = zone_radius;
    }

    /// Set a named attribute from its string form
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            ZONE_RADIUS_ATTRIBUTE => {
                let radius = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidAttributeValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    })?;
                self.set_zone_radius(radius);
                Ok(())
            }
            _ => Err(ConfigError::UnknownAttribute(name.to_string())),
        }
    }

    /// Router with this helper's radius, not yet attached to a network context
    pub fn create<P, R>(&self, proactive: P, reactive: R) -> ZoneRouter<P, R>
    where
        P: ProactiveProtocol,
        R: ReactiveProtocol,
    {
        debug!("Creating zone router with radius {}", self.config.zone_radius);
        ZoneRouter::with_config(proactive, reactive, self.config)
    }

    /// Router attached to `context`, ready to route
    pub fn install<P, R>(
        &self,
        proactive: P,
        reactive: R,
        context: Arc<dyn NetworkContext>,
        topology_hint: TopologyHint,
    ) -> ZoneRouter<P, R>
    where
        P: ProactiveProtocol,
        R: ReactiveProtocol,
    {
        let mut router = self.create(proactive, reactive);
        router.configure(context, topology_hint, self.config.zone_radius);
        router
    }
}
