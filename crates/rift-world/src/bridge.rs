//! The world bridge: read access to host engine internals whose layout
//! varies by host version.
//!
//! One [`WorldSource`] implementation exists per supported host version;
//! [`BridgeSelector`] probes the version once at startup and hands back the
//! matching implementation. Ordinary polymorphism, no runtime class-hunting.

use std::fmt;
use std::str::FromStr;

use rift_math::Aabb;
use thiserror::Error;

use crate::{EntityId, EntityState, EntityUniqueId, WorldId};

/// Read access to the host's authoritative world state.
///
/// All methods are cheap synchronous reads and must be called from the
/// simulation thread.
pub trait WorldSource {
    /// Current state of an entity, or `None` once the host has removed it.
    fn entity_state(&self, entity: EntityId) -> Option<EntityState>;

    /// The host's stable unique id for an entity.
    fn entity_unique_id(&self, entity: EntityId) -> Option<EntityUniqueId>;

    /// Entities whose position lies inside `bounds`.
    fn entities_within(&self, world: WorldId, bounds: &Aabb) -> Vec<EntityId>;
}

/// Errors from probing and selecting a world bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host reported a version string that does not parse.
    #[error("malformed host version string: {0:?}")]
    MalformedVersion(String),

    /// No registered bridge covers the running host version.
    #[error("no world bridge supports host version {0}")]
    UnsupportedVersion(HostVersion),
}

/// Host engine version, `major.minor.patch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for HostVersion {
    type Err = BridgeError;

    /// Parses `"1.18.2"`; a missing patch component (`"1.18"`) reads as 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BridgeError::MalformedVersion(s.to_string());
        let mut parts = s.split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let patch = match parts.next() {
            Some(p) => p.parse().map_err(|_| malformed())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(Self::new(major, minor, patch))
    }
}

/// Inclusive range of host versions a bridge supports.
#[derive(Clone, Copy, Debug)]
pub struct VersionRange {
    pub min: HostVersion,
    pub max: HostVersion,
}

impl VersionRange {
    pub fn new(min: HostVersion, max: HostVersion) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, version: &HostVersion) -> bool {
        *version >= self.min && *version <= self.max
    }
}

type BridgeFactory = Box<dyn Fn() -> Box<dyn WorldSource>>;

/// Startup-time selection of the world bridge matching the running host.
#[derive(Default)]
pub struct BridgeSelector {
    entries: Vec<(VersionRange, BridgeFactory)>,
}

impl BridgeSelector {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a bridge implementation for a version range. Ranges are
    /// consulted in registration order.
    pub fn register(
        &mut self,
        range: VersionRange,
        factory: impl Fn() -> Box<dyn WorldSource> + 'static,
    ) {
        self.entries.push((range, Box::new(factory)));
    }

    /// Builds the first registered bridge whose range contains `version`.
    pub fn select(&self, version: &HostVersion) -> Result<Box<dyn WorldSource>, BridgeError> {
        for (range, factory) in &self.entries {
            if range.contains(version) {
                return Ok(factory());
            }
        }
        Err(BridgeError::UnsupportedVersion(*version))
    }
}
