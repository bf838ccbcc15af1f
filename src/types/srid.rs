//! Spatial reference registry
//!
//! SRIDs are validated against a fixed registry of known EPSG codes. An
//! unknown SRID is rejected rather than accepted opportunistically: a wrong
//! coordinate reference silently corrupts every geometry stored under it.
//!
//! The registry is an explicit value passed to callers that need it. There
//! is no ambient global, so schemas with different policies can be
//! processed side by side.

use super::{TypeError, TypeResult};
use std::collections::BTreeSet;

/// Registry-wide fallback SRID (EPSG:3857, spherical web mercator)
pub const DEFAULT_SRID: u32 = 3857;

/// Built-in EPSG codes known to the registry
const BUILTIN_EPSG: &[u32] = &[
    2154,  // RGF93 / Lambert-93
    3035,  // ETRS89-extended / LAEA Europe
    3857,  // WGS 84 / Pseudo-Mercator
    4269,  // NAD83
    4326,  // WGS 84
    25832, // ETRS89 / UTM zone 32N
    25833, // ETRS89 / UTM zone 33N
    26910, // NAD83 / UTM zone 10N
    27700, // OSGB36 / British National Grid
    32633, // WGS 84 / UTM zone 33N
];

/// Fixed registry of known spatial reference identifiers.
#[derive(Debug, Clone)]
pub struct SridRegistry {
    known: BTreeSet<u32>,
}

impl SridRegistry {
    /// Create an empty registry (for embedders with a custom authority set).
    pub fn empty() -> Self {
        Self {
            known: BTreeSet::new(),
        }
    }

    /// Register an additional SRID.
    pub fn with_srid(mut self, srid: u32) -> Self {
        self.known.insert(srid);
        self
    }

    /// Returns true when the SRID is known to the registry.
    pub fn contains(&self, srid: u32) -> bool {
        self.known.contains(&srid)
    }

    /// Resolve an SRID, failing when it is not registered.
    pub fn resolve(&self, srid: u32) -> TypeResult<u32> {
        if self.contains(srid) {
            Ok(srid)
        } else {
            Err(TypeError::UnknownSrid { srid })
        }
    }
}

impl Default for SridRegistry {
    fn default() -> Self {
        Self {
            known: BUILTIN_EPSG.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes_resolve() {
        let registry = SridRegistry::default();
        assert_eq!(registry.resolve(4326).unwrap(), 4326);
        assert_eq!(registry.resolve(DEFAULT_SRID).unwrap(), 3857);
    }

    #[test]
    fn test_unknown_srid_rejected() {
        let registry = SridRegistry::default();
        let err = registry.resolve(999999).unwrap_err();
        assert_eq!(err, TypeError::UnknownSrid { srid: 999999 });
    }

    #[test]
    fn test_registry_extension() {
        let registry = SridRegistry::default().with_srid(900913);
        assert!(registry.contains(900913));
        // Extension does not leak into a fresh registry
        assert!(!SridRegistry::default().contains(900913));
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = SridRegistry::empty();
        assert!(registry.resolve(4326).is_err());
    }
}
