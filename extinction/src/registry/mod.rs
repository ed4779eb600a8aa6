//! Registry of known dust maps
//!
//! Each entry describes one survey: whether it is 2-D or 3-D, what quantity it
//! returns and at which reference wavelength(s), which backend answers its
//! queries and with which options. Entries are validated when the registry
//! is built; after that the table is read-only.

mod catalogue;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::{BackendKind, Options};
use crate::error::{ConfigurationError, ExtinctionError, Result};

/// Spatial dimensionality of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensionality {
    /// Integrated column along the full sight line
    TwoD,
    /// Resolved along the sight line; lookups need a distance
    ThreeD,
}

impl Dimensionality {
    pub fn as_u8(self) -> u8 {
        match self {
            Dimensionality::TwoD => 2,
            Dimensionality::ThreeD => 3,
        }
    }
}

impl TryFrom<u8> for Dimensionality {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(Dimensionality::TwoD),
            3 => Ok(Dimensionality::ThreeD),
            other => Err(format!("dimensionality must be 2 or 3, got {other}")),
        }
    }
}

impl From<Dimensionality> for u8 {
    fn from(value: Dimensionality) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.as_u8())
    }
}

/// Kind of quantity a map returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    /// Monochromatic extinction A_λ at one reference wavelength
    Extinction,
    /// Color excess E(λ₁ − λ₂) between two reference wavelengths
    ColorExcess,
    /// Optical depth in e-foldings at one reference wavelength
    EFoldings,
}

/// A map's returned quantity together with its reference wavelength(s).
///
/// Carrying the wavelengths inside the variant makes "second wavelength
/// present iff color excess" hold by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapQuantity {
    Extinction { lambda_um: f64 },
    ColorExcess { lambda_um: f64, lambda2_um: f64 },
    EFoldings { lambda_um: f64 },
}

impl MapQuantity {
    pub fn kind(&self) -> QuantityKind {
        match self {
            MapQuantity::Extinction { .. } => QuantityKind::Extinction,
            MapQuantity::ColorExcess { .. } => QuantityKind::ColorExcess,
            MapQuantity::EFoldings { .. } => QuantityKind::EFoldings,
        }
    }

    /// First (or only) reference wavelength in micrometers
    pub fn reference_wavelength(&self) -> f64 {
        match *self {
            MapQuantity::Extinction { lambda_um }
            | MapQuantity::ColorExcess { lambda_um, .. }
            | MapQuantity::EFoldings { lambda_um } => lambda_um,
        }
    }

    /// Second reference wavelength, present only for color excesses
    pub fn second_reference_wavelength(&self) -> Option<f64> {
        match *self {
            MapQuantity::ColorExcess { lambda2_um, .. } => Some(lambda2_um),
            _ => None,
        }
    }
}

/// Whether an entry can be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Enabled,
    /// Known but disabled until support lands
    Reserved,
}

/// Flat, serializable form of a registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySpec {
    pub identifier: String,
    pub dim: Dimensionality,
    /// Label of the returned quantity, e.g. "E(B-V)" or "A_Ks"
    pub returns: String,
    pub kind: QuantityKind,
    pub lambda_eff: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_eff2: Option<f64>,
    pub backend: BackendKind,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub query_options: Options,
    #[serde(default)]
    pub availability: Availability,
}

/// A validated registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntrySpec", into = "EntrySpec")]
pub struct MapRegistryEntry {
    identifier: String,
    dimensionality: Dimensionality,
    returns: String,
    quantity: MapQuantity,
    backend: BackendKind,
    options: Options,
    query_options: Options,
    availability: Availability,
}

fn check_wavelength(identifier: &str, name: &str, value: f64) -> std::result::Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidRegistryEntry {
            identifier: identifier.to_string(),
            reason: format!("{name} must be a positive wavelength in µm, got {value}"),
        })
    }
}

impl TryFrom<EntrySpec> for MapRegistryEntry {
    type Error = ConfigurationError;

    fn try_from(spec: EntrySpec) -> std::result::Result<Self, Self::Error> {
        let invalid = |reason: &str| ConfigurationError::InvalidRegistryEntry {
            identifier: spec.identifier.clone(),
            reason: reason.to_string(),
        };

        if spec.identifier.trim().is_empty() {
            return Err(invalid("identifier must not be empty"));
        }
        check_wavelength(&spec.identifier, "lambda_eff", spec.lambda_eff)?;
        if let Some(lambda2) = spec.lambda_eff2 {
            check_wavelength(&spec.identifier, "lambda_eff2", lambda2)?;
        }

        let quantity = match (spec.kind, spec.lambda_eff2) {
            (QuantityKind::ColorExcess, Some(lambda2_um)) => MapQuantity::ColorExcess {
                lambda_um: spec.lambda_eff,
                lambda2_um,
            },
            (QuantityKind::ColorExcess, None) => {
                return Err(invalid("a color excess needs a second reference wavelength"));
            }
            (_, Some(_)) => {
                return Err(invalid(
                    "only a color excess may carry a second reference wavelength",
                ));
            }
            (QuantityKind::Extinction, None) => MapQuantity::Extinction {
                lambda_um: spec.lambda_eff,
            },
            (QuantityKind::EFoldings, None) => MapQuantity::EFoldings {
                lambda_um: spec.lambda_eff,
            },
        };

        Ok(Self {
            identifier: spec.identifier,
            dimensionality: spec.dim,
            returns: spec.returns,
            quantity,
            backend: spec.backend,
            options: spec.options,
            query_options: spec.query_options,
            availability: spec.availability,
        })
    }
}

impl From<MapRegistryEntry> for EntrySpec {
    fn from(entry: MapRegistryEntry) -> Self {
        Self {
            identifier: entry.identifier,
            dim: entry.dimensionality,
            returns: entry.returns,
            kind: entry.quantity.kind(),
            lambda_eff: entry.quantity.reference_wavelength(),
            lambda_eff2: entry.quantity.second_reference_wavelength(),
            backend: entry.backend,
            options: entry.options,
            query_options: entry.query_options,
            availability: entry.availability,
        }
    }
}

impl MapRegistryEntry {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn is_3d(&self) -> bool {
        self.dimensionality == Dimensionality::ThreeD
    }

    /// Label of the returned quantity
    pub fn returns(&self) -> &str {
        &self.returns
    }

    pub fn quantity(&self) -> MapQuantity {
        self.quantity
    }

    pub fn backend(&self) -> &BackendKind {
        &self.backend
    }

    /// Options handed to the backend constructor
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Options handed to every backend query
    pub fn query_options(&self) -> &Options {
        &self.query_options
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }
}

/// Read-only table of dust maps keyed by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRegistry {
    entries: Vec<MapRegistryEntry>,
}

impl MapRegistry {
    /// Registry with the built-in survey catalogue.
    pub fn builtin() -> Self {
        let entries = catalogue::builtin_specs()
            .into_iter()
            .map(MapRegistryEntry::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap_or_else(|e| panic!("built-in map catalogue is inconsistent: {e}"));
        Self { entries }
    }

    /// Build a registry from specs, validating each entry and rejecting
    /// duplicate identifiers.
    pub fn from_specs(specs: Vec<EntrySpec>) -> std::result::Result<Self, ConfigurationError> {
        let entries = specs
            .into_iter()
            .map(MapRegistryEntry::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    /// Build a registry from already validated entries.
    pub fn from_entries(
        entries: Vec<MapRegistryEntry>,
    ) -> std::result::Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.identifier.as_str()) {
                return Err(ConfigurationError::InvalidRegistryEntry {
                    identifier: entry.identifier.clone(),
                    reason: "identifier registered twice".to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of entry specs.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<EntrySpec> = serde_json::from_str(json)?;
        Ok(Self::from_specs(specs)?)
    }

    /// Resolve an identifier into its entry.
    ///
    /// Unknown identifiers are a configuration error; reserved ones are
    /// reported as unsupported.
    pub fn resolve(&self, identifier: &str) -> Result<&MapRegistryEntry> {
        let entry = self
            .get(identifier)
            .ok_or_else(|| ConfigurationError::UnknownMap {
                identifier: identifier.to_string(),
            })?;

        if entry.availability == Availability::Reserved {
            return Err(ExtinctionError::UnsupportedFeature {
                identifier: identifier.to_string(),
            });
        }
        Ok(entry)
    }

    /// Entry lookup that ignores availability
    pub fn get(&self, identifier: &str) -> Option<&MapRegistryEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    /// Identifiers in table order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.identifier.as_str())
    }

    pub fn entries(&self) -> &[MapRegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
