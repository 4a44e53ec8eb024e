//! Bump Configuration
//!
//! YAML configuration describing the global default logic and every bump.
//!
//! ```yaml
//! logic: AND
//! bumps:
//!   - id: 1
//!     name: Bump 1
//!     layout: template-1
//!     display_location: before_order_review
//!     conditions:
//!       - { type: cart_total, value: 5 }
//!     products:
//!       - 59
//!       - { id: 187, discount_type: percent, discount: 10 }
//! ```
//!
//! The document shape is strict. Condition entries, at any depth, are not: an entry that does not
//! parse as a descriptor is dropped with a warning and its siblings still load. An unreadable
//! `logic` falls back to AND and an unreadable product `discount` is ignored.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

use crate::{
    bumps::{BumpConfig, BumpId, BumpProduct, DisplayLocation, Layout},
    catalog::ProductId,
    conditions::{ConditionDescriptor, Logic},
    discounts::BumpDiscount,
};

/// Configuration Errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two bumps share an id
    #[error("Bump {0} is configured more than once")]
    DuplicateBump(BumpId),
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BumpsConfig {
    /// Global default logic for bumps without an override
    #[serde(default, deserialize_with = "lenient_logic")]
    pub logic: Option<Logic>,

    /// Configured bumps, in display order
    #[serde(default)]
    pub bumps: Vec<BumpDescriptor>,
}

impl BumpsConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or has the wrong shape.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Global default logic, AND when unset.
    pub fn default_logic(&self) -> Logic {
        self.logic.unwrap_or_default()
    }
}

/// A bump, as written in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BumpDescriptor {
    /// Unique bump identifier
    pub id: BumpId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Product layout
    #[serde(default)]
    pub layout: Layout,

    /// Checkout slot
    #[serde(default)]
    pub display_location: DisplayLocation,

    /// Logic override
    #[serde(default, deserialize_with = "lenient_logic")]
    pub logic: Option<Logic>,

    /// Top-level condition descriptors
    #[serde(default, deserialize_with = "lenient_conditions")]
    pub conditions: Vec<ConditionDescriptor>,

    /// Offered products
    #[serde(default)]
    pub products: Vec<ProductDescriptor>,
}

/// An offered product, either a bare id or a detailed entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductDescriptor {
    /// Product id only
    Id(ProductId),

    /// Product with discount and quantity
    Detailed {
        /// Product id
        id: ProductId,

        /// `fixed` or `percent`
        #[serde(default)]
        discount_type: Option<String>,

        /// Discount magnitude
        #[serde(default, deserialize_with = "lenient")]
        discount: Option<Decimal>,

        /// Units added on acceptance
        #[serde(default)]
        quantity: Option<u32>,
    },
}

impl From<ProductDescriptor> for BumpProduct {
    fn from(descriptor: ProductDescriptor) -> Self {
        match descriptor {
            ProductDescriptor::Id(id) => BumpProduct::new(id),
            ProductDescriptor::Detailed {
                id,
                discount_type,
                discount,
                quantity,
            } => {
                let discount = match (discount_type.as_deref(), discount) {
                    (Some(kind), Some(magnitude)) => {
                        let discount = BumpDiscount::from_parts(kind, magnitude);

                        if discount.is_none() {
                            warn!(product = %id, kind, "ignoring unrecognized discount type");
                        }

                        discount
                    }
                    _ => None,
                };

                BumpProduct {
                    product: id,
                    discount,
                    quantity: quantity.filter(|quantity| *quantity > 0).unwrap_or(1),
                }
            }
        }
    }
}

impl From<BumpDescriptor> for BumpConfig {
    fn from(descriptor: BumpDescriptor) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            layout: descriptor.layout,
            display_location: descriptor.display_location,
            logic: descriptor.logic,
            conditions: descriptor.conditions,
            products: descriptor
                .products
                .into_iter()
                .map(BumpProduct::from)
                .collect(),
        }
    }
}

fn lenient_conditions<'de, D>(deserializer: D) -> Result<Vec<ConditionDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_norway::Value>>::deserialize(deserializer)?;

    Ok(parse_descriptors(values.unwrap_or_default()))
}

/// Children of a condition group. A `conditions` key that is not a list makes an empty group.
pub(crate) fn lenient_group<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<ConditionDescriptor>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_norway::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(serde_norway::Value::Sequence(values)) => Ok(Some(parse_descriptors(values))),
        Some(other) => {
            warn!(?other, "condition group children are not a list");
            Ok(Some(Vec::new()))
        }
    }
}

/// Parse each entry on its own, dropping the ones that are not descriptors.
fn parse_descriptors(values: Vec<serde_norway::Value>) -> Vec<ConditionDescriptor> {
    values
        .into_iter()
        .filter_map(|value| match serde_norway::from_value(value) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                warn!(%err, "skipping malformed condition descriptor");
                None
            }
        })
        .collect()
}

/// Any present logic value is an operator. Values that are not text select AND.
fn lenient_logic<'de, D>(deserializer: D) -> Result<Option<Logic>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_norway::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let logic = serde_norway::from_value(value).unwrap_or_else(|err| {
        warn!(%err, "unreadable logic, using AND");
        Logic::And
    });

    Ok(Some(logic))
}

/// Optional value that is ignored, with a warning, when it does not parse.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<serde_norway::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match serde_norway::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            warn!(%err, "ignoring unreadable value");
            Ok(None)
        }
    }
}
