use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::Path;

use crate::error::{ConfigurationError, PipelineError};

/// Name of the synthetic item standing for an unfilled slot
pub const EMPTY_ITEM: &str = "empty";

/// Key of the totals row in the allocation table
pub const TOTAL_KEY: &str = "total";

/// A candidate consumer of slots, with a fixed revenue and cost per slot.
///
/// Deserializes from a row of the input table (`name`, `revenue`, `cost`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogItem {
    pub name: String,
    #[serde(rename = "revenue")]
    pub revenue_per_slot: f64,
    #[serde(rename = "cost")]
    pub cost_per_slot: f64,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, revenue_per_slot: f64, cost_per_slot: f64) -> Self {
        Self {
            name: name.into(),
            revenue_per_slot,
            cost_per_slot,
        }
    }

    /// The item that earns nothing and costs `empty_slot_cost` per slot it occupies
    pub fn empty(empty_slot_cost: f64) -> Self {
        Self::new(EMPTY_ITEM, 0.0, empty_slot_cost)
    }

    pub fn is_empty_slot(&self) -> bool {
        self.name == EMPTY_ITEM
    }
}

/// An ordered, validated sequence of items ending with the synthetic empty item.
///
/// Item names are unique, none collides with [`EMPTY_ITEM`] or [`TOTAL_KEY`],
/// and every coefficient is finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Validate `items` and append the empty item
    pub fn new(
        items: Vec<CatalogItem>,
        empty_slot_cost: f64,
    ) -> Result<Self, ConfigurationError> {
        if items.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }
        if !is_non_negative(empty_slot_cost) {
            return Err(ConfigurationError::InvalidEmptySlotCost(empty_slot_cost));
        }

        let mut seen = BTreeSet::new();
        for item in &items {
            validate_item(item)?;
            if !seen.insert(item.name.as_str()) {
                return Err(ConfigurationError::DuplicateItem(item.name.clone()));
            }
        }

        let mut items = items;
        items.push(CatalogItem::empty(empty_slot_cost));
        Ok(Self { items })
    }

    /// Read the input table from a YAML file and build a catalog from it
    pub fn load(path: &Path, empty_slot_cost: f64) -> Result<Self, PipelineError> {
        let buf = read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let items: Vec<CatalogItem> =
            serde_yaml::from_str(&buf).map_err(|source| PipelineError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(items, empty_slot_cost)?)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: the empty item is always present
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Per-slot revenue of every item, in catalog order
    pub fn revenue_coefficients(&self) -> impl Iterator<Item = f64> + '_ {
        self.items.iter().map(|item| item.revenue_per_slot)
    }

    /// Per-slot cost of every item, in catalog order
    pub fn cost_coefficients(&self) -> impl Iterator<Item = f64> + '_ {
        self.items.iter().map(|item| item.cost_per_slot)
    }
}

fn validate_item(item: &CatalogItem) -> Result<(), ConfigurationError> {
    if item.name == EMPTY_ITEM || item.name == TOTAL_KEY {
        return Err(ConfigurationError::ReservedItemName(item.name.clone()));
    }
    for (field, value) in [
        ("revenue", item.revenue_per_slot),
        ("cost", item.cost_per_slot),
    ] {
        if !is_non_negative(value) {
            return Err(ConfigurationError::InvalidCoefficient {
                item: item.name.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

pub(crate) fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
