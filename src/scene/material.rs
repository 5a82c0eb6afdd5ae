// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material graph records: materials, elements and isotopes

use serde::{Deserialize, Serialize};

/// Unit-tagged property. The unit alone decides whether the property is
/// written; the value attribute follows only when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Quantity {
    pub fn new(unit: impl Into<String>, value: f64) -> Self {
        Self {
            unit: unit.into(),
            value: Some(value),
        }
    }
}

/// Constituent of a material or element, owned by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Component {
    /// Mass fraction of a named constituent.
    Fraction {
        n: f64,
        #[serde(rename = "ref")]
        reference: String,
    },
    /// Atom count of a named element.
    Composite {
        n: u32,
        #[serde(rename = "ref")]
        reference: String,
    },
}

impl Component {
    pub fn fraction(n: f64, reference: impl Into<String>) -> Self {
        Component::Fraction {
            n,
            reference: reference.into(),
        }
    }

    pub fn composite(n: u32, reference: impl Into<String>) -> Self {
        Component::Composite {
            n,
            reference: reference.into(),
        }
    }

    pub fn reference(&self) -> &str {
        match self {
            Component::Fraction { reference, .. } | Component::Composite { reference, .. } => {
                reference
            }
        }
    }
}

/// Sum of the mass fractions in `components`, if there are any.
pub fn fraction_sum(components: &[Component]) -> Option<f64> {
    let mut fractions = components.iter().filter_map(|c| match c {
        Component::Fraction { n, .. } => Some(*n),
        Component::Composite { .. } => None,
    });
    let first = fractions.next()?;
    Some(fractions.fold(first, |acc, n| acc + n))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(rename = "Z", default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<Quantity>,
    #[serde(rename = "D", default, skip_serializing_if = "Option::is_none")]
    pub density: Option<Quantity>,
    #[serde(rename = "T", default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Quantity>,
    #[serde(rename = "MEE", default, skip_serializing_if = "Option::is_none")]
    pub mean_excitation: Option<Quantity>,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// Chemical element, either given by `Z` and `atom` or by isotope fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(rename = "Z", default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<Quantity>,
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopeParams {
    #[serde(rename = "N")]
    pub n: u32,
    #[serde(rename = "Z")]
    pub z: f64,
    pub atom: Quantity,
}
