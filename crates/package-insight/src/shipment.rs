use serde::{Deserialize, Serialize};

/// Carrier-sourced facts about a shipment, looked up by tracking number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageAttributes {
    #[serde(default)]
    pub dimensions: Option<PackageDimensions>,
    #[serde(default)]
    pub weight: Option<PackageWeight>,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub address_type: Option<String>,
    #[serde(default)]
    pub shipping_type: Option<String>,
}

impl PackageAttributes {
    /// Cubic index used by CII scoring. Units are whatever the caller normalized to.
    pub fn cubic_index(&self) -> Option<f64> {
        self.dimensions.as_ref().map(PackageDimensions::volume)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl PackageDimensions {
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    In,
    Cm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageWeight {
    pub value: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightUnit {
    #[default]
    Lb,
    Kg,
}

/// Where the shipment was picked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

impl Origin {
    /// City, state and country joined by single spaces; blank parts are skipped.
    pub fn descriptor(&self) -> String {
        [&self.city, &self.state, &self.country]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_descriptor_skips_blank_parts() {
        let origin = Origin {
            city: "Memphis".to_string(),
            state: " ".to_string(),
            country: "US".to_string(),
        };
        assert_eq!(origin.descriptor(), "Memphis US");
    }

    #[test]
    fn cubic_index_requires_dimensions() {
        let mut attributes = PackageAttributes::default();
        assert_eq!(attributes.cubic_index(), None);

        attributes.dimensions = Some(PackageDimensions {
            length: 10.0,
            width: 4.0,
            height: 2.5,
            unit: DimensionUnit::In,
        });
        assert_eq!(attributes.cubic_index(), Some(100.0));
    }

    #[test]
    fn units_use_carrier_spelling() {
        let weight: PackageWeight =
            serde_json::from_str(r#"{"value": 2.5, "unit": "KG"}"#).expect("weight parses");
        assert_eq!(weight.unit, WeightUnit::Kg);

        let dims: PackageDimensions =
            serde_json::from_str(r#"{"length": 1, "width": 2, "height": 3, "unit": "cm"}"#)
                .expect("dimensions parse");
        assert_eq!(dims.unit, DimensionUnit::Cm);
    }
}
