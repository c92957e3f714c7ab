//! # Extracted Parameter DTOs
//!
//! Typed replacement for the free-form `extracted_data` map: a sum type over
//! component types, each with a typed record, plus a `Raw`/`RawText`
//! fallback for an oracle answer that doesn't fit a known schema.
//!
//! Field names follow `ai/models/types.py` and
//! `backend/data/models/components.py`.

use serde::{Deserialize, Serialize};

/// Closed set of armature values, tagged with the catalog's own vocabulary
/// (`backend/data/models/components.py`'s
/// `ArmatureType` string enum) rather than an English gloss, since this is
/// what both the oracle's extraction answers and the catalog's `armature`
/// column use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmatureType {
    #[serde(rename = "\u{433}\u{430}\u{439}\u{43a}\u{430}")]
    Nut,
    #[serde(rename = "\u{448}\u{442}\u{443}\u{446}\u{435}\u{440}")]
    Union,
    #[serde(rename = "\u{448}\u{442}\u{443}\u{446}\u{435}\u{440} \u{43a}\u{43e}\u{43d}\u{443}\u{441}\u{43d}\u{44b}\u{439}")]
    ConicalUnion,
}

impl ArmatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArmatureType::Nut => "\u{433}\u{430}\u{439}\u{43a}\u{430}",
            ArmatureType::Union => "\u{448}\u{442}\u{443}\u{446}\u{435}\u{440}",
            ArmatureType::ConicalUnion => {
                "\u{448}\u{442}\u{443}\u{446}\u{435}\u{440} \u{43a}\u{43e}\u{43d}\u{443}\u{441}\u{43d}\u{44b}\u{439}"
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FittingData {
    pub standard: Option<String>,
    #[serde(rename = "Dy")]
    pub dy: Option<i32>,
    pub thread: Option<String>,
    pub armature: Option<ArmatureType>,
    pub seria: Option<String>,
    pub angle: Option<i32>,
    pub removable_nut: Option<bool>,
    pub unstandard_thread: Option<bool>,
    #[serde(rename = "D_out")]
    pub d_out: Option<i32>,
    pub usit: Option<bool>,
    pub s_key: Option<String>,
    pub compact: Option<bool>,
    pub pin: Option<bool>,
    pub o_ring: Option<bool>,
    pub long: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdapterData {
    pub standard_1: Option<String>,
    pub standard_2: Option<String>,
    pub thread_1: Option<String>,
    pub thread_2: Option<String>,
    pub armature_1: Option<ArmatureType>,
    pub armature_2: Option<ArmatureType>,
    pub angle: Option<i32>,
    pub s_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlugData {
    pub standard: Option<String>,
    pub thread_type: Option<String>,
    pub thread: Option<String>,
    pub armature: Option<ArmatureType>,
    pub s_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdapterTeeData {
    pub standard_1: Option<String>,
    pub standard_2: Option<String>,
    pub standard_3: Option<String>,
    pub thread_1: Option<String>,
    pub thread_2: Option<String>,
    pub thread_3: Option<String>,
    pub armature_1: Option<ArmatureType>,
    pub armature_2: Option<ArmatureType>,
    pub armature_3: Option<ArmatureType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BanjoData {
    pub standard: Option<String>,
    pub thread: Option<String>,
    #[serde(rename = "Dy")]
    pub dy: Option<i32>,
    pub angle: Option<i32>,
    pub s_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BanjoBoltData {
    pub standard: Option<String>,
    pub thread: Option<String>,
    pub length: Option<i32>,
    pub s_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BrsData {
    pub standard: Option<String>,
    pub thread: Option<String>,
    #[serde(rename = "Dy")]
    pub dy: Option<i32>,
    pub s_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CouplingData {
    pub standard_1: Option<String>,
    pub standard_2: Option<String>,
    pub thread_1: Option<String>,
    pub thread_2: Option<String>,
    pub s_key: Option<String>,
}

/// Extracted parameters for a classified component, or one of the two
/// fallback shapes from `extract_params` contract: `Raw` for
/// a JSON body that parsed but didn't match a known component schema (field
/// drift between the oracle and the catalog's expectations), `RawText` for a
/// non-JSON oracle response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedData {
    Fitting(FittingData),
    Adapter(AdapterData),
    Plug(PlugData),
    AdapterTee(AdapterTeeData),
    Banjo(BanjoData),
    BanjoBolt(BanjoBoltData),
    Brs(BrsData),
    Coupling(CouplingData),
    Raw(serde_json::Value),
    RawText(String),
}

impl ExtractedData {
    /// Re-serialize to a flat JSON object for the catalog's generic filter
    /// pass (`CatalogAdapter` operates on attribute name → scalar).
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Build the typed record for `component_type` from a JSON object
    /// returned by the oracle. Used instead of `#[serde(untagged)]`
    /// auto-detection (ambiguous across all-optional structs) — the caller
    /// already knows the component type from the classify stage.
    pub fn from_component(component_type: crate::types::ComponentType, value: serde_json::Value) -> Self {
        use crate::types::ComponentType as CT;
        fn parse<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Option<T> {
            serde_json::from_value(value.clone()).ok()
        }
        match component_type {
            CT::Fittings => parse(&value).map(ExtractedData::Fitting),
            CT::Adapters => parse(&value).map(ExtractedData::Adapter),
            CT::Plugs => parse(&value).map(ExtractedData::Plug),
            CT::AdapterTee => parse(&value).map(ExtractedData::AdapterTee),
            CT::Banjo => parse(&value).map(ExtractedData::Banjo),
            CT::BanjoBolt => parse(&value).map(ExtractedData::BanjoBolt),
            CT::Brs => parse(&value).map(ExtractedData::Brs),
            CT::Coupling => parse(&value).map(ExtractedData::Coupling),
        }
        .unwrap_or(ExtractedData::Raw(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_data_serializes_dy_and_d_out_with_original_casing() {
        let data = FittingData {
            dy: Some(10),
            d_out: Some(16),
            thread: Some("12x1.5".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["Dy"], 10);
        assert_eq!(value["D_out"], 16);
    }

    #[test]
    fn raw_text_fallback_round_trips() {
        let extracted = ExtractedData::RawText("не указано".into());
        let json = serde_json::to_value(&extracted).unwrap();
        assert_eq!(json, serde_json::json!("не указано"));
    }

    #[test]
    fn raw_fallback_preserves_unknown_object_shape() {
        let extracted = ExtractedData::Raw(serde_json::json!({"weird_field": 42}));
        let json = extracted.as_json();
        assert_eq!(json["weird_field"], 42);
    }

    #[test]
    fn from_component_builds_typed_record_for_known_type() {
        let value = serde_json::json!({"standard": "DKOL", "Dy": 10, "thread": "12x1.5", "angle": 90});
        let extracted = ExtractedData::from_component(crate::types::ComponentType::Fittings, value);
        match extracted {
            ExtractedData::Fitting(data) => {
                assert_eq!(data.standard.as_deref(), Some("DKOL"));
                assert_eq!(data.dy, Some(10));
                assert_eq!(data.angle, Some(90));
            }
            other => panic!("expected Fitting, got {other:?}"),
        }
    }

    #[test]
    fn from_component_falls_back_to_raw_for_non_object_json() {
        let value = serde_json::json!([1, 2, 3]);
        let extracted = ExtractedData::from_component(crate::types::ComponentType::Brs, value.clone());
        match extracted {
            ExtractedData::Raw(v) => assert_eq!(v, value),
            other => panic!("expected Raw, got {other:?}"),
        }
    }
}
