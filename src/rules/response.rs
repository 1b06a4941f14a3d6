// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Rule;

/// Absent and explicit `null` both decode to the field's default. The API
/// sends `"data": null` for an empty rule set.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Add / validate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_created: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invalid: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRulesMeta {
    /// When the server produced the response.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sent: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: AddSummary,
}

/// A rule the server refused to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRulesError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    /// Id of the existing rule for duplicate-rule errors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRulesResponse {
    /// Rules as created, with their server-assigned ids.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Rule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: AddRulesMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<AddRulesError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRulesError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRulesResponse {
    /// The validated rules echoed back.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Rule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: AddRulesMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ValidateRulesError>,
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_deleted: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRulesMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sent: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: DeleteSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteErrorDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteRulesError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<DeleteErrorDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteRulesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: DeleteRulesMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<DeleteRulesError>,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRulesMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sent: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRulesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Rule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: ListRulesMeta,
}
