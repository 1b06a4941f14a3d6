// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Filter rules and the request envelopes sent to the rules endpoint.
//
// Response envelopes live in `response`. All shapes mirror the platform's
// JSON exactly; there are no invariants beyond the wire schema.

mod response;

pub use response::{
    AddRulesError, AddRulesMeta, AddRulesResponse, AddSummary, DeleteErrorDetail,
    DeleteRulesError, DeleteRulesMeta, DeleteRulesResponse, DeleteSummary, ListRulesMeta,
    ListRulesResponse, ValidateRulesError, ValidateRulesResponse,
};

use serde::{Deserialize, Serialize};

/// A server-side filter rule.
///
/// `id` is assigned by the server and stays empty until the rule exists
/// remotely. Empty `id` and `tag` are left out of request bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(
        default,
        deserialize_with = "response::null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(default, deserialize_with = "response::null_as_default")]
    pub value: String,
    #[serde(
        default,
        deserialize_with = "response::null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub tag: String,
}

impl Rule {
    pub fn new(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            value: value.into(),
            tag: tag.into(),
        }
    }

    /// Parse `VALUE[::TAG]`. The tag separator is `::` because `:` is common
    /// inside filter operators (`from:`, `lang:`).
    pub fn parse(input: &str) -> Self {
        match input.rsplit_once("::") {
            Some((value, tag)) => Rule::new(value, tag),
            None => Rule::new(input, ""),
        }
    }
}

/// Body of an add or validate request: `{"add":[...]}`.
#[derive(Debug, Serialize)]
pub struct AddRulesRequest<'a> {
    pub add: &'a [Rule],
}

/// Body of a delete request: `{"delete":{"ids":[...]}}`.
#[derive(Debug, Serialize)]
pub struct DeleteRulesRequest<'a> {
    pub delete: RuleIds<'a>,
}

#[derive(Debug, Serialize)]
pub struct RuleIds<'a> {
    pub ids: &'a [String],
}

impl<'a> DeleteRulesRequest<'a> {
    pub fn new(ids: &'a [String]) -> Self {
        Self {
            delete: RuleIds { ids },
        }
    }
}
