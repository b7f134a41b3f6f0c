// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transient snapshot of the most recent query session.

use serde::{Deserialize, Serialize};

/// A single variable binding supplied to the evaluation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableBinding {
    /// Variable name as referenced by the expression.
    pub name: String,
    /// Expression or literal bound to the name.
    pub expression: String,
}

/// Snapshot of the most recent query, written whenever the active query
/// changes and read once on session restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUsedParameters {
    /// Evaluation context the expression ran against.
    pub context: Option<String>,
    /// The expression text itself.
    pub expression: Option<String>,
    /// Id of the resource the expression ran against, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Raw resource JSON, when it was pasted rather than fetched by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_json: Option<String>,
    /// Which evaluation engine was selected.
    pub engine: String,
    /// Ordered variable bindings, when any were defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<VariableBinding>>,
    /// Set once the snapshot has been fully restored into the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_completed: Option<bool>,
}
