// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static table of named backend endpoints bundled with the application.

use serde::Deserialize;

use crate::kv::StoreError;

/// Named backend endpoint URLs.
///
/// Parsed once at startup (from the bundled document or a caller-supplied
/// one) and handed to the settings store by value; read-only thereafter.
/// Roles missing from the document simply resolve to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConnections {
    /// .NET package download service.
    #[serde(default)]
    pub dotnet_server_downloader: Option<String>,
    /// .NET evaluation server, FHIR R4B.
    #[serde(default)]
    pub dotnet_server_r4b: Option<String>,
    /// .NET evaluation server, FHIR R5.
    #[serde(default)]
    pub dotnet_server_r5: Option<String>,
    /// Java (HAPI) evaluation server, FHIR R4B.
    #[serde(default)]
    pub java_server_r4b: Option<String>,
    /// Java (HAPI) evaluation server, FHIR R5.
    #[serde(default)]
    pub java_server_r5: Option<String>,
    /// IBM evaluation server, FHIR R4B.
    #[serde(default)]
    pub ibm_server_r4b: Option<String>,
    /// Structure-map transform server.
    #[serde(default)]
    pub mapper_server: Option<String>,
    /// Python evaluation server, FHIR R4B.
    #[serde(default)]
    pub python_server_r4b: Option<String>,
}

impl ServerConnections {
    /// Parse a connections table from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(StoreError::from)
    }

    /// The connections table bundled with this build.
    pub fn bundled() -> Result<Self, StoreError> {
        Self::from_json(include_str!("../config/servers.json"))
    }
}
