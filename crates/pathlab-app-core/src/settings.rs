// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The user settings record persisted by the settings store.

use serde::{Deserialize, Serialize};

/// Fixed FHIR test server used when no server URL has been saved.
pub const DEFAULT_FHIR_SERVER_URL: &str = "https://sqlonfhir-r4.azurewebsites.net/fhir";

/// Canonical base applied to newly authored resources when none is saved.
pub const DEFAULT_NEW_CANONICAL_BASE: &str = "http://fhir.forms-lab.org/examples";

/// Search page size used when none is saved (or the saved one fails to parse).
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The full set of user preferences, saved and loaded as one unit.
///
/// This is a singleton record: there is no identity beyond "the current
/// settings", and a save overwrites every field's key. Wire names follow
/// the UI-facing JSON interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Base URL of the FHIR data server (stored without a trailing slash).
    pub fhir_server_url: String,
    /// OAuth client id used when the data server requires sign-in.
    #[serde(rename = "OAuthClientId")]
    pub oauth_client_id: Option<String>,
    /// Base URL of the terminology server (stored without a trailing slash).
    pub fhir_terminology_server_url: String,
    /// Whether favourites sync to a server-side list.
    pub sync_favourites: bool,
    /// Id of the server-side favourites list; only meaningful while
    /// `sync_favourites` is set.
    pub favourites_list_id: Option<String>,
    /// Default publisher/provider value offered when authoring resources.
    pub default_provider_field: Option<String>,
    /// Canonical base URL offered for newly authored resources.
    pub default_new_canonical_base: String,
    /// OpenAI API key.
    #[serde(rename = "openAIKey")]
    pub openai_key: Option<String>,
    /// OpenAI base path; empty uses the vendor default rather than Azure.
    #[serde(rename = "openAIBasePath")]
    pub openai_base_path: Option<String>,
    /// OpenAI API version, e.g. `2023-03-15-preview`.
    #[serde(rename = "openAIApiVersion")]
    pub openai_api_version: Option<String>,
    /// OpenAI model name, e.g. `gpt-4`.
    #[serde(rename = "openAIModel")]
    pub openai_model: Option<String>,
    /// UI-only flag: reveal the AI key field. Never persisted; always
    /// starts false.
    #[serde(rename = "showAIKey")]
    pub show_ai_key: bool,
    /// Whether the advanced settings pane is shown.
    pub show_advanced_settings: bool,
    /// Number of results per search page.
    pub page_size: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            fhir_server_url: DEFAULT_FHIR_SERVER_URL.to_owned(),
            oauth_client_id: None,
            fhir_terminology_server_url: DEFAULT_FHIR_SERVER_URL.to_owned(),
            sync_favourites: false,
            favourites_list_id: None,
            default_provider_field: None,
            default_new_canonical_base: DEFAULT_NEW_CANONICAL_BASE.to_owned(),
            openai_key: None,
            openai_base_path: None,
            openai_api_version: None,
            openai_model: None,
            show_ai_key: false,
            show_advanced_settings: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
