// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings store facade: the single point of access to persisted
//! preferences, last-used query state, and cached search state.
//!
//! Storage failures never reach the caller of a getter. Every read
//! degrades to its documented default, tagged with a [`ValueOrigin`]
//! recording whether the value was stored, missing, or unreadable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::kv::{KeyValueStore, StoreError};
use crate::last_used::LastUsedParameters;
use crate::servers::ServerConnections;
use crate::settings::{
    UserSettings, DEFAULT_FHIR_SERVER_URL, DEFAULT_NEW_CANONICAL_BASE, DEFAULT_PAGE_SIZE,
};

const KEY_FHIR_SERVER_URL: &str = "settings_fhirServerURL";
const KEY_OAUTH_CLIENT_ID: &str = "settings_OAuthClientId";
const KEY_FHIR_TERMINOLOGY_SERVER_URL: &str = "settings_fhirTerminologyServerURL";
const KEY_SYNC_FAVOURITES: &str = "settings_syncFavourites";
const KEY_FAVOURITES_LIST_ID: &str = "settings_favouritesListId";
const KEY_DEFAULT_PROVIDER_FIELD: &str = "settings_defaultProviderField";
const KEY_DEFAULT_NEW_CANONICAL_BASE: &str = "settings_defaultNewCanonicalBase";
const KEY_OPENAI_KEY: &str = "settings_openAIkey";
const KEY_OPENAI_BASE_PATH: &str = "settings_openAIBasePath";
const KEY_OPENAI_API_VERSION: &str = "settings_openAIApiVersion";
const KEY_OPENAI_MODEL: &str = "settings_openAIModel";
const KEY_SHOW_ADVANCED_SETTINGS: &str = "settings_showAdvancedSettings";
const KEY_PAGE_SIZE: &str = "settings_pageSize";
const KEY_LAST_USED: &str = "lastUsed";
const SEARCH_KEY_PREFIX: &str = "search_";

/// How a scalar getter produced its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    /// The stored value was read back.
    Stored,
    /// The key was absent; the documented default was substituted.
    MissingKey,
    /// The read or parse failed; the documented default was substituted.
    StoreFailure,
}

/// A settings value together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The value handed to the caller.
    pub value: T,
    /// Where the value came from.
    pub origin: ValueOrigin,
}

impl<T> Resolved<T> {
    fn stored(value: T) -> Self {
        Self { value, origin: ValueOrigin::Stored }
    }

    fn missing(value: T) -> Self {
        Self { value, origin: ValueOrigin::MissingKey }
    }

    fn failed(value: T) -> Self {
        Self { value, origin: ValueOrigin::StoreFailure }
    }

    /// True when the value was substituted rather than read back.
    pub fn is_defaulted(&self) -> bool {
        self.origin != ValueOrigin::Stored
    }

    /// Discard the origin tag.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Single point of access to persisted preferences and transient state.
///
/// Generic over the [`KeyValueStore`] port so shells inject their medium
/// (filesystem, browser storage bridge) and tests inject a double. The
/// server-connections table is supplied at construction; there is no
/// ambient configuration load.
pub struct SettingsStore<S> {
    store: S,
    servers: ServerConnections,
}

impl<S> SettingsStore<S> {
    /// Create a store over `store`, resolving server roles from `servers`.
    pub fn new(store: S, servers: ServerConnections) -> Self {
        Self { store, servers }
    }

    /// The server-connections table this store was built with.
    pub fn servers(&self) -> &ServerConnections {
        &self.servers
    }

    /// Consume the facade and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> SettingsStore<S>
where
    S: KeyValueStore,
{
    // ── scalar getters ──────────────────────────────────────────────

    /// Base URL of the FHIR data server, falling back to the fixed test
    /// server when nothing has been saved.
    pub fn fhir_server_url(&self) -> Resolved<String> {
        self.read_or(KEY_FHIR_SERVER_URL, DEFAULT_FHIR_SERVER_URL)
    }

    /// OAuth client id, when one has been saved.
    pub fn oauth_client_id(&self) -> Resolved<Option<String>> {
        self.read_raw(KEY_OAUTH_CLIENT_ID)
    }

    /// Base URL of the terminology server, falling back to the fixed test
    /// server when nothing has been saved.
    pub fn fhir_terminology_server_url(&self) -> Resolved<String> {
        self.read_or(KEY_FHIR_TERMINOLOGY_SERVER_URL, DEFAULT_FHIR_SERVER_URL)
    }

    /// Number of results per search page. A stored value that does not
    /// parse as a decimal integer falls back to the default.
    pub fn page_size(&self) -> Resolved<u32> {
        let raw = self.read_raw(KEY_PAGE_SIZE);
        match raw.value {
            Some(text) => match text.parse::<u32>() {
                Ok(size) => Resolved { value: size, origin: raw.origin },
                Err(_) => {
                    warn!(value = %text, "stored page size is not a number");
                    Resolved::failed(DEFAULT_PAGE_SIZE)
                }
            },
            None => Resolved { value: DEFAULT_PAGE_SIZE, origin: raw.origin },
        }
    }

    /// OpenAI API key, when one has been saved.
    pub fn openai_key(&self) -> Resolved<Option<String>> {
        self.read_raw(KEY_OPENAI_KEY)
    }

    /// OpenAI base path, when one has been saved.
    pub fn openai_base_path(&self) -> Resolved<Option<String>> {
        self.read_raw(KEY_OPENAI_BASE_PATH)
    }

    /// OpenAI API version, when one has been saved.
    pub fn openai_api_version(&self) -> Resolved<Option<String>> {
        self.read_raw(KEY_OPENAI_API_VERSION)
    }

    /// OpenAI model name, when one has been saved.
    pub fn openai_model(&self) -> Resolved<Option<String>> {
        self.read_raw(KEY_OPENAI_MODEL)
    }

    /// Whether the advanced settings pane is shown. Any stored value other
    /// than the empty string counts as true; absence is false.
    pub fn show_advanced_settings(&self) -> Resolved<bool> {
        let raw = self.read_raw(KEY_SHOW_ADVANCED_SETTINGS);
        Resolved {
            value: raw.value.is_some_and(|v| !v.is_empty()),
            origin: raw.origin,
        }
    }

    // ── whole-record load/save ──────────────────────────────────────

    /// Assemble the full settings record in one pass, applying the same
    /// per-field defaults as the scalar getters. `show_ai_key` is never
    /// persisted and always starts false.
    pub fn load(&self) -> UserSettings {
        UserSettings {
            fhir_server_url: self.fhir_server_url().into_value(),
            oauth_client_id: self.oauth_client_id().into_value(),
            fhir_terminology_server_url: self.fhir_terminology_server_url().into_value(),
            sync_favourites: self.read_raw(KEY_SYNC_FAVOURITES).value.as_deref() == Some("true"),
            favourites_list_id: self.read_raw(KEY_FAVOURITES_LIST_ID).into_value(),
            default_provider_field: self.read_raw(KEY_DEFAULT_PROVIDER_FIELD).into_value(),
            default_new_canonical_base: self
                .read_or(KEY_DEFAULT_NEW_CANONICAL_BASE, DEFAULT_NEW_CANONICAL_BASE)
                .into_value(),
            openai_key: self.openai_key().into_value(),
            openai_base_path: self.openai_base_path().into_value(),
            openai_api_version: self.openai_api_version().into_value(),
            openai_model: self.openai_model().into_value(),
            show_ai_key: false,
            show_advanced_settings: self.show_advanced_settings().into_value(),
            page_size: self.page_size().into_value(),
        }
    }

    /// Write every field back, one key per field.
    ///
    /// Writes are not transactional: the first failing write aborts the
    /// pass and earlier fields stay updated; there is no rollback.
    pub fn save(&self, settings: &UserSettings) -> Result<(), StoreError> {
        self.write_url(KEY_FHIR_SERVER_URL, &settings.fhir_server_url)?;
        self.write_opt(KEY_OAUTH_CLIENT_ID, settings.oauth_client_id.as_deref())?;
        self.write_url(KEY_FHIR_TERMINOLOGY_SERVER_URL, &settings.fhir_terminology_server_url)?;
        self.write_flag(KEY_SYNC_FAVOURITES, settings.sync_favourites)?;
        // The list id only persists while sync is on.
        let list_id = if settings.sync_favourites {
            settings.favourites_list_id.as_deref()
        } else {
            None
        };
        self.write_opt(KEY_FAVOURITES_LIST_ID, list_id)?;
        self.write_opt(KEY_DEFAULT_PROVIDER_FIELD, settings.default_provider_field.as_deref())?;
        self.write_opt(
            KEY_DEFAULT_NEW_CANONICAL_BASE,
            Some(settings.default_new_canonical_base.as_str()),
        )?;
        self.write_opt(KEY_OPENAI_KEY, settings.openai_key.as_deref())?;
        self.write_opt(KEY_OPENAI_BASE_PATH, settings.openai_base_path.as_deref())?;
        self.write_opt(KEY_OPENAI_API_VERSION, settings.openai_api_version.as_deref())?;
        self.write_opt(KEY_OPENAI_MODEL, settings.openai_model.as_deref())?;
        self.write_flag(KEY_SHOW_ADVANCED_SETTINGS, settings.show_advanced_settings)?;
        if settings.page_size == 0 {
            self.store.remove(KEY_PAGE_SIZE)?;
        } else {
            self.store.set(KEY_PAGE_SIZE, &settings.page_size.to_string())?;
        }
        Ok(())
    }

    // ── last-used query state ───────────────────────────────────────

    /// Persist the last-used query snapshot, or clear it with `None`.
    pub fn save_last_used(&self, data: Option<&LastUsedParameters>) -> Result<(), StoreError> {
        match data {
            Some(params) => {
                let json = serde_json::to_string(params)?;
                self.store.set(KEY_LAST_USED, &json)
            }
            None => self.store.remove(KEY_LAST_USED),
        }
    }

    /// The last-used query snapshot, if one was saved and still decodes.
    pub fn last_used(&self) -> Option<LastUsedParameters> {
        self.read_blob(KEY_LAST_USED)
    }

    // ── cached search state ─────────────────────────────────────────

    /// Cached search state for `kind`, if present and still decodable.
    ///
    /// `kind` is caller-defined (typically a resource type name); no
    /// validation is applied.
    pub fn search_data<T>(&self, kind: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.read_blob(&search_key(kind))
    }

    /// Cache search state for `kind`, or clear it with `None`.
    pub fn save_search_data<T>(&self, kind: &str, data: Option<&T>) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let key = search_key(kind);
        match data {
            Some(value) => {
                let json = serde_json::to_string(value)?;
                self.store.set(&key, &json)
            }
            None => self.store.remove(&key),
        }
    }

    // ── raw helpers ─────────────────────────────────────────────────

    /// Read an optional raw value. Absence and failed reads both collapse
    /// to a tagged `None`; failures are logged here, once.
    fn read_raw(&self, key: &str) -> Resolved<Option<String>> {
        match self.store.get(key) {
            Ok(value) => Resolved::stored(Some(value)),
            Err(StoreError::NotFound) => Resolved::missing(None),
            Err(err) => {
                warn!(key, error = %err, "failed to read configuration value");
                Resolved::failed(None)
            }
        }
    }

    /// Read a required scalar, substituting `default` when absent.
    fn read_or(&self, key: &str, default: &str) -> Resolved<String> {
        let raw = self.read_raw(key);
        Resolved {
            value: raw.value.unwrap_or_else(|| default.to_owned()),
            origin: raw.origin,
        }
    }

    /// Read a JSON blob. Absence, storage failure, and a malformed payload
    /// all collapse to `None`; failures are logged.
    fn read_blob<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let json = match self.store.get(key) {
            Ok(json) => json,
            Err(StoreError::NotFound) => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read stored state");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "stored state is not valid JSON; ignoring");
                None
            }
        }
    }

    /// Write a URL field: exactly one trailing slash is stripped, and an
    /// empty value leaves the stored key untouched.
    fn write_url(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let trimmed = value.strip_suffix('/').unwrap_or(value);
        if trimmed.is_empty() {
            return Ok(());
        }
        self.store.set(key, trimmed)
    }

    /// Write an optional string field: empty or absent removes the key,
    /// and a later load falls back to the field's default.
    fn write_opt(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(v) if !v.is_empty() => self.store.set(key, v),
            _ => self.store.remove(key),
        }
    }

    /// Booleans persist as the literal `"true"`; false removes the key.
    fn write_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        if value {
            self.store.set(key, "true")
        } else {
            self.store.remove(key)
        }
    }

    // ── server-endpoint accessors ───────────────────────────────────

    /// URL of the .NET package download service.
    pub fn dotnet_server_downloader(&self) -> Option<&str> {
        self.servers.dotnet_server_downloader.as_deref()
    }

    /// URL of the .NET evaluation server (FHIR R4B).
    pub fn dotnet_server_r4b(&self) -> Option<&str> {
        self.servers.dotnet_server_r4b.as_deref()
    }

    /// URL of the .NET evaluation server (FHIR R5).
    pub fn dotnet_server_r5(&self) -> Option<&str> {
        self.servers.dotnet_server_r5.as_deref()
    }

    /// URL of the Java evaluation server (FHIR R4B).
    pub fn java_server_r4b(&self) -> Option<&str> {
        self.servers.java_server_r4b.as_deref()
    }

    /// URL of the Java evaluation server (FHIR R5).
    pub fn java_server_r5(&self) -> Option<&str> {
        self.servers.java_server_r5.as_deref()
    }

    /// URL of the IBM evaluation server (FHIR R4B).
    pub fn ibm_server_r4b(&self) -> Option<&str> {
        self.servers.ibm_server_r4b.as_deref()
    }

    /// URL of the structure-map transform server.
    pub fn mapper_server(&self) -> Option<&str> {
        self.servers.mapper_server.as_deref()
    }

    /// URL of the Python evaluation server (FHIR R4B).
    pub fn python_server_r4b(&self) -> Option<&str> {
        self.servers.python_server_r4b.as_deref()
    }
}

fn search_key(kind: &str) -> String {
    format!("{SEARCH_KEY_PREFIX}{kind}")
}
