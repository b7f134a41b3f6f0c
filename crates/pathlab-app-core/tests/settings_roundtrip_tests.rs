// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Save/load round-trip behavior of the full settings record.

#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use pathlab_app_core::kv::{KeyValueStore, MemoryStore, StoreError};
use pathlab_app_core::servers::ServerConnections;
use pathlab_app_core::settings::{
    UserSettings, DEFAULT_FHIR_SERVER_URL, DEFAULT_NEW_CANONICAL_BASE, DEFAULT_PAGE_SIZE,
};
use pathlab_app_core::store::SettingsStore;

fn store_over(backing: &MemoryStore) -> SettingsStore<&MemoryStore> {
    SettingsStore::new(backing, ServerConnections::default())
}

fn populated() -> UserSettings {
    UserSettings {
        fhir_server_url: "https://fhir.example.org/r4".into(),
        oauth_client_id: Some("client-123".into()),
        fhir_terminology_server_url: "https://tx.example.org/r4".into(),
        sync_favourites: true,
        favourites_list_id: Some("fav-list-9".into()),
        default_provider_field: Some("Example Org".into()),
        default_new_canonical_base: "https://example.org/canon".into(),
        openai_key: Some("sk-test".into()),
        openai_base_path: Some("https://ai.example.org".into()),
        openai_api_version: Some("2023-03-15-preview".into()),
        openai_model: Some("gpt-4".into()),
        show_ai_key: false,
        show_advanced_settings: true,
        page_size: 25,
    }
}

#[test]
fn empty_storage_loads_the_documented_default_record() {
    let backing = MemoryStore::new();
    let loaded = store_over(&backing).load();
    assert_eq!(loaded, UserSettings::default());
    assert_eq!(loaded.fhir_server_url, DEFAULT_FHIR_SERVER_URL);
    assert_eq!(loaded.fhir_terminology_server_url, DEFAULT_FHIR_SERVER_URL);
    assert_eq!(loaded.default_new_canonical_base, DEFAULT_NEW_CANONICAL_BASE);
    assert_eq!(loaded.page_size, DEFAULT_PAGE_SIZE);
    assert!(!loaded.sync_favourites);
    assert!(!loaded.show_advanced_settings);
    assert!(loaded.oauth_client_id.is_none());
}

#[test]
fn save_then_load_round_trips_a_full_record() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let settings = populated();
    store.save(&settings).expect("save should succeed");
    assert_eq!(store.load(), settings);
}

#[test]
fn trailing_slash_is_stripped_exactly_once() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    settings.fhir_server_url = "https://fhir.example.org/r4/".into();
    settings.fhir_terminology_server_url = "https://tx.example.org/r4//".into();
    store.save(&settings).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.fhir_server_url, "https://fhir.example.org/r4");
    // Only one slash comes off; a doubled slash keeps the inner one.
    assert_eq!(loaded.fhir_terminology_server_url, "https://tx.example.org/r4/");
}

#[test]
fn empty_url_leaves_the_previously_saved_value_alone() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    store.save(&settings).unwrap();

    settings.fhir_server_url = String::new();
    store.save(&settings).unwrap();
    assert_eq!(store.load().fhir_server_url, "https://fhir.example.org/r4");
}

#[test]
fn empty_optional_fields_fall_back_to_their_defaults() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    settings.oauth_client_id = Some(String::new());
    settings.default_provider_field = None;
    settings.default_new_canonical_base = String::new();
    store.save(&settings).unwrap();

    let loaded = store.load();
    assert!(loaded.oauth_client_id.is_none());
    assert!(loaded.default_provider_field.is_none());
    assert_eq!(loaded.default_new_canonical_base, DEFAULT_NEW_CANONICAL_BASE);
}

#[test]
fn sync_favourites_persists_as_the_literal_true() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    store.save(&settings).unwrap();
    assert_eq!(backing.get("settings_syncFavourites").unwrap(), "true");

    settings.sync_favourites = false;
    store.save(&settings).unwrap();
    assert!(matches!(
        backing.get("settings_syncFavourites"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn favourites_list_id_is_gated_on_the_sync_flag() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    settings.sync_favourites = false;
    store.save(&settings).unwrap();
    assert!(store.load().favourites_list_id.is_none());

    settings.sync_favourites = true;
    store.save(&settings).unwrap();
    assert_eq!(store.load().favourites_list_id.as_deref(), Some("fav-list-9"));
}

#[test]
fn ai_key_visibility_is_never_persisted() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    settings.show_ai_key = true;
    store.save(&settings).unwrap();
    assert!(!store.load().show_ai_key);
}

#[test]
fn page_size_zero_falls_back_to_the_default_on_reload() {
    let backing = MemoryStore::new();
    let store = store_over(&backing);
    let mut settings = populated();
    store.save(&settings).unwrap();

    settings.page_size = 0;
    store.save(&settings).unwrap();
    assert_eq!(store.load().page_size, DEFAULT_PAGE_SIZE);
}

#[test]
fn a_failed_save_leaves_earlier_fields_written() {
    // A store that accepts a fixed number of writes and then fails:
    // exercises the documented no-rollback behavior.
    struct Budgeted<'a> {
        inner: &'a MemoryStore,
        left: std::cell::Cell<u32>,
    }

    impl KeyValueStore for Budgeted<'_> {
        fn get(&self, key: &str) -> Result<String, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.left.get() == 0 {
                return Err(StoreError::Other("write budget exhausted".into()));
            }
            self.left.set(self.left.get() - 1);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    let backing = MemoryStore::new();
    let budgeted = Budgeted { inner: &backing, left: std::cell::Cell::new(1) };
    let store = SettingsStore::new(budgeted, ServerConnections::default());

    assert!(store.save(&populated()).is_err());
    // The first write (the server URL) landed before the failure.
    assert_eq!(backing.get("settings_fhirServerURL").unwrap(), "https://fhir.example.org/r4");
    assert!(matches!(backing.get("settings_openAIkey"), Err(StoreError::NotFound)));
}
