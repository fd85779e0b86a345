//! Key-value persistence for rider preferences.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::location::UserLocation;
use crate::settings::NotificationSettings;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// String-to-string persistent map
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

pub const USER_NAME_KEY: &str = "userName";
pub const USER_LOCATION_KEY: &str = "userLocation";
pub const COLOR_SCHEME_KEY: &str = "colorScheme";
pub const HAS_SEEN_WELCOME_KEY: &str = "hasSeenWelcome";
pub const NOTIFICATION_SETTINGS_KEY: &str = "notificationSettings";

pub const DEFAULT_USER_NAME: &str = "Aggie";
pub const DEFAULT_COLOR_SCHEME: &str = "default";

#[derive(serde::Serialize, serde::Deserialize)]
struct ColorSchemeRecord {
    id: String,
}

/// Typed view over a [`KeyValueStore`].
///
/// Values that fail to decode read as their defaults.
#[derive(Debug, Default)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    pub fn user_name(&self) -> Result<String> {
        Ok(self
            .store
            .get(USER_NAME_KEY)?
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()))
    }

    /// Store a trimmed display name; a blank name reverts to the default
    pub fn set_user_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            self.store.remove(USER_NAME_KEY)
        } else {
            self.store.set(USER_NAME_KEY, name)
        }
    }

    pub fn user_location(&self) -> Result<Option<UserLocation>> {
        self.read_json(USER_LOCATION_KEY)
    }

    pub fn set_user_location(&mut self, location: Option<&UserLocation>) -> Result<()> {
        match location {
            Some(location) => self.write_json(USER_LOCATION_KEY, location),
            None => self.store.remove(USER_LOCATION_KEY),
        }
    }

    pub fn color_scheme(&self) -> Result<String> {
        Ok(self
            .read_json::<ColorSchemeRecord>(COLOR_SCHEME_KEY)?
            .map(|record| record.id)
            .unwrap_or_else(|| DEFAULT_COLOR_SCHEME.to_string()))
    }

    pub fn set_color_scheme(&mut self, id: &str) -> Result<()> {
        self.write_json(COLOR_SCHEME_KEY, &ColorSchemeRecord { id: id.to_string() })
    }

    pub fn has_seen_welcome(&self) -> Result<bool> {
        Ok(self.store.get(HAS_SEEN_WELCOME_KEY)?.as_deref() == Some("true"))
    }

    pub fn mark_welcome_seen(&mut self) -> Result<()> {
        self.store.set(HAS_SEEN_WELCOME_KEY, "true")
    }

    pub fn notification_settings(&self) -> Result<NotificationSettings> {
        Ok(self
            .read_json(NOTIFICATION_SETTINGS_KEY)?
            .unwrap_or_default())
    }

    pub fn set_notification_settings(&mut self, settings: &NotificationSettings) -> Result<()> {
        self.write_json(NOTIFICATION_SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;

    #[test]
    fn test_defaults_on_empty_store() {
        let prefs = Preferences::new(MemoryStore::new());

        assert_eq!(prefs.user_name().unwrap(), "Aggie");
        assert_eq!(prefs.user_location().unwrap(), None);
        assert_eq!(prefs.color_scheme().unwrap(), "default");
        assert!(!prefs.has_seen_welcome().unwrap());
        assert_eq!(
            prefs.notification_settings().unwrap(),
            NotificationSettings::default()
        );
    }

    #[test]
    fn test_user_name_is_trimmed() {
        let mut prefs = Preferences::new(MemoryStore::new());

        prefs.set_user_name("  Sam ").unwrap();
        assert_eq!(prefs.user_name().unwrap(), "Sam");

        prefs.set_user_name("   ").unwrap();
        assert_eq!(prefs.user_name().unwrap(), "Aggie");
    }

    #[test]
    fn test_round_trips_through_store() {
        let mut prefs = Preferences::new(MemoryStore::new());
        let location = UserLocation::named(38.54, -121.75, "Silo");
        let settings = NotificationSettings {
            theme: Theme::Dark,
            stops_away: 3,
            ..Default::default()
        };

        prefs.set_user_location(Some(&location)).unwrap();
        prefs.set_color_scheme("aggie-gold").unwrap();
        prefs.mark_welcome_seen().unwrap();
        prefs.set_notification_settings(&settings).unwrap();

        assert_eq!(prefs.user_location().unwrap(), Some(location));
        assert_eq!(prefs.color_scheme().unwrap(), "aggie-gold");
        assert!(prefs.has_seen_welcome().unwrap());
        assert_eq!(prefs.notification_settings().unwrap(), settings);

        let store = prefs.into_inner();
        assert_eq!(
            store.get(COLOR_SCHEME_KEY).unwrap().as_deref(),
            Some(r#"{"id":"aggie-gold"}"#)
        );

        let mut prefs = Preferences::new(store);
        prefs.set_user_location(None).unwrap();
        assert_eq!(prefs.user_location().unwrap(), None);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set(NOTIFICATION_SETTINGS_KEY, "{not json").unwrap();
        store.set(USER_LOCATION_KEY, "42").unwrap();
        store.set(COLOR_SCHEME_KEY, r#""plain""#).unwrap();

        let prefs = Preferences::new(store);
        assert_eq!(
            prefs.notification_settings().unwrap(),
            NotificationSettings::default()
        );
        assert_eq!(prefs.user_location().unwrap(), None);
        assert_eq!(prefs.color_scheme().unwrap(), "default");
    }

    #[test]
    fn test_boxed_store() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let mut prefs = Preferences::new(store);

        prefs.mark_welcome_seen().unwrap();
        assert!(prefs.has_seen_welcome().unwrap());
    }
}
