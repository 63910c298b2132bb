//! UI preferences: whether to skip the role selection and which role to use

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::ProfileKind;
use crate::ports::{keys, KeyValueStore, WriteBatch};

/// Preferences service over `skipUserTypeSelection` and `defaultUserType`
pub struct PreferencesService {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn skip_user_type_selection(&self) -> Result<bool> {
        Ok(self.store.get(keys::SKIP_USER_TYPE_SELECTION)?.as_deref() == Some("true"))
    }

    /// Stored default role; unreadable values count as unset
    pub fn default_user_type(&self) -> Result<Option<ProfileKind>> {
        Ok(self
            .store
            .get(keys::DEFAULT_USER_TYPE)?
            .and_then(|raw| raw.parse().ok()))
    }

    /// Set or clear the default role together with the skip flag
    pub fn set_default_user_type(&self, kind: Option<ProfileKind>, skip: bool) -> Result<()> {
        let mut batch = WriteBatch::new();
        match kind {
            Some(kind) => batch.set(keys::DEFAULT_USER_TYPE, kind.as_str()),
            None => batch.remove(keys::DEFAULT_USER_TYPE),
        };
        batch.set(keys::SKIP_USER_TYPE_SELECTION, skip.to_string());
        self.store.apply(batch)
    }

    /// Role to log in with when none was asked for explicitly
    pub fn preferred_login_profile(&self) -> Result<Option<ProfileKind>> {
        if !self.skip_user_type_selection()? {
            return Ok(None);
        }
        self.default_user_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    #[test]
    fn test_defaults_when_unset() {
        let prefs = PreferencesService::new(Arc::new(MemoryStore::new()));
        assert!(!prefs.skip_user_type_selection().unwrap());
        assert_eq!(prefs.default_user_type().unwrap(), None);
        assert_eq!(prefs.preferred_login_profile().unwrap(), None);
    }

    #[test]
    fn test_preferred_profile_requires_skip_flag() {
        let prefs = PreferencesService::new(Arc::new(MemoryStore::new()));

        prefs.set_default_user_type(Some(ProfileKind::Driver), false).unwrap();
        assert_eq!(prefs.default_user_type().unwrap(), Some(ProfileKind::Driver));
        assert_eq!(prefs.preferred_login_profile().unwrap(), None);

        prefs.set_default_user_type(Some(ProfileKind::Driver), true).unwrap();
        assert_eq!(prefs.preferred_login_profile().unwrap(), Some(ProfileKind::Driver));

        prefs.set_default_user_type(None, false).unwrap();
        assert_eq!(prefs.default_user_type().unwrap(), None);
    }
}
