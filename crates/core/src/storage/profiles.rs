use crate::domain::profile::{Profile, ProfileField, Responses};
use crate::error::ProfileError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Flat-file profile store.
///
/// The whole map is rewritten on every mutation. Writes go to a sibling temp
/// file that is then renamed over the target, so readers never see a torn file.
/// A single mutex covers mutate + persist, and the in-memory map only changes
/// after the file has been written.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: Mutex<BTreeMap<String, Profile>>,
}

impl ProfileStore {
    /// Loads every stored profile. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let path = path.into();
        let profiles = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<BTreeMap<String, Profile>>(&bytes).map_err(
                |source| ProfileError::Json {
                    path: path.clone(),
                    source,
                },
            )?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(ProfileError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), profiles = profiles.len(), "profile store loaded");

        Ok(Self {
            path,
            profiles: Mutex::new(profiles),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Builds a profile from questionnaire answers and inserts (or replaces) it.
    pub fn create_profile(
        &self,
        user_id: &str,
        responses: &Responses,
    ) -> Result<Profile, ProfileError> {
        let profile = Profile::from_responses(user_id, responses)?;

        let mut profiles = self.lock();
        let mut next = profiles.clone();
        let replaced = next.insert(user_id.to_string(), profile.clone()).is_some();
        self.persist(&next)?;
        *profiles = next;

        tracing::info!(user_id, replaced, "profile saved");
        Ok(profile)
    }

    pub fn get_profile(&self, user_id: &str) -> Option<Profile> {
        self.lock().get(user_id).cloned()
    }

    /// Applies field updates keyed by profile attribute name.
    ///
    /// Unknown keys and invalid values reject the whole update; nothing is
    /// written unless every key applies cleanly.
    pub fn update_profile(
        &self,
        user_id: &str,
        updates: &Responses,
    ) -> Result<Profile, ProfileError> {
        let mut profiles = self.lock();
        let Some(current) = profiles.get(user_id) else {
            return Err(ProfileError::NotFound(user_id.to_string()));
        };

        let mut updated = current.clone();
        let mut errors = Vec::new();
        for (key, value) in updates {
            let Some(field) = ProfileField::parse(key) else {
                return Err(ProfileError::UnknownField(key.clone()));
            };
            if let Err(e) = updated.set_field(field, value) {
                errors.push(e);
            }
        }
        if !errors.is_empty() {
            return Err(ProfileError::Validation(errors));
        }

        let mut next = profiles.clone();
        next.insert(user_id.to_string(), updated.clone());
        self.persist(&next)?;
        *profiles = next;

        tracing::info!(user_id, fields = updates.len(), "profile updated");
        Ok(updated)
    }

    pub fn user_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Profile>> {
        // The map is only replaced after a successful persist, so a poisoned
        // guard still holds a consistent snapshot.
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, profiles: &BTreeMap<String, Profile>) -> Result<(), ProfileError> {
        let io_err = |source| ProfileError::Io {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_vec_pretty(profiles).map_err(|source| ProfileError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!(
            path = %self.path.display(),
            profiles = profiles.len(),
            "profile store persisted"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "profiles.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
