//=========================================================================
// Game Store
//=========================================================================
//
// Persistence of users, game states and mushrooms.
//
// Architecture:
//   GameStore (trait)
//     ├─ MemoryStore: StoreData only
//     └─ JsonStore:   StoreData + file, rewritten after every mutation
//
// The JSON document is written to a sibling temp file and renamed over
// the previous file. Readers see either the old or the new document.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::game::model::{timestamp_now, GameState, Mushroom, User, MAX_ALIVE_MUSHROOMS};

//=== StoreError ==========================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("user {user_id} already has {limit} living mushrooms")]
    MushroomLimit { user_id: String, limit: usize },
}

//=== GameStore ===========================================================

/// Synchronous persistence interface used by the scenes.
pub trait GameStore {
    /// All users, most recently updated first.
    fn get_all_users(&self) -> Result<Vec<User>, StoreError>;

    fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Creates a user and returns its id.
    fn create_user(&mut self, username: &str) -> Result<String, StoreError>;

    /// The user's game state, or `None` before their first visit.
    fn get_full_game_state(&self, user_id: &str) -> Result<Option<GameState>, StoreError>;

    /// Creates or updates the user's game state.
    fn save_game_state(&mut self, user_id: &str, money: i64, days: u32) -> Result<GameState, StoreError>;

    /// The user's mushrooms in adoption order, dead ones included.
    fn get_user_mushrooms(&self, user_id: &str) -> Result<Vec<Mushroom>, StoreError>;

    fn get_mushroom(&self, mushroom_id: &str) -> Result<Option<Mushroom>, StoreError>;

    fn count_alive_mushrooms(&self, user_id: &str) -> Result<usize, StoreError>;

    /// Inserts or updates a mushroom. Inserting a living mushroom fails
    /// once the owner already has [`MAX_ALIVE_MUSHROOMS`].
    fn save_mushroom(&mut self, mushroom: &Mushroom) -> Result<(), StoreError>;
}

//=== StoreData ===========================================================

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    users: Vec<User>,
    game_states: Vec<GameState>,
    mushrooms: Vec<Mushroom>,
}

impl StoreData {
    fn all_users(&self) -> Vec<User> {
        // Reverse first so equal timestamps list the newest user first.
        let mut users: Vec<User> = self.users.iter().rev().cloned().collect();
        users.sort_by(|a, b| b.updated.cmp(&a.updated));
        users
    }

    fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    fn require_user(&self, user_id: &str) -> Result<(), StoreError> {
        match self.user(user_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::UnknownUser(user_id.to_string())),
        }
    }

    fn create_user(&mut self, username: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.users.push(User {
            id: id.clone(),
            username: username.to_string(),
            updated: timestamp_now(),
        });
        id
    }

    fn game_state(&self, user_id: &str) -> Option<&GameState> {
        self.game_states.iter().find(|state| state.user_id == user_id)
    }

    fn save_game_state(&mut self, user_id: &str, money: i64, days: u32) -> Result<GameState, StoreError> {
        self.require_user(user_id)?;
        let now = timestamp_now();

        let state = match self.game_states.iter_mut().find(|state| state.user_id == user_id) {
            Some(state) => {
                state.money = money;
                state.days = days;
                state.updated = now;
                state.clone()
            }
            None => {
                let state = GameState {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    money,
                    days,
                    updated: now,
                };
                self.game_states.push(state.clone());
                state
            }
        };

        if let Some(user) = self.users.iter_mut().find(|user| user.id == user_id) {
            user.updated = now;
        }
        Ok(state)
    }

    fn mushrooms_of<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Mushroom> + 'a {
        self.mushrooms.iter().filter(move |mushroom| mushroom.user_id == user_id)
    }

    fn count_alive(&self, user_id: &str) -> usize {
        self.mushrooms_of(user_id).filter(|mushroom| mushroom.is_alive).count()
    }

    fn save_mushroom(&mut self, mushroom: &Mushroom) -> Result<(), StoreError> {
        self.require_user(&mushroom.user_id)?;

        if let Some(existing) = self
            .mushrooms
            .iter_mut()
            .find(|existing| existing.id == mushroom.id && existing.user_id == mushroom.user_id)
        {
            *existing = mushroom.clone();
            return Ok(());
        }

        if mushroom.is_alive && self.count_alive(&mushroom.user_id) >= MAX_ALIVE_MUSHROOMS {
            return Err(StoreError::MushroomLimit {
                user_id: mushroom.user_id.clone(),
                limit: MAX_ALIVE_MUSHROOMS,
            });
        }

        info!("New mushroom registered: {} ({:?})", mushroom.name, mushroom.kind);
        self.mushrooms.push(mushroom.clone());
        Ok(())
    }
}

//=== MemoryStore =========================================================

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn get_all_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.data.all_users())
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.data.user(user_id).cloned())
    }

    fn create_user(&mut self, username: &str) -> Result<String, StoreError> {
        Ok(self.data.create_user(username))
    }

    fn get_full_game_state(&self, user_id: &str) -> Result<Option<GameState>, StoreError> {
        Ok(self.data.game_state(user_id).cloned())
    }

    fn save_game_state(&mut self, user_id: &str, money: i64, days: u32) -> Result<GameState, StoreError> {
        self.data.save_game_state(user_id, money, days)
    }

    fn get_user_mushrooms(&self, user_id: &str) -> Result<Vec<Mushroom>, StoreError> {
        Ok(self.data.mushrooms_of(user_id).cloned().collect())
    }

    fn get_mushroom(&self, mushroom_id: &str) -> Result<Option<Mushroom>, StoreError> {
        Ok(self.data.mushrooms.iter().find(|m| m.id == mushroom_id).cloned())
    }

    fn count_alive_mushrooms(&self, user_id: &str) -> Result<usize, StoreError> {
        Ok(self.data.count_alive(user_id))
    }

    fn save_mushroom(&mut self, mushroom: &Mushroom) -> Result<(), StoreError> {
        self.data.save_mushroom(mushroom)
    }
}

//=== JsonStore ===========================================================

/// Store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No store at {}, starting empty", path.display());
                StoreData::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the document and keeps the copy only
    /// once it is on disk.
    fn commit<T>(&mut self, change: impl FnOnce(&mut StoreData) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut draft = self.data.clone();
        let value = change(&mut draft)?;
        self.write(&draft)?;
        self.data = draft;
        Ok(value)
    }

    fn write(&self, data: &StoreData) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!("Store written to {}", self.path.display());
        Ok(())
    }
}

impl GameStore for JsonStore {
    fn get_all_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.data.all_users())
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.data.user(user_id).cloned())
    }

    fn create_user(&mut self, username: &str) -> Result<String, StoreError> {
        self.commit(|data| Ok(data.create_user(username)))
    }

    fn get_full_game_state(&self, user_id: &str) -> Result<Option<GameState>, StoreError> {
        Ok(self.data.game_state(user_id).cloned())
    }

    fn save_game_state(&mut self, user_id: &str, money: i64, days: u32) -> Result<GameState, StoreError> {
        self.commit(|data| data.save_game_state(user_id, money, days))
    }

    fn get_user_mushrooms(&self, user_id: &str) -> Result<Vec<Mushroom>, StoreError> {
        Ok(self.data.mushrooms_of(user_id).cloned().collect())
    }

    fn get_mushroom(&self, mushroom_id: &str) -> Result<Option<Mushroom>, StoreError> {
        Ok(self.data.mushrooms.iter().find(|m| m.id == mushroom_id).cloned())
    }

    fn count_alive_mushrooms(&self, user_id: &str) -> Result<usize, StoreError> {
        Ok(self.data.count_alive(user_id))
    }

    fn save_mushroom(&mut self, mushroom: &Mushroom) -> Result<(), StoreError> {
        self.commit(|data| data.save_mushroom(mushroom))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::model::MushroomKind;

    //=====================================================================
    // Users & Game State
    //=====================================================================

    #[test]
    fn newest_user_is_listed_first() {
        let mut store = MemoryStore::new();
        let first = store.create_user("first").unwrap();
        let second = store.create_user("second").unwrap();

        let ids: Vec<String> = store.get_all_users().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn game_state_is_absent_until_saved() {
        let mut store = MemoryStore::new();
        let user = store.create_user("u").unwrap();
        assert_eq!(store.get_full_game_state(&user).unwrap(), None);

        store.save_game_state(&user, 20, 0).unwrap();
        let state = store.save_game_state(&user, 35, 2).unwrap();

        assert_eq!(store.get_full_game_state(&user).unwrap(), Some(state.clone()));
        assert_eq!((state.money, state.days), (35, 2));
    }

    #[test]
    fn game_state_for_unknown_user_is_refused() {
        let mut store = MemoryStore::new();
        let err = store.save_game_state("ghost", 0, 0).unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(id) if id == "ghost"));
    }

    //=====================================================================
    // Mushrooms
    //=====================================================================

    #[test]
    fn fourth_living_mushroom_is_refused() {
        let mut store = MemoryStore::new();
        let user = store.create_user("u").unwrap();
        for _ in 0..MAX_ALIVE_MUSHROOMS {
            store.save_mushroom(&Mushroom::adopt(&user, MushroomKind::Gombo, "m")).unwrap();
        }

        let err = store
            .save_mushroom(&Mushroom::adopt(&user, MushroomKind::Magui, "extra"))
            .unwrap_err();

        assert!(matches!(err, StoreError::MushroomLimit { limit: 3, .. }));
        assert_eq!(store.count_alive_mushrooms(&user).unwrap(), 3);
    }

    #[test]
    fn save_updates_existing_mushroom_even_at_limit() {
        let mut store = MemoryStore::new();
        let user = store.create_user("u").unwrap();
        let mut mushrooms: Vec<Mushroom> =
            (0..3).map(|_| Mushroom::adopt(&user, MushroomKind::Gombo, "m")).collect();
        for mushroom in &mushrooms {
            store.save_mushroom(mushroom).unwrap();
        }

        mushrooms[1].feed();
        store.save_mushroom(&mushrooms[1]).unwrap();

        let stored = store.get_mushroom(&mushrooms[1].id).unwrap().unwrap();
        assert_eq!(stored.exp, mushrooms[1].exp);
        assert_eq!(store.get_user_mushrooms(&user).unwrap().len(), 3);
    }

    #[test]
    fn dead_mushrooms_do_not_count_toward_limit() {
        let mut store = MemoryStore::new();
        let user = store.create_user("u").unwrap();
        let mut dead = Mushroom::adopt(&user, MushroomKind::Gombo, "gone");
        store.save_mushroom(&dead).unwrap();
        dead.is_alive = false;
        store.save_mushroom(&dead).unwrap();

        assert_eq!(store.count_alive_mushrooms(&user).unwrap(), 0);
        assert_eq!(store.get_user_mushrooms(&user).unwrap().len(), 1);
    }

    //=====================================================================
    // JsonStore
    //=====================================================================

    #[test]
    fn json_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let (user, mushroom) = {
            let mut store = JsonStore::open(&path).unwrap();
            let user = store.create_user("persisted").unwrap();
            store.save_game_state(&user, 20, 0).unwrap();
            let mushroom = Mushroom::adopt(&user, MushroomKind::Magui, "Spore");
            store.save_mushroom(&mushroom).unwrap();
            (user, mushroom)
        };

        let store = JsonStore::open(&path).unwrap();
        assert_eq!(store.get_user(&user).unwrap().map(|u| u.username), Some("persisted".to_string()));
        assert_eq!(store.get_full_game_state(&user).unwrap().map(|s| s.money), Some(20));
        assert_eq!(store.get_user_mushrooms(&user).unwrap(), vec![mushroom]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = JsonStore::open(&path).unwrap();
        let user = store.create_user("kept").unwrap();
        store.save_game_state(&user, 20, 0).unwrap();

        // A directory in the file's place makes the final rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupant"), b"x").unwrap();

        assert!(matches!(store.create_user("lost"), Err(StoreError::Io { .. })));
        assert!(store.save_game_state(&user, 99, 5).is_err());
        let mushroom = Mushroom::adopt(&user, MushroomKind::Gombo, "Ghost");
        assert!(store.save_mushroom(&mushroom).is_err());

        assert_eq!(store.get_all_users().unwrap().len(), 1);
        assert_eq!(store.get_full_game_state(&user).unwrap().map(|s| s.money), Some(20));
        assert_eq!(store.count_alive_mushrooms(&user).unwrap(), 0);
    }

    #[test]
    fn json_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(JsonStore::open(&path), Err(StoreError::Json(_))));
    }
}
