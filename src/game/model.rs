//=========================================================================
// Game Data Model
//=========================================================================
//
// Records the persistence service stores, plus the small amount of game
// logic that acts on them (adoption defaults, feeding, levelling).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

//=== Constants ===========================================================

/// A user may keep at most this many living mushrooms.
pub const MAX_ALIVE_MUSHROOMS: usize = 3;

pub const MAX_HEALTH: u32 = 100;
pub const FEED_HEALTH: u32 = 10;
pub const FEED_EXP: u32 = 5;
pub const EXP_PER_LEVEL: u32 = 100;

/// Money and day counter of a freshly created game state.
pub const STARTING_MONEY: i64 = 20;
pub const STARTING_DAYS: u32 = 0;

/// Seconds since the Unix epoch, used for every `created`/`updated` stamp.
pub fn timestamp_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

//=== User ================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub updated: u64,
}

//=== GameState ===========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub id: String,
    pub user_id: String,
    pub money: i64,
    pub days: u32,
    pub updated: u64,
}

//=== MushroomKind ========================================================

/// Species of an adoptable mushroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MushroomKind {
    Gombo,
    Magui,
}

impl MushroomKind {
    pub const ALL: [MushroomKind; 2] = [MushroomKind::Gombo, MushroomKind::Magui];

    /// Display name of the species.
    pub fn species_name(&self) -> &'static str {
        match self {
            Self::Gombo => "Morel",
            Self::Magui => "Devil's Bolete",
        }
    }

    fn image_name(&self) -> &'static str {
        match self {
            Self::Gombo => "gombo",
            Self::Magui => "magui",
        }
    }

    /// Sprite path of rotation frame `direction`, relative to the asset
    /// root. Directions wrap; frames are numbered from 1 on disk.
    pub fn frame_path(&self, direction: usize) -> String {
        format!("images/{}{}.png", self.image_name(), direction % SPRITE_DIRECTIONS + 1)
    }
}

/// Rotation frames per mushroom sprite.
pub const SPRITE_DIRECTIONS: usize = 5;

//=== Mushroom ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mushroom {
    pub id: String,
    pub user_id: String,
    pub kind: MushroomKind,
    pub name: String,
    pub created: u64,
    pub age: u32,
    pub exp: u32,
    pub level: u32,
    pub health: u32,
    pub talent: u32,
    pub cute: u32,
    pub is_alive: bool,
}

impl Mushroom {
    /// A newly adopted mushroom with starting stats.
    pub fn adopt(user_id: impl Into<String>, kind: MushroomKind, name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind,
            name: name.into(),
            created: timestamp_now(),
            age: 0,
            exp: 0,
            level: 1,
            health: MAX_HEALTH,
            talent: 5,
            cute: 10,
            is_alive: true,
        }
    }

    /// Feeds the mushroom. Returns `true` if it levelled up.
    pub fn feed(&mut self) -> bool {
        self.health = (self.health + FEED_HEALTH).min(MAX_HEALTH);
        self.exp += FEED_EXP;

        let mut levelled = false;
        while self.exp >= EXP_PER_LEVEL {
            self.exp -= EXP_PER_LEVEL;
            self.level += 1;
            levelled = true;
        }
        levelled
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopted_mushroom_starts_alive_at_level_one() {
        let mushroom = Mushroom::adopt("u1", MushroomKind::Gombo, "Soggy Morel");
        assert!(mushroom.is_alive);
        assert_eq!(mushroom.level, 1);
        assert_eq!(mushroom.health, MAX_HEALTH);
        assert_eq!(mushroom.user_id, "u1");
        assert!(!mushroom.id.is_empty());
    }

    #[test]
    fn feeding_caps_health() {
        let mut mushroom = Mushroom::adopt("u1", MushroomKind::Magui, "m");
        mushroom.health = 95;
        mushroom.feed();
        assert_eq!(mushroom.health, MAX_HEALTH);
        assert_eq!(mushroom.exp, FEED_EXP);
    }

    #[test]
    fn feeding_levels_up_every_hundred_exp() {
        let mut mushroom = Mushroom::adopt("u1", MushroomKind::Gombo, "m");
        mushroom.exp = EXP_PER_LEVEL - FEED_EXP;

        assert!(mushroom.feed());
        assert_eq!(mushroom.level, 2);
        assert_eq!(mushroom.exp, 0);
        assert!(!mushroom.feed());
    }

    #[test]
    fn frame_paths_wrap_around_directions() {
        assert_eq!(MushroomKind::Gombo.frame_path(0), "images/gombo1.png");
        assert_eq!(MushroomKind::Magui.frame_path(4), "images/magui5.png");
        assert_eq!(MushroomKind::Magui.frame_path(SPRITE_DIRECTIONS), "images/magui1.png");
    }

    #[test]
    fn kind_serializes_as_upper_case_tag() {
        let json = serde_json::to_string(&MushroomKind::Magui).unwrap();
        assert_eq!(json, "\"MAGUI\"");
    }
}
