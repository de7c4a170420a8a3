//=========================================================================
// Name Generator
//=========================================================================
//
// Random display names for new users and adopted mushrooms, built from
// an adjective and a noun. One name in ten carries a serial number.
//
// Entropy comes from a fresh v4 UUID, which is already random and keeps
// the game free of a second RNG.
//
//=========================================================================

//=== External Dependencies ===============================================

use uuid::Uuid;

//=== Internal Dependencies ===============================================

use super::model::MushroomKind;

//=== Word Lists ==========================================================

const ADJECTIVES: &[&str] = &[
    "Soggy", "Dried", "Fancy", "Shy", "Poisonous", "Hungry", "Dancing", "Singing", "Shady", "Tasty",
    "Giant", "Tiny", "Wild", "Gloomy", "Happy", "Rain-Soaked", "Crispy", "Chewy", "Toxic", "Dreamy",
    "Red", "Blue", "Purple", "Golden", "Rainbow", "Cheeky", "Lazy", "Busy", "Sleepy",
];

const NOUNS: &[&str] = &[
    "Mushroom", "Pine", "Spore", "Mycelium", "Mold", "Truffle", "Shiitake", "Button", "Oyster",
    "Enoki", "Amanita", "Reishi", "Chaga", "Cordyceps",
];

/// Byte threshold for a numbered name: 26 / 256 is about one in ten.
const NUMBERED_THRESHOLD: u8 = 26;

//=== Public API ==========================================================

/// A random user name such as `"Sleepy Truffle"`.
pub fn random_user_name() -> String {
    compose(&entropy(), NOUNS)
}

/// A random name for a mushroom of `kind`, such as `"Crispy Morel"`.
pub fn random_mushroom_name(kind: MushroomKind) -> String {
    compose(&entropy(), &[kind.species_name()])
}

/// A uniformly chosen species.
pub fn random_kind() -> MushroomKind {
    let bytes = entropy();
    MushroomKind::ALL[bytes[0] as usize % MushroomKind::ALL.len()]
}

//=== Internals ===========================================================

fn entropy() -> [u8; 16] {
    *Uuid::new_v4().as_bytes()
}

fn compose(bytes: &[u8; 16], nouns: &[&str]) -> String {
    let adjective = ADJECTIVES[pick(bytes[0], bytes[1], ADJECTIVES.len())];
    let noun = nouns[pick(bytes[2], bytes[3], nouns.len())];

    if bytes[4] < NUMBERED_THRESHOLD {
        let number = 1 + bytes[5] % 99;
        format!("{} {} {}", adjective, noun, number)
    } else {
        format!("{} {}", adjective, noun)
    }
}

fn pick(high: u8, low: u8, len: usize) -> usize {
    u16::from_be_bytes([high, low]) as usize % len
}

//=========================================================================
// Unit Tests
//=========================================================================
