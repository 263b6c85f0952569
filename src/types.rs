use serde::{Deserialize, Serialize};

use crate::error::FetchError;

// ===============================
// Wire payloads (PokéAPI JSON)
// ===============================

/// One page from the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Full record from the detail endpoint. Only the fields the views read.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailPayload {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: SpritesPayload,
    #[serde(default)]
    pub types: Vec<TypeSlotPayload>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlotPayload>,
    #[serde(default)]
    pub stats: Vec<StatPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpritesPayload {
    pub front_default: Option<String>,
    pub other: Option<OtherSpritesPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSpritesPayload {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<ArtworkPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkPayload {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlotPayload {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlotPayload {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatPayload {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

// ===============================
// View records
// ===============================

/// Lightweight list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    /// Parsed from the trailing numeric segment of `url`; `None` when absent
    pub id: Option<u32>,
    pub name: String,
    pub sprite_url: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub slot: u8,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityEntry {
    pub slot: u8,
    pub name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub name: String,
    pub base: u32,
    pub effort: u32,
}

/// Full per-item record. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    /// Decimetres
    pub height: u32,
    /// Hectograms
    pub weight: u32,
    pub types: Vec<TypeEntry>,
    pub abilities: Vec<AbilityEntry>,
    pub stats: Vec<StatEntry>,
    pub base_experience: Option<u32>,
    pub sprite: Option<String>,
    pub artwork: Option<String>,
}

impl DetailRecord {
    /// Artwork when the payload has it, primary sprite otherwise
    pub fn image(&self) -> Option<&str> {
        self.artwork.as_deref().or(self.sprite.as_deref())
    }
}

impl From<DetailPayload> for DetailRecord {
    fn from(p: DetailPayload) -> Self {
        let artwork = p
            .sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default)
            .filter(|s| !s.is_empty());
        Self {
            id: p.id,
            name: p.name,
            height: p.height,
            weight: p.weight,
            types: p
                .types
                .into_iter()
                .map(|t| TypeEntry { slot: t.slot, name: t.kind.name })
                .collect(),
            abilities: p
                .abilities
                .into_iter()
                .map(|a| AbilityEntry { slot: a.slot, name: a.ability.name, hidden: a.is_hidden })
                .collect(),
            stats: p
                .stats
                .into_iter()
                .map(|s| StatEntry { name: s.stat.name, base: s.base_stat, effort: s.effort })
                .collect(),
            base_experience: p.base_experience,
            sprite: p.sprites.front_default.filter(|s| !s.is_empty()),
            artwork,
        }
    }
}

// ===============================
// Fetch plumbing
// ===============================

/// Which mounted view a request belongs to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewSlot {
    PagedList,
    IncrementalList,
    Detail,
}

/// Process-unique request token. A view only accepts the settlement whose
/// ticket matches its outstanding request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn issue() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Ticket(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Absolute listing URL (offset/limit or server-supplied next pointer)
    List { url: String },
    Detail { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommand {
    Start { slot: ViewSlot, ticket: Ticket, request: FetchRequest },
    /// Abort whatever is in flight for the slot
    Cancel(ViewSlot),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    ListFetched {
        slot: ViewSlot,
        ticket: Ticket,
        result: Result<ListPage, FetchError>,
    },
    DetailFetched {
        ticket: Ticket,
        result: Result<DetailRecord, FetchError>,
    },
    Quit,
}
