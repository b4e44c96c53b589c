//! Domain DTOs for the creature API.
//!
//! # Design
//! The list endpoint is consumed almost as-is. Detail bodies are large and
//! deeply nested, so they are decoded into private wire structs and flattened
//! into `Record`, keeping only what the catalog displays.

use serde::{Deserialize, Serialize};

/// One page of the paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPage {
    /// Total number of records available server-side.
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<ListItem>,
}

/// Lightweight pointer to a record's detail location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListItem {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "url")]
    pub detail_reference: String,
}

/// A fully resolved creature.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(from = "RecordBody")]
pub struct Record {
    pub id: u32,
    pub name: String,
    /// Height in decimetres, as reported by the API.
    pub height: u32,
    /// Weight in hectograms, as reported by the API.
    pub weight: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub image_url: Option<String>,
}

impl Record {
    /// Catalog number shown on cards, e.g. `#025`.
    pub fn display_number(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image_url.as_deref().unwrap_or(placeholder)
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    /// Multi-line details text for the record's detail view.
    pub fn summary(&self) -> String {
        format!(
            "Name: {}\nID: {}\nHeight: {} m\nWeight: {} kg\nTypes: {}\nAbilities: {}",
            self.name,
            self.id,
            self.height_m(),
            self.weight_kg(),
            self.types.join(", "),
            self.abilities.join(", "),
        )
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Detail body as served by the API; `Record` always deserializes through it.
#[derive(Deserialize)]
struct RecordBody {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
}

#[derive(Deserialize, Default)]
struct Sprites {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    other: Option<OtherSprites>,
}

#[derive(Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<Artwork>,
}

#[derive(Deserialize)]
struct Artwork {
    #[serde(default)]
    front_default: Option<String>,
}

impl From<RecordBody> for Record {
    fn from(body: RecordBody) -> Self {
        let artwork = body
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|art| art.front_default);
        Self {
            id: body.id,
            name: body.name,
            height: body.height,
            weight: body.weight,
            types: body.types.into_iter().map(|t| t.kind.name).collect(),
            abilities: body.abilities.into_iter().map(|a| a.ability.name).collect(),
            image_url: artwork.or(body.sprites.front_default),
        }
    }
}
