use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const COLLECTION_PATH: &str = "/api/v2/pokemon";
pub const DEFAULT_SEED_COUNT: u32 = 151;
const DEFAULT_LIMIT: u32 = 20;

const NAMES: &[&str] = &[
    "bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon", "charizard", "squirtle",
    "wartortle", "blastoise", "caterpie",
];
const TYPES: &[&str] = &["grass", "fire", "water", "bug", "normal", "electric"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub image_url: Option<String>,
}

impl Creature {
    /// Detail body in the public API's nested shape.
    pub fn to_body(&self) -> Value {
        let types: Vec<Value> = self
            .types
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"slot": i + 1, "type": {"name": t, "url": ""}}))
            .collect();
        let abilities: Vec<Value> = self
            .abilities
            .iter()
            .enumerate()
            .map(|(i, a)| json!({"ability": {"name": a, "url": ""}, "is_hidden": false, "slot": i + 1}))
            .collect();
        json!({
            "id": self.id,
            "name": self.name,
            "height": self.height,
            "weight": self.weight,
            "types": types,
            "abilities": abilities,
            "sprites": {
                "front_default": null,
                "other": {"official-artwork": {"front_default": self.image_url}}
            }
        })
    }
}

/// Deterministic creatures with ids `1..=count`.
pub fn seed(count: u32) -> Vec<Creature> {
    (1..=count)
        .map(|id| {
            let i = (id - 1) as usize;
            let name = NAMES
                .get(i)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("creature-{id}"));
            Creature {
                id,
                name,
                height: 3 + id % 20,
                weight: 20 + id * 7 % 900,
                types: vec![TYPES[i % TYPES.len()].to_string()],
                abilities: vec!["overgrow".to_string(), "chlorophyll".to_string()],
                image_url: (id % 10 != 0).then(|| format!("https://img.test/artwork/{id}.png")),
            }
        })
        .collect()
}

/// Server-side data set. Ids in `failing` answer their detail route with 500.
#[derive(Debug, Default)]
pub struct Dex {
    pub creatures: Vec<Creature>,
    pub failing: HashSet<u32>,
}

impl Dex {
    pub fn new(creatures: Vec<Creature>) -> Self {
        Self {
            creatures,
            failing: HashSet::new(),
        }
    }

    pub fn fail_on(mut self, id: u32) -> Self {
        self.failing.insert(id);
        self
    }

    fn find(&self, key: &str) -> Option<&Creature> {
        match key.parse::<u32>() {
            Ok(id) => self.creatures.iter().find(|c| c.id == id),
            Err(_) => self.creatures.iter().find(|c| c.name == key),
        }
    }
}

/// Shared read-only data set.
pub type Db = Arc<Dex>;

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

pub fn app() -> Router {
    app_with(Dex::new(seed(DEFAULT_SEED_COUNT)))
}

pub fn app_with(dex: Dex) -> Router {
    let db: Db = Arc::new(dex);
    Router::new()
        .route(COLLECTION_PATH, get(list_creatures))
        .route(&format!("{COLLECTION_PATH}/{{key}}"), get(get_creature))
        .route(&format!("{COLLECTION_PATH}/{{key}}/"), get(get_creature))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, dex: Dex) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(dex)).await
}

fn origin(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{COLLECTION_PATH}")
}

async fn list_creatures(
    State(dex): State<Db>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Json<Value> {
    let base = origin(&headers);
    let count = dex.creatures.len() as u32;

    let results: Vec<Value> = dex
        .creatures
        .iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .map(|c| json!({"name": c.name, "url": format!("{base}/{}/", c.id)}))
        .collect();

    let end = params.offset.saturating_add(params.limit);
    let next = (end < count).then(|| format!("{base}?offset={end}&limit={}", params.limit));
    let previous = (params.offset > 0).then(|| {
        let prev = params.offset.saturating_sub(params.limit);
        format!("{base}?offset={prev}&limit={}", params.limit)
    });

    tracing::debug!(offset = params.offset, limit = params.limit, returned = results.len(), "list");
    Json(json!({"count": count, "next": next, "previous": previous, "results": results}))
}

async fn get_creature(
    State(dex): State<Db>,
    Path(key): Path<String>,
) -> Result<Json<Value>, (StatusCode, &'static str)> {
    let creature = dex.find(&key).ok_or((StatusCode::NOT_FOUND, "Not Found"))?;
    if dex.failing.contains(&creature.id) {
        tracing::debug!(id = creature.id, "injected failure");
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"));
    }
    Ok(Json(creature.to_body()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic_and_sequential() {
        let creatures = seed(12);
        assert_eq!(creatures.len(), 12);
        assert_eq!(creatures[0].name, "bulbasaur");
        assert_eq!(creatures[11].name, "creature-12");
        assert_eq!(seed(12), creatures);
        assert!(creatures.iter().enumerate().all(|(i, c)| c.id == i as u32 + 1));
    }

    #[test]
    fn every_tenth_creature_lacks_artwork() {
        let creatures = seed(20);
        assert!(creatures[9].image_url.is_none());
        assert!(creatures[10].image_url.is_some());
    }

    #[test]
    fn body_nests_types_abilities_and_artwork() {
        let body = seed(1)[0].to_body();
        assert_eq!(body["id"], 1);
        assert_eq!(body["types"][0]["type"]["name"], "grass");
        assert_eq!(body["abilities"][1]["ability"]["name"], "chlorophyll");
        assert_eq!(
            body["sprites"]["other"]["official-artwork"]["front_default"],
            "https://img.test/artwork/1.png"
        );
    }

    #[test]
    fn find_accepts_id_or_name() {
        let dex = Dex::new(seed(5));
        assert_eq!(dex.find("4").map(|c| c.name.as_str()), Some("charmander"));
        assert_eq!(dex.find("squirtle").map(|c| c.id), None);
        assert_eq!(dex.find("ivysaur").map(|c| c.id), Some(2));
        assert!(dex.find("Ivysaur").is_none());
    }

    #[test]
    fn list_params_default_limit_and_offset() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
    }
}
