use crate::error::Result;
use crate::extract::printout::{PageRef, Printout, Text};
use crate::extract::{decode_items, SmwItem};
use crate::games::Game;
use crate::model::Connection;
use serde::Deserialize;
use serde_json::Value;

/// Boolean properties come back as "t" / "f"
const TRUE_MARKER: &str = "t";

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionPrintouts {
    #[serde(rename = "Connection/Origin", default)]
    pub origin: Printout<PageRef>,
    #[serde(rename = "Connection/Location", default)]
    pub destination: Printout<PageRef>,
    #[serde(rename = "Connection/Attribute", default)]
    pub attributes: Printout<String>,
    #[serde(rename = "Connection/Unlock conditions", default)]
    pub unlock_conditions: Printout<String>,
    #[serde(rename = "Connection/Effects needed", default)]
    pub effects_needed: Printout<String>,
    #[serde(rename = "Connection/Season available", default)]
    pub season_available: Printout<String>,
    #[serde(rename = "Connection/Chance percentage", default)]
    pub chance_percentage: Printout<Text>,
    #[serde(rename = "Connection/Chance description", default)]
    pub chance_description: Printout<String>,
    #[serde(rename = "Connection/Is removed", default)]
    pub is_removed: Printout<Value>,
}

fn page_title(game: &Game, page: Printout<PageRef>) -> String {
    page.into_first()
        .map(|page| game.page_title(&page.fulltext))
        .unwrap_or_default()
}

pub fn connection(game: &Game, item: SmwItem<ConnectionPrintouts>) -> Connection {
    let p = item.printouts;
    Connection {
        game: game.code.clone(),
        origin: page_title(game, p.origin),
        destination: page_title(game, p.destination),
        attributes: p.attributes.into_vec(),
        unlock_conditions: p.unlock_conditions.first_or_default(),
        effects_needed: p.effects_needed.into_vec(),
        season_available: p.season_available.first_or_default(),
        chance_percentage: p.chance_percentage.first_or_default().into_string(),
        chance_description: p.chance_description.first_or_default(),
        is_removed: p.is_removed.first().and_then(Value::as_str) == Some(TRUE_MARKER),
    }
}

pub fn connections(game: &Game, results: Vec<Value>) -> Result<Vec<Connection>> {
    Ok(decode_items::<ConnectionPrintouts>("connection", results)?
        .into_iter()
        .map(|item| connection(game, item))
        .collect())
}
