use crate::error::Result;
use crate::extract::printout::{Printout, Text};
use crate::extract::{decode_items, SmwItem};
use crate::games::Game;
use crate::model::VendingMachine;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct VendingMachinePrintouts {
    #[serde(rename = "Has image path", default)]
    pub path: Printout<String>,
    #[serde(rename = "Vending Machine/Map ID", default)]
    pub map_id: Printout<Text>,
    #[serde(rename = "Vending Machine/Event ID", default)]
    pub event_ids: Printout<Text>,
}

pub fn vending_machine(game: &Game, item: SmwItem<VendingMachinePrintouts>) -> VendingMachine {
    let p = item.printouts;
    VendingMachine {
        game: game.code.clone(),
        path: p.path.first_or_default(),
        map_id: p.map_id.first_or_default().into_string(),
        event_ids: p.event_ids.into_vec().into_iter().map(Text::into_string).collect(),
    }
}

pub fn vending_machines(game: &Game, results: Vec<Value>) -> Result<Vec<VendingMachine>> {
    Ok(decode_items::<VendingMachinePrintouts>("vending machine", results)?
        .into_iter()
        .map(|item| vending_machine(game, item))
        .collect())
}
