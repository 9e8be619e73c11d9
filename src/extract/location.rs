use crate::error::Result;
use crate::extract::printout::{parse_integer, Field, Printout};
use crate::extract::{decode_items, SmwItem};
use crate::games::Game;
use crate::model::{Bgm, Location, LocationMap};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct LocationPrintouts {
    #[serde(rename = "Has location image", default)]
    pub location_image: Printout<String>,
    #[serde(rename = "Header background color", default)]
    pub background_color: Printout<String>,
    #[serde(rename = "Header font color", default)]
    pub font_color: Printout<String>,
    #[serde(rename = "Has primary author", default)]
    pub primary_author: Printout<String>,
    #[serde(rename = "Has contributing author", default)]
    pub contributing_authors: Printout<String>,
    #[serde(rename = "Japanese name", default)]
    pub original_name: Printout<String>,
    #[serde(rename = "Has BGM", default)]
    pub bgms: Printout<BgmRecord>,
    #[serde(rename = "Map IDs", default)]
    pub map_ids: Printout<MapIdRecord>,
    #[serde(rename = "Has location map", default)]
    pub location_maps: Printout<LocationMapRecord>,
    #[serde(rename = "Version added", default)]
    pub version_added: Printout<String>,
    #[serde(rename = "Versions updated", default)]
    pub versions_updated: Printout<String>,
    #[serde(rename = "Version removed", default)]
    pub version_removed: Printout<String>,
    #[serde(rename = "Version gaps", default)]
    pub version_gaps: Printout<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BgmRecord {
    #[serde(rename = "Has media path", default)]
    pub path: Field<String>,
    #[serde(rename = "BGM/Title", default)]
    pub title: Field<String>,
    #[serde(rename = "BGM/Label", default)]
    pub label: Field<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationMapRecord {
    #[serde(rename = "Has image path", default)]
    pub path: Field<String>,
    #[serde(rename = "Location Map/Caption", default)]
    pub caption: Field<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapIdRecord {
    #[serde(rename = "Has map ID", default)]
    pub map_id: Field<Value>,
}

/// Only the map printout, for the maps resource
#[derive(Debug, Clone, Deserialize)]
pub struct LocationMapPrintouts {
    #[serde(rename = "Has location map", default)]
    pub location_maps: Printout<LocationMapRecord>,
}

impl From<BgmRecord> for Bgm {
    fn from(record: BgmRecord) -> Self {
        Bgm {
            path: record.path.first_or_default(),
            title: record.title.first_or_default(),
            label: record.label.first_or_default(),
        }
    }
}

impl From<LocationMapRecord> for LocationMap {
    fn from(record: LocationMapRecord) -> Self {
        LocationMap {
            path: record.path.first_or_default(),
            caption: record.caption.first_or_default(),
        }
    }
}

/// Map IDs that parse as integers; free text in the wiki field is dropped
pub fn map_ids(records: Printout<MapIdRecord>) -> Vec<i64> {
    records
        .into_vec()
        .into_iter()
        .filter_map(|record| record.map_id.into_first())
        .filter_map(|value| parse_integer(&value))
        .collect()
}

pub fn location(game: &Game, item: SmwItem<LocationPrintouts>) -> Location {
    let p = item.printouts;
    Location {
        title: game.page_title(&item.fulltext),
        location_image: p.location_image.first_or_default(),
        game: game.code.clone(),
        background_color: p.background_color.first_or_default(),
        font_color: p.font_color.first_or_default(),
        original_name: p.original_name.first_or_default(),
        bgms: p.bgms.into_vec().into_iter().map(Bgm::from).collect(),
        location_maps: p
            .location_maps
            .into_vec()
            .into_iter()
            .map(LocationMap::from)
            .collect(),
        primary_author: p.primary_author.first_or_default(),
        contributing_authors: p.contributing_authors.into_vec(),
        version_added: p.version_added.first_or_default(),
        versions_updated: p.versions_updated.into_vec(),
        version_removed: p.version_removed.first_or_default(),
        version_gaps: p.version_gaps.into_vec(),
        map_ids: map_ids(p.map_ids),
    }
}

pub fn locations(game: &Game, results: Vec<Value>) -> Result<Vec<Location>> {
    Ok(decode_items::<LocationPrintouts>("location", results)?
        .into_iter()
        .map(|item| location(game, item))
        .collect())
}

/// Map entries of every matched page, in order
pub fn location_maps(results: Vec<Value>) -> Result<Vec<LocationMap>> {
    Ok(decode_items::<LocationMapPrintouts>("location map", results)?
        .into_iter()
        .flat_map(|item| item.printouts.location_maps.into_vec())
        .map(LocationMap::from)
        .collect())
}
