use serde::{Deserialize, Serialize};

/// One background music track of a location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bgm {
    pub path: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

/// One map image of a location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMap {
    pub path: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub title: String,
    pub location_image: String,
    pub game: String,
    pub background_color: String,
    pub font_color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_name: String,
    pub bgms: Vec<Bgm>,
    pub location_maps: Vec<LocationMap>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub primary_author: String,
    pub contributing_authors: Vec<String>,
    pub version_added: String,
    pub versions_updated: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_removed: String,
    pub version_gaps: Vec<String>,
    pub map_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    pub locations: Vec<Location>,
    pub game: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub game: String,
    pub origin: String,
    pub destination: String,
    pub attributes: Vec<String>,
    #[serde(rename = "unlockCondition", default, skip_serializing_if = "String::is_empty")]
    pub unlock_conditions: String,
    pub effects_needed: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub season_available: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chance_percentage: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chance_description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_removed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connections {
    pub connections: Vec<Connection>,
    pub game: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendingMachine {
    pub game: String,
    pub path: String,
    pub map_id: String,
    pub event_ids: Vec<String>,
}

/// One rendition of an image; thumbnail dimensions when the wiki has them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationImage {
    pub title: String,
    pub game: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationImages {
    pub location_images: Vec<LocationImage>,
    pub game: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_key: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}
