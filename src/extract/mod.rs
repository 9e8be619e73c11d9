//! Typed decoding of semantic query results into the domain model.
//!
//! Every result object is `{<title key>: {"printouts": {...}, "fulltext": ...}}`.
//! Items are first decoded into per-resource printout structs built from
//! [`Printout`] and [`Field`], then mapped into domain types. A missing
//! `printouts` or `fulltext`, or a non-array property value, fails the whole
//! request; a missing property never does.

pub mod author;
pub mod connection;
pub mod image;
pub mod location;
pub mod printout;
pub mod vending_machine;

pub use author::authors;
pub use connection::connections;
pub use image::{category_members, page_images, CategoryListing, CategoryPage};
pub use location::{location_maps, locations};
pub use printout::{Field, PageRef, Printout, Text};
pub use vending_machine::vending_machines;

use crate::error::{Result, WikiError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// One page or subobject in a result set
#[derive(Debug, Clone, Deserialize)]
pub struct SmwItem<P> {
    pub printouts: P,
    pub fulltext: String,
}

/// Decode every item of every result object, in order
pub fn decode_items<P: DeserializeOwned>(kind: &str, results: Vec<Value>) -> Result<Vec<SmwItem<P>>> {
    let mut items = Vec::with_capacity(results.len());
    for result in results {
        let Value::Object(entries) = result else {
            return Err(WikiError::MalformedResponse(format!(
                "{} result is not an object",
                kind
            )));
        };
        for (key, value) in entries {
            let item = serde_json::from_value(value).map_err(|e| {
                log::error!("Undecodable {} item {}: {}", kind, key, e);
                WikiError::MalformedResponse(format!("{} {}: {}", kind, key, e))
            })?;
            items.push(item);
        }
    }
    Ok(items)
}
