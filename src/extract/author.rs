use crate::error::Result;
use crate::extract::printout::{Field, Printout};
use crate::extract::{decode_items, SmwItem};
use crate::model::Author;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorPrintouts {
    #[serde(rename = "Author/Name", default)]
    pub name: Printout<String>,
    #[serde(rename = "Author/Original Name", default)]
    pub original_name: Printout<OriginalNameRecord>,
}

/// Monolingual text subobject
#[derive(Debug, Clone, Deserialize)]
pub struct OriginalNameRecord {
    #[serde(rename = "Text", default)]
    pub text: Field<String>,
}

impl From<SmwItem<AuthorPrintouts>> for Author {
    fn from(item: SmwItem<AuthorPrintouts>) -> Self {
        let p = item.printouts;
        Author {
            name: p.name.first_or_default(),
            original_name: p
                .original_name
                .into_first()
                .map(|record| record.text.first_or_default())
                .unwrap_or_default(),
        }
    }
}

pub fn authors(results: Vec<Value>) -> Result<Vec<Author>> {
    Ok(decode_items::<AuthorPrintouts>("author", results)?
        .into_iter()
        .map(Author::from)
        .collect())
}
