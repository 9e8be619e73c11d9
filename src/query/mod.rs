//! Semantic query construction.
//!
//! Each resource kind gets a builder returning an [`AskQuery`]: the condition
//! list, the printouts to request, the paging directives, and the
//! [`Pagination`] strategy the driver must use for it. Validation of
//! caller-supplied tokens happens here, before anything is sent.

pub mod pager;

pub use pager::{fetch, fetch_page, Fetched, SmwPage};

use crate::error::{Result, WikiError};
use crate::games::{Game, ResolvedGame};
use crate::wiki::ApiParams;

pub const LOCATIONS_LIMIT: u32 = 250;
pub const CONNECTIONS_LIMIT: u32 = 500;
pub const AUTHORS_LIMIT: u32 = 500;
pub const VENDING_MACHINES_LIMIT: u32 = 500;
pub const IMAGES_LIMIT: u32 = 50;

pub const LOCATION_PRINTOUTS: [&str; 13] = [
    "Has location image",
    "Header background color",
    "Header font color",
    "Has primary author",
    "Has contributing author",
    "Japanese name",
    "Has BGM",
    "Map IDs",
    "Has location map",
    "Version added",
    "Versions updated",
    "Version removed",
    "Version gaps",
];

pub const CONNECTION_PRINTOUTS: [&str; 9] = [
    "Connection/Origin",
    "Connection/Location",
    "Connection/Attribute",
    "Connection/Unlock conditions",
    "Connection/Effects needed",
    "Connection/Season available",
    "Connection/Chance percentage",
    "Connection/Chance description",
    "Connection/Is removed",
];

pub const AUTHOR_PRINTOUTS: [&str; 2] = ["Author/Name", "Author/Original Name"];

pub const MAP_PRINTOUTS: [&str; 1] = ["Has location map"];

pub const VENDING_MACHINE_PRINTOUTS: [&str; 3] = [
    "Has image path",
    "Vending Machine/Map ID",
    "Vending Machine/Event ID",
];

/// How the driver pages through a query's results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Follow every upstream offset and return all results at once.
    /// Only for small, bounded result sets.
    Exhaustive,
    /// Fetch one page, starting at `offset` when given, and hand the upstream
    /// offset back to the caller as its continuation token.
    SinglePage { offset: Option<u64> },
}

/// One `action=askargs` query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskQuery {
    pub conditions: Vec<String>,
    pub printouts: Vec<&'static str>,
    pub parameters: Vec<String>,
    pub pagination: Pagination,
}

impl AskQuery {
    /// API parameters for this query, resuming at `offset` when given
    pub fn to_params(&self, offset: Option<u64>) -> ApiParams {
        let mut parameters = self.parameters.clone();
        if let Some(offset) = offset {
            parameters.push(format!("offset={}", offset));
        }

        let mut params = ApiParams::new()
            .with("action", "askargs")
            .with("conditions", self.conditions.join("|"))
            .with("printouts", self.printouts.join("|"));
        if !parameters.is_empty() {
            params.set("parameters", parameters.join("|"));
        }
        params.set("format", "json");
        params.set("api_version", "3");
        params
    }
}

/// Parse a caller continuation token for a semantic query.
///
/// The token ends up inside the pipe-separated `parameters` directive, so only
/// a plain decimal offset is accepted.
pub fn parse_offset(continue_key: Option<&str>) -> Result<Option<u64>> {
    match continue_key {
        None => Ok(None),
        Some(key) if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) => key
            .parse::<u64>()
            .map(Some)
            .map_err(|_| WikiError::InvalidContinueKey(key.to_string())),
        Some(key) => Err(WikiError::InvalidContinueKey(key.to_string())),
    }
}

pub fn locations(resolved: &ResolvedGame<'_>, continue_key: Option<&str>) -> Result<AskQuery> {
    let mut condition = format!("Category:{} Locations", resolved.game.name);
    if let Some(category) = resolved.protagonist_category {
        condition.push('|');
        condition.push_str(category);
    }

    Ok(AskQuery {
        conditions: vec![condition],
        printouts: LOCATION_PRINTOUTS.to_vec(),
        parameters: vec![format!("limit={}", LOCATIONS_LIMIT)],
        pagination: Pagination::SinglePage {
            offset: parse_offset(continue_key)?,
        },
    })
}

pub fn connections(resolved: &ResolvedGame<'_>, continue_key: Option<&str>) -> Result<AskQuery> {
    let mut conditions = vec![
        format!("{}:+", resolved.game.name),
        "Is subobject type::connection".to_string(),
    ];
    if let Some(category) = resolved.protagonist_category {
        conditions.push(format!("-Has subobject::<q>[[{}]]</q>", category));
    }

    Ok(AskQuery {
        conditions,
        printouts: CONNECTION_PRINTOUTS.to_vec(),
        parameters: vec![format!("limit={}", CONNECTIONS_LIMIT)],
        pagination: Pagination::SinglePage {
            offset: parse_offset(continue_key)?,
        },
    })
}

pub fn authors(game: &Game) -> AskQuery {
    AskQuery {
        conditions: vec![format!("-Has subobject::{}:Authors", game.name)],
        printouts: AUTHOR_PRINTOUTS.to_vec(),
        parameters: vec![
            "sort=Author/Name".to_string(),
            "order=asc".to_string(),
            format!("limit={}", AUTHORS_LIMIT),
        ],
        pagination: Pagination::Exhaustive,
    }
}

pub fn maps(game: &Game, location_title: &str) -> AskQuery {
    AskQuery {
        conditions: vec![format!("{}:{}", game.name, location_title)],
        printouts: MAP_PRINTOUTS.to_vec(),
        parameters: Vec::new(),
        pagination: Pagination::SinglePage { offset: None },
    }
}

pub fn vending_machines(game: &Game) -> AskQuery {
    AskQuery {
        conditions: vec![
            format!("-Has subobject::{}:Vending Machine", game.name),
            "Vending Machine/Is implemented::true".to_string(),
            "Vending Machine/Is accessible::true".to_string(),
            "Vending Machine/Is secret::false".to_string(),
        ],
        printouts: VENDING_MACHINE_PRINTOUTS.to_vec(),
        parameters: vec![
            "sort=Vending Machine/Location".to_string(),
            "order=asc".to_string(),
            format!("limit={}", VENDING_MACHINES_LIMIT),
        ],
        pagination: Pagination::Exhaustive,
    }
}

/// Category-member listing of a game's location pages. The token is opaque.
pub fn location_pages(game: &Game, continue_key: Option<&str>) -> ApiParams {
    let mut params = ApiParams::new()
        .with("action", "query")
        .with("format", "json")
        .with("list", "categorymembers")
        .with("cmtitle", format!("Category:{} Locations", game.name))
        .with("cmprop", "title")
        .with("cmnamespace", game.namespace.to_string())
        .with("cmlimit", IMAGES_LIMIT.to_string());

    if let Some(token) = continue_key.filter(|k| !k.is_empty()) {
        params.set("continue", "-||");
        params.set("cmcontinue", token);
    }
    params
}

/// Image info for every image embedded in one page
pub fn page_images(page_title: &str) -> ApiParams {
    ApiParams::new()
        .with("action", "query")
        .with("format", "json")
        .with("prop", "imageinfo")
        .with("titles", page_title)
        .with("generator", "images")
        .with("iiprop", "size|url")
        .with("iiurlwidth", "320")
        .with("iiurlheight", "240")
        .with("gimlimit", "max")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{GameParams, GameRegistry};

    #[test]
    fn test_locations_query() {
        let registry = GameRegistry::builtin();
        let resolved = registry.resolve_params(&GameParams::new("2kki")).unwrap();
        let query = locations(&resolved, None).unwrap();

        assert_eq!(query.conditions, vec!["Category:Yume 2kki Locations"]);
        assert_eq!(query.printouts.len(), 13);
        assert_eq!(query.pagination, Pagination::SinglePage { offset: None });

        let params = query.to_params(None);
        assert_eq!(params.get("action"), Some("askargs"));
        assert_eq!(params.get("parameters"), Some("limit=250"));
        assert_eq!(params.get("api_version"), Some("3"));
        assert!(params.get("printouts").unwrap().starts_with("Has location image|"));
    }

    #[test]
    fn test_locations_with_protagonist_and_offset() {
        let registry = GameRegistry::builtin();
        let resolved = registry
            .resolve_params(&GameParams::new("unevendream").with_protagonist("totsutsuki"))
            .unwrap();
        let query = locations(&resolved, Some("250")).unwrap();

        assert_eq!(
            query.conditions,
            vec!["Category:Uneven Dream Locations|Category:Totsutsuki's Worlds"]
        );
        assert_eq!(query.pagination, Pagination::SinglePage { offset: Some(250) });
        assert_eq!(
            query.to_params(Some(250)).get("parameters"),
            Some("limit=250|offset=250")
        );
    }

    #[test]
    fn test_connections_query() {
        let registry = GameRegistry::builtin();
        let resolved = registry
            .resolve_params(&GameParams::new("tagai").with_protagonist("sakiyuki"))
            .unwrap();
        let query = connections(&resolved, None).unwrap();

        assert_eq!(
            query.to_params(None).get("conditions"),
            Some("Yume Tagai:+|Is subobject type::connection|-Has subobject::<q>[[Category:Sakiyuki's Worlds]]</q>")
        );
        assert_eq!(query.to_params(None).get("parameters"), Some("limit=500"));
        assert_eq!(query.printouts, CONNECTION_PRINTOUTS.to_vec());
    }

    #[test]
    fn test_exhaustive_queries() {
        let registry = GameRegistry::builtin();
        let game = registry.get("2kki").unwrap();

        let query = authors(game);
        assert_eq!(query.pagination, Pagination::Exhaustive);
        assert_eq!(
            query.to_params(None).get("parameters"),
            Some("sort=Author/Name|order=asc|limit=500")
        );
        assert_eq!(query.conditions, vec!["-Has subobject::Yume 2kki:Authors"]);

        let query = vending_machines(game);
        assert_eq!(query.pagination, Pagination::Exhaustive);
        assert_eq!(query.conditions.len(), 4);
        assert_eq!(
            query.to_params(Some(500)).get("parameters"),
            Some("sort=Vending Machine/Location|order=asc|limit=500|offset=500")
        );
    }

    #[test]
    fn test_maps_query_has_no_parameters() {
        let registry = GameRegistry::builtin();
        let query = maps(registry.get("2kki").unwrap(), "Example World");
        let params = query.to_params(None);
        assert_eq!(params.get("conditions"), Some("Yume 2kki:Example World"));
        assert_eq!(params.get("printouts"), Some("Has location map"));
        assert_eq!(params.get("parameters"), None);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(None).unwrap(), None);
        assert_eq!(parse_offset(Some("500")).unwrap(), Some(500));
        for bad in ["", "abc", "10|limit=5000", "-1", "99999999999999999999999"] {
            assert!(
                matches!(parse_offset(Some(bad)), Err(WikiError::InvalidContinueKey(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_location_pages_params() {
        let registry = GameRegistry::builtin();
        let game = registry.get("2kki").unwrap();

        let params = location_pages(game, None);
        assert_eq!(params.get("cmnamespace"), Some("3002"));
        assert_eq!(params.get("cmlimit"), Some("50"));
        assert_eq!(params.get("cmcontinue"), None);

        let params = location_pages(game, Some("page|4142|123"));
        assert_eq!(params.get("continue"), Some("-||"));
        assert_eq!(params.get("cmcontinue"), Some("page|4142|123"));
    }

    #[test]
    fn test_page_images_params() {
        let params = page_images("Yume 2kki:Example World");
        assert_eq!(params.get("titles"), Some("Yume 2kki:Example World"));
        assert_eq!(params.get("generator"), Some("images"));
        assert_eq!(params.get("iiprop"), Some("size|url"));
    }
}
