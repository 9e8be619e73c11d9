use crate::error::{Result, WikiError};
use crate::query::{AskQuery, Pagination};
use crate::wiki::WikiApi;
use serde_json::Value;

/// One page of `askargs` results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmwPage {
    /// Raw result objects, each keyed by a synthetic title
    pub results: Vec<Value>,
    /// `query-continue-offset`, when more results exist
    pub continue_offset: Option<u64>,
}

/// Everything a query produced under its pagination strategy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fetched {
    pub results: Vec<Value>,
    /// Opaque token for the caller; only set for single-page fetches
    pub continue_key: Option<String>,
}

/// Issue one `askargs` request and split the response into results and offset
pub async fn fetch_page(api: &dyn WikiApi, query: &AskQuery, offset: Option<u64>) -> Result<SmwPage> {
    let params = query.to_params(offset);
    log::debug!("askargs page at offset {}: {}", offset.unwrap_or(0), params);

    let response = api.get(&params).await?;
    parse_page(response)
}

/// Run a query under its pagination strategy.
///
/// `Exhaustive` keeps requesting the next offset until a page carries none and
/// returns every result in order; any failure discards what was gathered.
/// `SinglePage` performs one request and returns the upstream offset as the
/// caller's continuation token.
pub async fn fetch(api: &dyn WikiApi, query: &AskQuery) -> Result<Fetched> {
    match query.pagination {
        Pagination::SinglePage { offset } => {
            let page = fetch_page(api, query, offset).await?;
            Ok(Fetched {
                results: page.results,
                continue_key: page.continue_offset.map(|o| o.to_string()),
            })
        }
        Pagination::Exhaustive => {
            let mut results = Vec::new();
            let mut offset: Option<u64> = None;
            let mut pages = 0usize;

            loop {
                let page = fetch_page(api, query, offset).await?;
                pages += 1;
                results.extend(page.results);

                match page.continue_offset {
                    None => break,
                    Some(next) if next <= offset.unwrap_or(0) => {
                        return Err(WikiError::MalformedResponse(format!(
                            "continuation offset {} does not advance past {}",
                            next,
                            offset.unwrap_or(0)
                        )));
                    }
                    Some(next) => offset = Some(next),
                }
            }

            log::debug!("Fetched {} results over {} pages", results.len(), pages);
            Ok(Fetched {
                results,
                continue_key: None,
            })
        }
    }
}

fn parse_page(mut response: Value) -> Result<SmwPage> {
    let continue_offset = match response.get("query-continue-offset") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_u64().ok_or_else(|| {
            WikiError::MalformedResponse(format!("query-continue-offset is not an offset: {}", n))
        })?),
        Some(Value::String(s)) => Some(s.parse::<u64>().map_err(|_| {
            WikiError::MalformedResponse(format!("query-continue-offset is not an offset: {}", s))
        })?),
        Some(other) => {
            return Err(WikiError::MalformedResponse(format!(
                "query-continue-offset has unexpected type: {}",
                other
            )))
        }
    };

    let results = match response
        .get_mut("query")
        .and_then(|query| query.get_mut("results"))
        .map(Value::take)
    {
        Some(Value::Array(results)) => results,
        Some(other) => {
            return Err(WikiError::MalformedResponse(format!(
                "query.results is not an array: {}",
                type_name(&other)
            )))
        }
        None => {
            return Err(WikiError::MalformedResponse(
                "response has no query.results".to_string(),
            ))
        }
    };

    Ok(SmwPage {
        results,
        continue_offset,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::GameRegistry;
    use crate::query;
    use crate::wiki::stub::StubWiki;
    use serde_json::json;

    fn page(items: &[&str], offset: Option<u64>) -> Value {
        let results: Vec<Value> = items
            .iter()
            .map(|name| json!({ *name: { "printouts": {}, "fulltext": name } }))
            .collect();
        let mut response = json!({ "query": { "results": results } });
        if let Some(offset) = offset {
            response["query-continue-offset"] = json!(offset);
        }
        response
    }

    fn authors_query() -> AskQuery {
        let registry = GameRegistry::builtin();
        query::authors(registry.get("2kki").unwrap())
    }

    #[tokio::test]
    async fn test_exhaustive_concatenates_all_pages() {
        let stub = StubWiki::new()
            .with_response(page(&["a", "b"], Some(2)))
            .with_response(page(&["c", "d"], Some(4)))
            .with_response(page(&["e"], None));

        let fetched = fetch(&stub, &authors_query()).await.unwrap();

        let names: Vec<String> = fetched
            .results
            .iter()
            .flat_map(|r| r.as_object().unwrap().keys().cloned().collect::<Vec<_>>())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(fetched.continue_key, None);
        assert_eq!(stub.call_count(), 3);

        let calls = stub.calls();
        assert_eq!(
            calls[0].get("parameters"),
            Some("sort=Author/Name|order=asc|limit=500")
        );
        assert_eq!(
            calls[1].get("parameters"),
            Some("sort=Author/Name|order=asc|limit=500|offset=2")
        );
        assert_eq!(
            calls[2].get("parameters"),
            Some("sort=Author/Name|order=asc|limit=500|offset=4")
        );
    }

    #[tokio::test]
    async fn test_exhaustive_fails_whole_fetch_on_error() {
        let stub = StubWiki::new()
            .with_response(page(&["a"], Some(1)))
            .with_error(WikiError::UpstreamQuery("HTTP 502".to_string()));

        let err = fetch(&stub, &authors_query()).await.unwrap_err();
        assert!(matches!(err, WikiError::UpstreamQuery(_)));
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhaustive_rejects_stuck_offset() {
        let stub = StubWiki::new()
            .with_response(page(&["a"], Some(5)))
            .with_response(page(&["b"], Some(5)));

        let err = fetch(&stub, &authors_query()).await.unwrap_err();
        assert!(matches!(err, WikiError::MalformedResponse(_)));
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_single_page_returns_token() {
        let registry = GameRegistry::builtin();
        let resolved = registry
            .resolve_params(&crate::games::GameParams::new("2kki"))
            .unwrap();
        let query = query::locations(&resolved, Some("250")).unwrap();

        let stub = StubWiki::new().with_response(page(&["a"], Some(500)));
        let fetched = fetch(&stub, &query).await.unwrap();

        assert_eq!(fetched.results.len(), 1);
        assert_eq!(fetched.continue_key.as_deref(), Some("500"));
        assert_eq!(stub.call_count(), 1);
        assert_eq!(
            stub.calls()[0].get("parameters"),
            Some("limit=250|offset=250")
        );
    }

    #[test]
    fn test_parse_page_shapes() {
        let parsed = parse_page(json!({ "query": { "results": [] }, "query-continue-offset": "250" }))
            .unwrap();
        assert!(parsed.results.is_empty());
        assert_eq!(parsed.continue_offset, Some(250));

        assert!(matches!(
            parse_page(json!({ "query": {} })),
            Err(WikiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_page(json!({ "query": { "results": { "a": {} } } })),
            Err(WikiError::MalformedResponse(msg)) if msg.contains("object")
        ));
        assert!(matches!(
            parse_page(json!({ "query": { "results": [] }, "query-continue-offset": -3 })),
            Err(WikiError::MalformedResponse(_))
        ));
    }
}
