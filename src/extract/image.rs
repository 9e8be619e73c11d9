//! Decoding of the two plain MediaWiki query shapes the images resource uses:
//! category member listings and per-page `imageinfo` generator results.

use crate::error::{Result, WikiError};
use crate::model::Image;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryPage {
    pub title: String,
}

/// One page of category members plus the token for the next one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryListing {
    pub pages: Vec<CategoryPage>,
    pub continue_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryMembersResponse {
    #[serde(rename = "continue", default)]
    continuation: Option<CategoryContinue>,
    query: CategoryMembersQuery,
}

#[derive(Debug, Deserialize)]
struct CategoryContinue {
    #[serde(default)]
    cmcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryMembersQuery {
    categorymembers: Vec<CategoryPage>,
}

#[derive(Debug, Deserialize)]
struct PageImagesResponse {
    #[serde(default)]
    query: Option<PageImagesQuery>,
}

#[derive(Debug, Deserialize)]
struct PageImagesQuery {
    pages: Vec<ImagePage>,
}

#[derive(Debug, Deserialize)]
struct ImagePage {
    #[serde(default)]
    imageinfo: Option<Vec<ImageInfo>>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: String,
    width: u32,
    height: u32,
    #[serde(default)]
    thumburl: Option<String>,
    #[serde(default)]
    thumbwidth: Option<u32>,
    #[serde(default)]
    thumbheight: Option<u32>,
}

impl From<ImageInfo> for Image {
    fn from(info: ImageInfo) -> Self {
        Image {
            url: info.thumburl.unwrap_or(info.url),
            width: info.thumbwidth.unwrap_or(info.width),
            height: info.thumbheight.unwrap_or(info.height),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: &str, response: Value) -> Result<T> {
    serde_json::from_value(response).map_err(|e| {
        log::error!("Undecodable {} response: {}", kind, e);
        WikiError::MalformedResponse(format!("{}: {}", kind, e))
    })
}

pub fn category_members(response: Value) -> Result<CategoryListing> {
    let response: CategoryMembersResponse = decode("category members", response)?;
    Ok(CategoryListing {
        pages: response.query.categorymembers,
        continue_key: response
            .continuation
            .and_then(|c| c.cmcontinue)
            .filter(|key| !key.is_empty()),
    })
}

/// Every image variant of one page; files without image info are skipped
pub fn page_images(response: Value) -> Result<Vec<Image>> {
    let response: PageImagesResponse = decode("image info", response)?;
    let Some(query) = response.query else {
        return Ok(Vec::new());
    };

    Ok(query
        .pages
        .into_iter()
        .filter_map(|page| page.imageinfo)
        .flatten()
        .map(Image::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_members_with_continue() {
        let response = json!({
            "batchcomplete": true,
            "continue": { "cmcontinue": "page|4142|123", "continue": "-||" },
            "query": {
                "categorymembers": [
                    { "ns": 3002, "title": "Yume 2kki:Nexus" },
                    { "ns": 3002, "title": "Yume 2kki:Dense Woods" }
                ]
            }
        });
        let listing = category_members(response).unwrap();
        assert_eq!(listing.pages.len(), 2);
        assert_eq!(listing.pages[0].title, "Yume 2kki:Nexus");
        assert_eq!(listing.continue_key.as_deref(), Some("page|4142|123"));
    }

    #[test]
    fn test_category_members_last_page() {
        let response = json!({ "query": { "categorymembers": [] } });
        let listing = category_members(response).unwrap();
        assert!(listing.pages.is_empty());
        assert_eq!(listing.continue_key, None);
    }

    #[test]
    fn test_category_members_without_query_is_malformed() {
        assert!(matches!(
            category_members(json!({ "batchcomplete": true })),
            Err(WikiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_thumbnail_preferred() {
        let response = json!({
            "query": {
                "pages": [{
                    "title": "File:Nexus.png",
                    "imageinfo": [{
                        "url": "https://example.org/Nexus.png",
                        "width": 640,
                        "height": 480,
                        "thumburl": "https://example.org/thumb/320px-Nexus.png",
                        "thumbwidth": 320,
                        "thumbheight": 240
                    }]
                }]
            }
        });
        assert_eq!(
            page_images(response).unwrap(),
            vec![Image {
                url: "https://example.org/thumb/320px-Nexus.png".to_string(),
                width: 320,
                height: 240,
            }]
        );
    }

    #[test]
    fn test_full_size_fallback_and_missing_files() {
        let response = json!({
            "query": {
                "pages": [
                    { "title": "File:Gone.png", "missing": true },
                    {
                        "title": "File:Small.png",
                        "imageinfo": [{ "url": "https://example.org/Small.png", "width": 100, "height": 80 }]
                    }
                ]
            }
        });
        assert_eq!(
            page_images(response).unwrap(),
            vec![Image {
                url: "https://example.org/Small.png".to_string(),
                width: 100,
                height: 80,
            }]
        );
    }

    #[test]
    fn test_page_without_images() {
        assert!(page_images(json!({ "batchcomplete": true })).unwrap().is_empty());
    }

    #[test]
    fn test_image_info_without_url_is_malformed() {
        let response = json!({
            "query": { "pages": [{ "imageinfo": [{ "width": 1, "height": 1 }] }] }
        });
        assert!(matches!(page_images(response), Err(WikiError::MalformedResponse(_))));
    }
}
