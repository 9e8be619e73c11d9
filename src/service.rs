//! Resource operations: validate against the registry, build the query, drive
//! it, extract the domain model.

use crate::config::Config;
use crate::error::{Result, WikiError};
use crate::extract;
use crate::games::{GameParams, GameRegistry};
use crate::model::{
    Author, Connections, LocationImage, LocationImages, LocationMap, Locations, VendingMachine,
};
use crate::query;
use crate::wiki::{MediaWikiClient, WikiApi};
use std::sync::Arc;

/// Request-independent handle shared by every HTTP handler
#[derive(Clone)]
pub struct WikiService {
    api: Arc<dyn WikiApi>,
    registry: Arc<GameRegistry>,
}

impl WikiService {
    pub fn new(api: Arc<dyn WikiApi>, registry: Arc<GameRegistry>) -> Self {
        Self { api, registry }
    }

    /// Live client and registry as described by the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = MediaWikiClient::new(&config.wiki)?;
        let registry = GameRegistry::load(config.games.file.as_deref())?;
        log::info!(
            "Serving {} games from {}",
            registry.len(),
            client.api_url()
        );
        Ok(Self::new(Arc::new(client), Arc::new(registry)))
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// One page of a game's locations, optionally narrowed to one protagonist
    pub async fn locations(&self, params: &GameParams) -> Result<Locations> {
        let resolved = self.registry.resolve_params(params)?;
        let ask = query::locations(&resolved, params.continue_key())?;

        let fetched = query::fetch(self.api.as_ref(), &ask).await?;
        let locations = extract::locations(resolved.game, fetched.results)?;
        log::debug!("{} locations for {}", locations.len(), resolved.game.code);

        Ok(Locations {
            locations,
            game: resolved.game.code.clone(),
            protags: resolved.game.protagonist_codes(),
            continue_key: fetched.continue_key,
        })
    }

    /// One page of a game's connections
    pub async fn connections(&self, params: &GameParams) -> Result<Connections> {
        let resolved = self.registry.resolve_params(params)?;
        let ask = query::connections(&resolved, params.continue_key())?;

        let fetched = query::fetch(self.api.as_ref(), &ask).await?;
        let connections = extract::connections(resolved.game, fetched.results)?;

        Ok(Connections {
            connections,
            game: resolved.game.code.clone(),
            continue_key: fetched.continue_key,
        })
    }

    /// Every author of a game, sorted by name upstream
    pub async fn authors(&self, game_code: &str) -> Result<Vec<Author>> {
        let game = self.registry.get(game_code)?;
        if !game.authors {
            return Err(WikiError::UnsupportedGame(game_code.to_string()));
        }

        let fetched = query::fetch(self.api.as_ref(), &query::authors(game)).await?;
        extract::authors(fetched.results)
    }

    /// Map images of one location page
    pub async fn maps(&self, game_code: &str, location: &str) -> Result<Vec<LocationMap>> {
        let game = self.registry.get(game_code)?;
        let fetched = query::fetch(self.api.as_ref(), &query::maps(game, location)).await?;
        extract::location_maps(fetched.results)
    }

    /// Every accessible vending machine of a game
    pub async fn vending_machines(&self, game_code: &str) -> Result<Vec<VendingMachine>> {
        let game = self.registry.get(game_code)?;
        let fetched = query::fetch(self.api.as_ref(), &query::vending_machines(game)).await?;
        extract::vending_machines(game, fetched.results)
    }

    /// One page of location pages with the images embedded in each.
    ///
    /// The listing call pages by category member; every listed page then costs
    /// one image-info request, issued in listing order.
    pub async fn images(&self, params: &GameParams) -> Result<LocationImages> {
        let game = self.registry.get(&params.game)?;

        let listing_params = query::location_pages(game, params.continue_key());
        let listing = extract::category_members(self.api.get(&listing_params).await?)?;

        let mut location_images = Vec::with_capacity(listing.pages.len());
        for page in listing.pages {
            let response = self.api.get(&query::page_images(&page.title)).await?;
            location_images.push(LocationImage {
                title: game.page_title(&page.title),
                game: game.code.clone(),
                images: extract::page_images(response)?,
            });
        }

        Ok(LocationImages {
            location_images,
            game: game.code.clone(),
            continue_key: listing.continue_key,
        })
    }
}
