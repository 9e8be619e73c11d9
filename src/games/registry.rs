use crate::error::{Result, WikiError};
use crate::games::GameParams;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Built-in game table: code, display name, namespace id.
const BUILTIN_GAMES: &[(&str, &str, u32)] = &[
    ("yume", "Yume Nikki", 3000),
    ("2kki", "Yume 2kki", 3002),
    ("flow", "Dotflow", 3004),
    ("someday", "Someday", 3006),
    ("deepdreams", "Deep Dreams", 3008),
    ("prayers", "Answered Prayers", 3010),
    ("amillusion", "Amillusion", 3012),
    ("unevendream", "Uneven Dream", 3014),
    ("braingirl", "Braingirl", 3016),
    ("unconscious", "Collective Unconscious", 3018),
    ("cerasus", "Cerasus", 3020),
    ("muma", "Muma Rope", 3022),
    ("genie", "Dream Genie", 3026),
    ("mikan", "Mikan Muzou", 3028),
    ("ultraviolet", "Ultra Violet", 3030),
    ("sheawaits", "She Awaits", 3032),
    ("oversomnia", "Oversomnia", 3034),
    ("tagai", "Yume Tagai", 3036),
    ("tsushin", "Yume Tsushin", 3038),
    ("nostalgic", "NostAlgic", 3040),
    ("if", "If", 3042),
];

const BUILTIN_PROTAGONISTS: &[(&str, &str, &str)] = &[
    ("unevendream", "kubotsuki", "Category:Kubotsuki's Worlds"),
    ("unevendream", "totsutsuki", "Category:Totsutsuki's Worlds"),
    ("tagai", "makitsuki", "Category:Makitsuki's Worlds"),
    ("tagai", "sakiyuki", "Category:Sakiyuki's Worlds"),
];

const BUILTIN_AUTHOR_GAMES: &[&str] = &["2kki", "unevendream", "unconscious"];

/// One game known to the wiki
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Game {
    #[serde(skip)]
    pub code: String,
    /// Display name, also the wiki namespace prefix
    pub name: String,
    /// Wiki namespace id holding the game's pages
    pub namespace: u32,
    /// Protagonist code -> category. Empty for single-protagonist games.
    #[serde(default)]
    pub protagonists: BTreeMap<String, String>,
    /// Whether the authors endpoint is offered
    #[serde(default)]
    pub authors: bool,
}

impl Game {
    pub fn has_multiple_protagonists(&self) -> bool {
        !self.protagonists.is_empty()
    }

    pub fn protagonist_codes(&self) -> Vec<String> {
        self.protagonists.keys().cloned().collect()
    }

    /// Strip this game's `<GameName>:` namespace prefix from a page title
    pub fn page_title(&self, fulltext: &str) -> String {
        if let Some(title) = fulltext
            .strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
        {
            return title.to_string();
        }
        match fulltext.split_once(':') {
            Some((_, title)) => title.to_string(),
            None => fulltext.to_string(),
        }
    }
}

/// A request whose game and protagonist have been checked against the registry
#[derive(Debug, Clone, Copy)]
pub struct ResolvedGame<'a> {
    pub game: &'a Game,
    pub protagonist_category: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GamesFile {
    games: BTreeMap<String, Game>,
}

/// Immutable game metadata, built once at startup
#[derive(Debug, Clone)]
pub struct GameRegistry {
    games: BTreeMap<String, Game>,
}

impl GameRegistry {
    /// The production game table
    pub fn builtin() -> Self {
        let mut games = BTreeMap::new();
        for (code, name, namespace) in BUILTIN_GAMES {
            games.insert(
                code.to_string(),
                Game {
                    code: code.to_string(),
                    name: name.to_string(),
                    namespace: *namespace,
                    protagonists: BTreeMap::new(),
                    authors: BUILTIN_AUTHOR_GAMES.contains(code),
                },
            );
        }
        for (code, protagonist, category) in BUILTIN_PROTAGONISTS {
            if let Some(game) = games.get_mut(*code) {
                game.protagonists
                    .insert(protagonist.to_string(), category.to_string());
            }
        }
        Self { games }
    }

    /// Build a registry from a YAML games document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: GamesFile = serde_yaml_ng::from_str(content)
            .map_err(|e| WikiError::Config(format!("games file parse error: {}", e)))?;

        let mut games = file.games;
        for (code, game) in games.iter_mut() {
            game.code = code.clone();
        }

        let registry = Self { games };
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
            .map_err(|e| WikiError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Registry from the configured games file, or the built-in table
    pub fn load(games_file: Option<&Path>) -> Result<Self> {
        match games_file {
            Some(path) => {
                let registry = Self::from_file(path)?;
                log::info!("Loaded {} games from {}", registry.len(), path.display());
                Ok(registry)
            }
            None => Ok(Self::builtin()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.games.is_empty() {
            return Err(WikiError::Config("games file defines no games".to_string()));
        }
        let mut namespaces = HashSet::new();
        for (code, game) in &self.games {
            if game.name.trim().is_empty() {
                return Err(WikiError::Config(format!("game {} has an empty name", code)));
            }
            if !namespaces.insert(game.namespace) {
                return Err(WikiError::Config(format!(
                    "game {} reuses namespace {}",
                    code, game.namespace
                )));
            }
            if game.protagonists.len() == 1 {
                return Err(WikiError::Config(format!(
                    "game {} lists a single protagonist; list none or at least two",
                    code
                )));
            }
            if let Some((name, _)) = game.protagonists.iter().find(|(_, c)| c.trim().is_empty()) {
                return Err(WikiError::Config(format!(
                    "protagonist {} of game {} has an empty category",
                    name, code
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<&Game> {
        self.games
            .get(code)
            .ok_or_else(|| WikiError::UnsupportedGame(code.to_string()))
    }

    /// Display name of a game
    pub fn resolve(&self, code: &str) -> Result<&str> {
        self.get(code).map(|game| game.name.as_str())
    }

    pub fn has_multiple_protagonists(&self, code: &str) -> bool {
        self.games
            .get(code)
            .map(Game::has_multiple_protagonists)
            .unwrap_or(false)
    }

    pub fn protagonist_category(&self, code: &str, protagonist: &str) -> Result<&str> {
        let game = self.get(code)?;
        if !game.has_multiple_protagonists() {
            return Err(WikiError::InvalidProtagonist(
                "game has only one protagonist".to_string(),
            ));
        }
        game.protagonists
            .get(protagonist)
            .map(String::as_str)
            .ok_or_else(|| {
                WikiError::InvalidProtagonist(
                    "protagonist does not exist or is misspelled".to_string(),
                )
            })
    }

    pub fn namespace_id(&self, code: &str) -> Result<u32> {
        self.get(code).map(|game| game.namespace)
    }

    pub fn authors_enabled(&self, code: &str) -> bool {
        self.games.get(code).map(|game| game.authors).unwrap_or(false)
    }

    /// Check a request's game and protagonist before anything is sent upstream
    pub fn resolve_params(&self, params: &GameParams) -> Result<ResolvedGame<'_>> {
        let game = self.get(&params.game)?;

        let protagonist_category = match (game.has_multiple_protagonists(), params.protagonist()) {
            (false, None) => None,
            (false, Some(_)) => {
                return Err(WikiError::InvalidProtagonist(
                    "game has only one protagonist".to_string(),
                ))
            }
            (true, None) => {
                return Err(WikiError::InvalidProtagonist(
                    "game has multiple protagonists, please specify one".to_string(),
                ))
            }
            (true, Some(protagonist)) => {
                Some(self.protagonist_category(&params.game, protagonist)?)
            }
        };

        Ok(ResolvedGame {
            game,
            protagonist_category,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_games_resolve_to_names() {
        let registry = GameRegistry::builtin();
        assert_eq!(registry.len(), 21);
        for game in registry.iter() {
            let name = registry.resolve(&game.code).unwrap();
            assert!(!name.is_empty(), "{} has an empty name", game.code);
        }
        assert_eq!(registry.resolve("2kki").unwrap(), "Yume 2kki");
        assert_eq!(registry.namespace_id("if").unwrap(), 3042);
    }

    #[test]
    fn test_unknown_game_is_unsupported() {
        let registry = GameRegistry::builtin();
        assert!(matches!(
            registry.resolve("zzz"),
            Err(WikiError::UnsupportedGame(code)) if code == "zzz"
        ));
        assert!(matches!(
            registry.resolve_params(&GameParams::new("zzz")),
            Err(WikiError::UnsupportedGame(_))
        ));
        assert!(!registry.has_multiple_protagonists("zzz"));
        assert!(!registry.authors_enabled("zzz"));
    }

    #[test]
    fn test_multiple_protagonists_require_one() {
        let registry = GameRegistry::builtin();
        assert!(registry.has_multiple_protagonists("unevendream"));
        assert!(registry.has_multiple_protagonists("tagai"));

        let err = registry
            .resolve_params(&GameParams::new("unevendream"))
            .unwrap_err();
        assert!(matches!(err, WikiError::InvalidProtagonist(_)));

        let resolved = registry
            .resolve_params(&GameParams::new("unevendream").with_protagonist("kubotsuki"))
            .unwrap();
        assert_eq!(resolved.game.name, "Uneven Dream");
        assert_eq!(
            resolved.protagonist_category,
            Some("Category:Kubotsuki's Worlds")
        );
    }

    #[test]
    fn test_single_protagonist_rejects_protagonist() {
        let registry = GameRegistry::builtin();
        let err = registry
            .resolve_params(&GameParams::new("2kki").with_protagonist("urotsuki"))
            .unwrap_err();
        assert_eq!(err.to_string(), "game has only one protagonist");

        let resolved = registry.resolve_params(&GameParams::new("2kki")).unwrap();
        assert!(resolved.protagonist_category.is_none());
    }

    #[test]
    fn test_misspelled_protagonist() {
        let registry = GameRegistry::builtin();
        let err = registry
            .resolve_params(&GameParams::new("tagai").with_protagonist("makituski"))
            .unwrap_err();
        assert_eq!(err.to_string(), "protagonist does not exist or is misspelled");
    }

    #[test]
    fn test_authors_allow_list() {
        let registry = GameRegistry::builtin();
        assert!(registry.authors_enabled("2kki"));
        assert!(registry.authors_enabled("unevendream"));
        assert!(registry.authors_enabled("unconscious"));
        assert!(!registry.authors_enabled("yume"));
    }

    #[test]
    fn test_page_title_strips_game_prefix() {
        let registry = GameRegistry::builtin();
        let game = registry.get("2kki").unwrap();
        assert_eq!(game.page_title("Yume 2kki:Example World"), "Example World");
        assert_eq!(game.page_title("Yume 2kki:Re: Visit"), "Re: Visit");
        assert_eq!(game.page_title("Other:Somewhere"), "Somewhere");
        assert_eq!(game.page_title("Bare Title"), "Bare Title");
    }

    #[test]
    fn test_yaml_games_file() {
        let yaml = r#"
games:
  2kki:
    name: Yume 2kki
    namespace: 3002
    authors: true
  tagai:
    name: Yume Tagai
    namespace: 3036
    protagonists:
      makitsuki: "Category:Makitsuki's Worlds"
      sakiyuki: "Category:Sakiyuki's Worlds"
"#;
        let registry = GameRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("tagai").unwrap().code, "tagai");
        assert!(registry.authors_enabled("2kki"));
        assert!(!registry.authors_enabled("tagai"));
        assert_eq!(
            registry.get("tagai").unwrap().protagonist_codes(),
            vec!["makitsuki", "sakiyuki"]
        );
        assert!(registry.resolve("yume").is_err());
    }

    #[test]
    fn test_yaml_rejects_single_protagonist() {
        let yaml = r#"
games:
  solo:
    name: Solo
    namespace: 1
    protagonists:
      only: "Category:Only"
"#;
        let err = GameRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("single protagonist"));
    }

    #[test]
    fn test_yaml_rejects_duplicate_namespace() {
        let yaml = r#"
games:
  a:
    name: A
    namespace: 5
  b:
    name: B
    namespace: 5
"#;
        assert!(matches!(
            GameRegistry::from_yaml_str(yaml),
            Err(WikiError::Config(_))
        ));
    }

    #[test]
    fn test_yaml_parse_error() {
        assert!(matches!(
            GameRegistry::from_yaml_str("games: [not, a, map]"),
            Err(WikiError::Config(_))
        ));
    }
}
