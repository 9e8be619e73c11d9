pub mod registry;

pub use registry::{Game, GameRegistry, ResolvedGame};

/// Per-request game selection, as parsed from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameParams {
    pub game: String,
    pub protagonist: Option<String>,
    pub continue_key: Option<String>,
}

impl GameParams {
    pub fn new(game: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            ..Self::default()
        }
    }

    pub fn with_protagonist(mut self, protagonist: impl Into<String>) -> Self {
        self.protagonist = non_empty(protagonist.into());
        self
    }

    pub fn with_continue_key(mut self, continue_key: impl Into<String>) -> Self {
        self.continue_key = non_empty(continue_key.into());
        self
    }

    /// Protagonist, with an empty value treated as absent
    pub fn protagonist(&self) -> Option<&str> {
        self.protagonist.as_deref().filter(|p| !p.is_empty())
    }

    /// Continuation token, with an empty value treated as absent
    pub fn continue_key(&self) -> Option<&str> {
        self.continue_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
