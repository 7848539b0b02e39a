/// An entry in the known Claude model catalog.
#[derive(Debug, Clone, Copy)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Models offered in the model selector, newest first. The first entry is
/// the default selection.
pub const CLAUDE_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "claude-sonnet-4-20250514",
        name: "Claude Sonnet 4",
    },
    ModelInfo {
        id: "claude-opus-4-20250514",
        name: "Claude Opus 4",
    },
    ModelInfo {
        id: "claude-3-7-sonnet-20250219",
        name: "Claude 3.7 Sonnet",
    },
    ModelInfo {
        id: "claude-3-5-haiku-20241022",
        name: "Claude 3.5 Haiku",
    },
];

pub fn default_model_id() -> &'static str {
    CLAUDE_MODELS[0].id
}

/// Whether a model id is in the current catalog. Persisted selections that
/// fail this check are ignored on load.
pub fn is_known_model(id: &str) -> bool {
    CLAUDE_MODELS.iter().any(|model| model.id == id)
}
