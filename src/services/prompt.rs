use crate::models::UserRating;

/// Default instruction used when the caller supplies no prompt
pub const DEFAULT_USER_PROMPT: &str = "Suggest 5 great movies for me.";

/// Builds the system and user prompts sent to the completion provider
///
/// Pure and deterministic: the same ratings and context always produce
/// the same strings, so it can be tested without a live provider.
#[derive(Debug, Default)]
pub struct PromptBuilder {
    ratings: Vec<UserRating>,
    user_context: Option<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the user's rating history
    pub fn with_ratings(mut self, ratings: Vec<UserRating>) -> Self {
        self.ratings = ratings;
        self
    }

    /// Sets additional user context, typically already sanitized
    pub fn with_user_context(mut self, context: Option<String>) -> Self {
        self.user_context = context;
        self
    }

    /// Builds the system prompt describing the user's taste
    ///
    /// An empty rating history still yields a valid prompt; the template
    /// simply carries no rating lines.
    pub fn build_system_prompt(&self) -> String {
        let ratings_text = self
            .ratings
            .iter()
            .map(|r| format!("- TMDb ID {}: Rating {}/10", r.tmdb_id, r.rating))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an expert movie recommendation system. Based on the user's rating history below, suggest 5 movies they would love.\n\n\
Rating interpretation:\n\
- 8-10: User loved these movies\n\
- 5-7: User liked these movies\n\
- 1-4: User disliked these movies\n\n\
User's rating history:\n\
{}\n\n\
Provide 5 diverse movie recommendations with valid TMDb IDs, titles, and release years. Ensure variety in genres and eras while matching user preferences.",
            ratings_text
        )
    }

    /// Builds the user prompt: the supplied context or the default ask
    pub fn build_user_prompt(&self) -> String {
        self.user_context
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_PROMPT.to_string())
    }
}

/// Strips angle brackets and trims whitespace from free-text input
///
/// Empty or absent input yields `None` so the caller can substitute its
/// own default.
pub fn sanitize(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let cleaned: String = raw.chars().filter(|c| *c != '<' && *c != '>').collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
