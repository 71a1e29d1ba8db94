pub mod openrouter;
pub mod prompt;
pub mod recommendations;
pub mod tmdb;

pub use openrouter::{CompletionClient, OpenRouterClient};
pub use recommendations::RecommendationsService;
pub use tmdb::{MovieLookup, TmdbClient};
