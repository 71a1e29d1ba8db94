use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    db::{requests::next_utc_midnight, RatingStore, RequestLogStore},
    error::{EligibilityError, GenerationError},
    models::recommendation::{MAX_RELEASE_YEAR, MIN_RELEASE_YEAR},
    models::{MovieSummary, Recommendation, RECOMMENDATION_COUNT},
    services::openrouter::{ChatCompletionRequest, ChatMessage, CompletionClient, JsonSchemaFormat, ResponseFormat},
    services::prompt::{sanitize, PromptBuilder},
    services::tmdb::MovieLookup,
};

/// Ratings a user must have before recommendations are available
pub const MINIMUM_RATINGS: i64 = 10;

const COMPLETION_TEMPERATURE: f32 = 0.7;
const COMPLETION_MAX_TOKENS: u32 = 1000;

/// A recommendation as proposed by the model, before enrichment
///
/// The `tmdb_id` here is untrusted; it is only used until the metadata
/// lookup resolves the title/year to a verified id.
#[derive(Debug, Clone, Deserialize)]
struct AiRecommendation {
    tmdb_id: i64,
    title: String,
    year: i32,
}

#[derive(Debug, Deserialize)]
struct AiRecommendationPayload {
    recommendations: Vec<AiRecommendation>,
}

/// Outcome of one metadata lookup during enrichment
///
/// The fan-out never fails as a whole: a branch either matched or it is
/// skipped, and a skipped branch only costs the item its poster.
#[derive(Debug)]
enum LookupOutcome {
    Matched(MovieSummary),
    Skipped,
}

/// Generates personalized AI movie recommendations
///
/// Composition root of the generation flow: eligibility gates, prompt
/// construction, the completion call, response validation, TMDb
/// enrichment, and request logging.
pub struct RecommendationsService {
    ratings: Arc<dyn RatingStore>,
    request_log: Arc<dyn RequestLogStore>,
    completion: Arc<dyn CompletionClient>,
    movies: Arc<dyn MovieLookup>,
    daily_limit: i64,
    model: String,
}

impl RecommendationsService {
    pub fn new(
        ratings: Arc<dyn RatingStore>,
        request_log: Arc<dyn RequestLogStore>,
        completion: Arc<dyn CompletionClient>,
        movies: Arc<dyn MovieLookup>,
        daily_limit: i64,
        model: String,
    ) -> Self {
        Self {
            ratings,
            request_log,
            completion,
            movies,
            daily_limit,
            model,
        }
    }

    /// Generates exactly five recommendations for the user
    ///
    /// # Errors
    ///
    /// * [`GenerationError::Eligibility`] when the user has fewer than
    ///   [`MINIMUM_RATINGS`] ratings or already hit today's limit
    /// * [`GenerationError::DataAccess`] when a store read fails
    /// * [`GenerationError::Upstream`] when the completion provider fails
    /// * [`GenerationError::ResponseContract`] when the model's output is
    ///   not the JSON shape it was constrained to
    pub async fn generate(
        &self,
        user_id: Uuid,
        prompt: Option<&str>,
    ) -> Result<Vec<Recommendation>, GenerationError> {
        self.check_eligibility(user_id).await?;

        let ratings = self
            .ratings
            .list_for_user(user_id)
            .await
            .map_err(GenerationError::DataAccess)?;

        let builder = PromptBuilder::new()
            .with_ratings(ratings)
            .with_user_context(sanitize(prompt));

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(builder.build_system_prompt()),
                ChatMessage::user(builder.build_user_prompt()),
            ],
            response_format: Some(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "movie_recommendations".to_string(),
                    strict: true,
                    schema: response_schema(),
                },
            }),
            temperature: Some(COMPLETION_TEMPERATURE),
            max_tokens: Some(COMPLETION_MAX_TOKENS),
        };

        let response = self
            .completion
            .complete(request)
            .await
            .map_err(GenerationError::Upstream)?;

        let content = response.content().ok_or_else(|| {
            GenerationError::ResponseContract("Empty response from AI".to_string())
        })?;

        let proposals = parse_and_validate(content)?;
        let recommendations = self.enrich(proposals).await;

        // Best effort: the user already has their result, so a failed log
        // write must not invalidate it. It only costs future rate-limit
        // accuracy.
        if let Err(e) = self.request_log.append(user_id).await {
            tracing::error!(user_id = %user_id, error = %e, "Failed to log recommendation request");
        }

        tracing::info!(
            user_id = %user_id,
            count = recommendations.len(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Eligibility gate: enough ratings, and below today's request limit
    ///
    /// Both counts are fetched concurrently; either read failing is a
    /// data-access failure.
    async fn check_eligibility(&self, user_id: Uuid) -> Result<(), GenerationError> {
        let (ratings_count, requests_today) = tokio::try_join!(
            self.ratings.count_for_user(user_id),
            self.request_log.count_today(user_id)
        )
        .map_err(GenerationError::DataAccess)?;

        if ratings_count < MINIMUM_RATINGS {
            return Err(EligibilityError::InsufficientRatings {
                current: ratings_count,
                required: MINIMUM_RATINGS,
            }
            .into());
        }

        if requests_today >= self.daily_limit {
            return Err(EligibilityError::DailyLimitExceeded {
                limit: self.daily_limit,
                requests_today,
                resets_at: next_utc_midnight(Utc::now()),
            }
            .into());
        }

        Ok(())
    }

    /// Resolves each proposal against TMDb, all lookups in parallel
    ///
    /// Waits for every branch regardless of individual failures; a branch
    /// that finds no match or errors yields the item without a poster
    /// rather than failing the batch.
    async fn enrich(&self, proposals: Vec<AiRecommendation>) -> Vec<Recommendation> {
        let mut tasks = Vec::with_capacity(proposals.len());

        for proposal in &proposals {
            let movies = Arc::clone(&self.movies);
            let title = proposal.title.clone();
            let year = proposal.year;

            tasks.push(tokio::spawn(async move {
                match movies.find_by_title_and_year(&title, year).await {
                    Ok(Some(summary)) => LookupOutcome::Matched(summary),
                    Ok(None) => {
                        tracing::warn!(title = %title, year, "No TMDb match for recommendation");
                        LookupOutcome::Skipped
                    }
                    Err(e) => {
                        tracing::warn!(title = %title, year, error = %e, "TMDb lookup failed");
                        LookupOutcome::Skipped
                    }
                }
            }));
        }

        let mut recommendations = Vec::with_capacity(proposals.len());
        for (proposal, task) in proposals.into_iter().zip(tasks) {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "Enrichment task join error");
                    LookupOutcome::Skipped
                }
            };

            recommendations.push(match outcome {
                // Verified match: take its id and poster, keep the model's year
                LookupOutcome::Matched(summary) => Recommendation {
                    tmdb_id: summary.tmdb_id,
                    title: proposal.title,
                    year: proposal.year,
                    poster_path: summary.poster_path,
                },
                LookupOutcome::Skipped => Recommendation {
                    tmdb_id: proposal.tmdb_id,
                    title: proposal.title,
                    year: proposal.year,
                    poster_path: None,
                },
            });
        }

        recommendations
    }
}

/// JSON schema the completion provider is constrained to emit
fn response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "tmdb_id": { "type": "number", "description": "TMDb movie ID" },
                        "title": { "type": "string", "description": "Movie title" },
                        "year": { "type": "number", "description": "Release year" }
                    },
                    "required": ["tmdb_id", "title", "year"],
                    "additionalProperties": false
                },
                "minItems": RECOMMENDATION_COUNT,
                "maxItems": RECOMMENDATION_COUNT
            }
        },
        "required": ["recommendations"],
        "additionalProperties": false
    })
}

/// Parses the model's JSON payload and enforces the response contract
fn parse_and_validate(content: &str) -> Result<Vec<AiRecommendation>, GenerationError> {
    let payload: AiRecommendationPayload = serde_json::from_str(content)
        .map_err(|e| GenerationError::ResponseContract(format!("Invalid JSON in AI response: {}", e)))?;

    if payload.recommendations.len() != RECOMMENDATION_COUNT {
        return Err(GenerationError::ResponseContract(format!(
            "Expected exactly {} recommendations, got {}",
            RECOMMENDATION_COUNT,
            payload.recommendations.len()
        )));
    }

    for rec in &payload.recommendations {
        if rec.tmdb_id <= 0 {
            return Err(GenerationError::ResponseContract(format!(
                "Non-positive TMDb ID {} for \"{}\"",
                rec.tmdb_id, rec.title
            )));
        }
        if rec.title.trim().is_empty() {
            return Err(GenerationError::ResponseContract(
                "Recommendation with empty title".to_string(),
            ));
        }
        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&rec.year) {
            return Err(GenerationError::ResponseContract(format!(
                "Year {} for \"{}\" outside [{}, {}]",
                rec.year, rec.title, MIN_RELEASE_YEAR, MAX_RELEASE_YEAR
            )));
        }
    }

    Ok(payload.recommendations)
}
