pub mod list;
pub mod movie;
pub mod rating;
pub mod recommendation;

pub use list::{ListEntry, ListType, UserLists};
pub use movie::{MovieSummary, TmdbMovie, TmdbSearchResponse};
pub use rating::{Rating, RatingUpsert, UserRating};
pub use recommendation::{Recommendation, RECOMMENDATION_COUNT};
