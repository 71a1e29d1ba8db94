pub mod lists;
pub mod postgres;
pub mod ratings;
pub mod requests;

pub use lists::{ListStore, PgListStore};
pub use postgres::create_pool;
pub use ratings::{PgRatingStore, RatingStore};
pub use requests::{PgRequestLogStore, RequestLogStore};
