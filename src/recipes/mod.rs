//! Recipe data and the backend client

pub mod client;
pub mod feed;
pub mod types;

pub use client::{
    AudioConfig, HttpRecipeClient, RecipeService, SearchResponse, TranscribeRequest,
};
pub use feed::{load_feed, FeedKind, HOME_POPULAR_LIMIT};
pub use types::{category, Category, Recipe, CATEGORIES};
