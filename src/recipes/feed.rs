//! Recipe feeds shown by the home, list and account screens
//!
//! Feeds never fail: errors are logged and the view receives an empty list,
//! which it renders as skeleton placeholders.

use crate::recipes::client::RecipeService;
use crate::recipes::types::Recipe;
use crate::storage::LocalState;
use crate::Result;
use tracing::{debug, error};

/// Number of popular recipes in the home screen summary
pub const HOME_POPULAR_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Popular,
    Recommended,
    Category(String),
    Liked,
}

impl FeedKind {
    pub fn title(&self) -> String {
        match self {
            FeedKind::Popular => "Popular".to_string(),
            FeedKind::Recommended => "Recommended".to_string(),
            FeedKind::Liked => "Liked recipes".to_string(),
            FeedKind::Category(name) => crate::recipes::types::category(name)
                .map(|c| c.title.to_string())
                .unwrap_or_else(|| name.clone()),
        }
    }
}

/// Load a feed, logging failures and degrading them to an empty list
pub async fn load_feed(
    service: &dyn RecipeService,
    state: &LocalState,
    kind: &FeedKind,
    on_home_page: bool,
) -> Vec<Recipe> {
    match try_load_feed(service, state, kind, on_home_page).await {
        Ok(recipes) => {
            debug!("Loaded {} recipes for {:?}", recipes.len(), kind);
            recipes
        }
        Err(e) => {
            error!("Error fetching {:?} recipes: {}", kind, e);
            Vec::new()
        }
    }
}

async fn try_load_feed(
    service: &dyn RecipeService,
    state: &LocalState,
    kind: &FeedKind,
    on_home_page: bool,
) -> Result<Vec<Recipe>> {
    match kind {
        FeedKind::Popular => {
            let mut recipes = service.popular(on_home_page).await?;
            if on_home_page {
                recipes.truncate(HOME_POPULAR_LIMIT);
            }
            Ok(recipes)
        }
        FeedKind::Recommended => {
            let liked = state.liked_ids();
            if liked.is_empty() {
                // Nothing to base recommendations on yet
                return service.popular(on_home_page).await;
            }
            service.recommended(&liked, on_home_page).await
        }
        FeedKind::Category(name) => service.by_category(name).await,
        FeedKind::Liked => {
            let liked = state.liked_ids();
            if liked.is_empty() {
                return Ok(Vec::new());
            }
            service.by_ids(&liked).await
        }
    }
}
