//! Reusable widgets for the FlavorMap screens

pub mod chat_bubble;
pub mod mic_button;
pub mod recipe_card;
pub mod skeleton;

pub use chat_bubble::ChatBubble;
pub use mic_button::{MicButton, MIC_BUTTON_LABEL};
pub use recipe_card::{image_uri, recipe_image, CardSize, CategoryCard, RecipeCard};
pub use skeleton::Skeleton;
