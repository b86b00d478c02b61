use serde::{Deserialize, Deserializer, Serialize};

/// A recipe as returned by the backend.
///
/// Recipes are never modified on the client; likes and checked ingredients
/// are kept in local storage keyed by [`Recipe::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub difficulty: String,
    /// Preparation time in minutes, kept as text
    #[serde(default, deserialize_with = "text_or_number")]
    pub time: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub servings: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dish_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

/// Accepts `"30"`, `30` or `30.0` and yields text.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(n) => n.to_string(),
        TextOrNumber::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
        TextOrNumber::Float(f) => f.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}

impl Recipe {
    /// Total minutes, or 0 when the backend sent something unparsable
    pub fn minutes(&self) -> u32 {
        let trimmed = self.time.trim();
        trimmed
            .parse::<u32>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().map(|m| m.max(0.0) as u32))
            .unwrap_or(0)
    }

    /// Duration as `"{hours}h {minutes}m"`
    pub fn readable_duration(&self) -> String {
        let minutes = self.minutes();
        format!("{}h {}m", minutes / 60, minutes % 60)
    }

    pub fn servings_label(&self) -> String {
        if self.servings.trim() == "1" {
            "1 serving".to_string()
        } else {
            format!("{} servings", self.servings.trim())
        }
    }

    pub fn ingredient_count_label(&self) -> String {
        plural(self.ingredients.len(), "item", "items")
    }

    pub fn instruction_count_label(&self) -> String {
        plural(self.instructions.len(), "step", "steps")
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count > 1 {
        format!("{} {}", count, many)
    } else {
        format!("{} {}", count, one)
    }
}

/// Browse category shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Name sent to `/get-recipes-by-category`
    pub name: &'static str,
    pub title: &'static str,
    pub info: &'static str,
}

pub const CATEGORIES: [Category; 5] = [
    Category {
        name: "baking",
        title: "Baking recipes",
        info: "Recipes which require baking",
    },
    Category {
        name: "recipes",
        title: "All recipes",
        info: "All sorts of recipes to choose from",
    },
    Category {
        name: "health",
        title: "Healthy recipes",
        info: "Recipes which are good for your health",
    },
    Category {
        name: "budget",
        title: "Cheap recipes",
        info: "Recipes that are cheap to make",
    },
    Category {
        name: "inspiration",
        title: "Inspiration recipes",
        info: "Recipes to get inspiration from",
    },
];

/// Look up a category by the name the backend expects
pub fn category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

#[cfg(test)]
pub(crate) fn sample_recipe(id: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: format!("Recipe {}", id),
        image_url: String::new(),
        author: "Chef".to_string(),
        difficulty: "Easy".to_string(),
        time: "75".to_string(),
        ingredients: vec!["Flour".into(), "Eggs".into(), "Milk".into()],
        instructions: vec!["Mix".into(), "Bake".into()],
        servings: "4".to_string(),
        description: "A test recipe".to_string(),
        dish_type: None,
        votes: None,
    }
}
