use chrono::{DateTime, Utc};
use client_core::ApiError;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::sanitize::{sanitize, Policy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// May carry limited markup; rendered under the `Rich` policy.
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Clean display fields before they reach a renderer.
    pub fn sanitized(mut self) -> Self {
        self.title = sanitize(&self.title, Policy::Strict);
        self.description = self.description.map(|d| sanitize(&d, Policy::Basic));
        for ingredient in &mut self.ingredients {
            *ingredient = sanitize(ingredient, Policy::Strict);
        }
        self.instructions = sanitize(&self.instructions, Policy::Rich);
        self.meal_type = self.meal_type.map(|m| sanitize(&m, Policy::Strict));
        for tag in &mut self.tags {
            *tag = sanitize(tag, Policy::Strict);
        }
        self
    }
}

/// Search and generation parameters for `GET /recipes`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeQuery {
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated"
    )]
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prep_time: Option<u32>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated"
    )]
    pub kitchen_equipment: Vec<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated"
    )]
    pub dietary_restrictions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

fn comma_separated<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&items.join(","))
}

impl RecipeQuery {
    /// Render as a URL query string; empty when no parameter is set.
    pub fn to_query_string(&self) -> Result<String, ApiError> {
        serde_urlencoded::to_string(self).map_err(|e| ApiError::Config(anyhow::Error::new(e)))
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_uses_camel_case_and_joins_lists() {
        let query = RecipeQuery {
            ingredients: vec!["egg".to_string(), "flour".to_string()],
            meal_type: Some("dinner".to_string()),
            max_prep_time: Some(30),
            page: Some(2),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string().unwrap(),
            "ingredients=egg%2Cflour&mealType=dinner&maxPrepTime=30&page=2"
        );
    }

    #[test]
    fn test_empty_query_renders_empty_string() {
        assert_eq!(RecipeQuery::default().to_query_string().unwrap(), "");
    }

    #[test]
    fn test_sanitized_applies_policy_tiers() {
        let recipe: Recipe = serde_json::from_value(serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "title": "<b>Pasta</b> night",
            "description": "<b>Quick</b> <script>alert(1)</script>dinner",
            "ingredients": ["<i>egg</i>"],
            "instructions": "<p>Boil water</p><script>alert(1)</script>",
            "tags": ["<u>fast</u>"],
        }))
        .unwrap();

        let clean = recipe.sanitized();
        assert_eq!(clean.title, "Pasta night");
        assert_eq!(clean.description.as_deref(), Some("<b>Quick</b> dinner"));
        assert_eq!(clean.ingredients, vec!["egg"]);
        assert_eq!(clean.instructions, "<p>Boil water</p>");
        assert_eq!(clean.tags, vec!["fast"]);
    }
}
