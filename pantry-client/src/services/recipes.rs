use std::sync::Arc;

use client_core::ApiError;
use reqwest::Method;
use uuid::Uuid;

use crate::gateway::{Payload, RequestGateway, RequestOptions};
use crate::models::recipe::{FavoriteStatus, Recipe, RecipePage, RecipeQuery};

/// Recipe search, retrieval and favorites.
pub struct RecipeService {
    gateway: Arc<RequestGateway>,
}

impl RecipeService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Search or generate recipes for the given constraints.
    pub async fn search(&self, query: &RecipeQuery) -> Result<RecipePage, ApiError> {
        let query_string = query.to_query_string()?;
        let path = if query_string.is_empty() {
            "/recipes".to_string()
        } else {
            format!("/recipes?{}", query_string)
        };

        let mut page: RecipePage = self.gateway.get(&path).await?;
        page.recipes = page.recipes.into_iter().map(Recipe::sanitized).collect();
        Ok(page)
    }

    pub async fn get(&self, id: Uuid) -> Result<Recipe, ApiError> {
        let recipe: Recipe = self.gateway.get(&format!("/recipes/{}", id)).await?;
        Ok(recipe.sanitized())
    }

    /// Toggle the favorite flag; returns the new state.
    pub async fn favorite(&self, id: Uuid) -> Result<bool, ApiError> {
        let status: FavoriteStatus = self
            .gateway
            .send(
                Method::POST,
                &format!("/recipes/{}/favorite", id),
                Payload::Empty,
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(status.is_favorite)
    }

    pub async fn is_favorite(&self, id: Uuid) -> Result<bool, ApiError> {
        let status: FavoriteStatus = self
            .gateway
            .get(&format!("/recipes/{}/is-favorite", id))
            .await?;
        Ok(status.is_favorite)
    }

    pub async fn favorites(&self) -> Result<Vec<Recipe>, ApiError> {
        let recipes: Vec<Recipe> = self.gateway.get("/recipes/favorites/list").await?;
        Ok(recipes.into_iter().map(Recipe::sanitized).collect())
    }
}
