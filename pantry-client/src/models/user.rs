use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sanitize::{sanitize, Policy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub kitchen_equipment: Vec<String>,
    #[serde(default)]
    pub default_servings: Option<u32>,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user: User,
    #[serde(default)]
    pub profile: Profile,
}

impl CurrentUser {
    /// Clean display fields before they reach a renderer.
    pub fn sanitized(mut self) -> Self {
        self.user.username = sanitize(&self.user.username, Policy::Strict);
        self.profile.bio = self.profile.bio.map(|bio| sanitize(&bio, Policy::Basic));
        for restriction in &mut self.profile.dietary_restrictions {
            *restriction = sanitize(restriction, Policy::Strict);
        }
        for equipment in &mut self.profile.kitchen_equipment {
            *equipment = sanitize(equipment, Policy::Strict);
        }
        self
    }
}

/// Partial update for `PUT /users/profile`; unset fields are left untouched
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_equipment: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_servings: Option<u32>,
}
