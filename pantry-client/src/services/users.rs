use std::sync::Arc;

use client_core::ApiError;

use crate::gateway::RequestGateway;
use crate::models::user::{Profile, UpdateProfileRequest};
use crate::sanitize::{sanitize, Policy};

/// Profile management for the authenticated user.
pub struct UserService {
    gateway: Arc<RequestGateway>,
}

impl UserService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Partial profile update; only set fields are sent.
    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<Profile, ApiError> {
        let mut profile: Profile = self.gateway.put("/users/profile", update).await?;

        profile.bio = profile.bio.map(|bio| sanitize(&bio, Policy::Basic));
        for restriction in &mut profile.dietary_restrictions {
            *restriction = sanitize(restriction, Policy::Strict);
        }
        for equipment in &mut profile.kitchen_equipment {
            *equipment = sanitize(equipment, Policy::Strict);
        }

        Ok(profile)
    }
}
