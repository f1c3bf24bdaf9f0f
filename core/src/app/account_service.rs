//! Account service

use std::sync::Arc;

use crate::domain::entities::{CurrentUser, UserProfile};
use crate::domain::ports::ProfileStore;
use crate::error::DomainError;

pub struct AccountService<PR: ProfileStore> {
    profiles: Arc<PR>,
}

impl<PR: ProfileStore> AccountService<PR> {
    pub fn new(profiles: Arc<PR>) -> Self {
        Self { profiles }
    }

    /// Profile of the signed-in user
    ///
    /// A user without a profile document gets an empty one, with the display
    /// name and email filled from the session when known.
    pub async fn profile(&self, user: Option<&CurrentUser>) -> Result<UserProfile, DomainError> {
        let user = user.ok_or_else(|| {
            DomainError::Unauthenticated("Sign in to view your profile".to_string())
        })?;

        match self.profiles.get_profile(&user.id).await? {
            Some(profile) => Ok(profile),
            None => {
                tracing::debug!("No profile document for {}", user.id);
                Ok(UserProfile {
                    display_name: user.display_name.clone().unwrap_or_default(),
                    email: user.email.clone().unwrap_or_default(),
                    ..Default::default()
                })
            }
        }
    }
}
