//! Account profile of the signed-in user.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{caller, optional_text};
use crate::error::Result;
use crate::interfaces::RowStore;
use crate::model::{NewProfile, Profile};
use crate::repository::{patch, Repository};

#[derive(Clone)]
pub struct AccountService {
    me: Uuid,
    email: String,
    profiles: Repository<Profile>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            email: store.session().email.trim().to_string(),
            profiles: Repository::new(store),
        }
    }

    /// Create the caller's profile after sign-up.
    #[tracing::instrument(name = "accounts.register", skip_all, fields(user_id = %self.me))]
    pub async fn register(&self, full_name: Option<&str>) -> Result<Profile> {
        let profile = self
            .profiles
            .insert(&NewProfile {
                id: self.me,
                email: self.email.clone(),
                full_name: optional_text(full_name),
            })
            .await?;
        info!("Profile registered");
        Ok(profile)
    }

    pub async fn me(&self) -> Result<Option<Profile>> {
        self.profiles.find(self.me).await
    }

    pub async fn rename(&self, full_name: Option<&str>) -> Result<Profile> {
        self.profiles
            .update(self.me, patch(json!({ "full_name": optional_text(full_name) })))
            .await
    }
}
