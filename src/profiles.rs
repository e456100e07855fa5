//! Profile joiner.
//!
//! Resolves the users behind a set of rows to display profiles with one
//! batched lookup per distinct id set.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::interfaces::{Filter, RowStore};
use crate::model::Profile;
use crate::repository::{Authored, Repository};

/// Shown for ids with no resolvable profile.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Shown for a profile with neither a name nor an email.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Full name, else the email's local part, else [`UNKNOWN_NAME`].
pub fn display_name(full_name: Option<&str>, email: Option<&str>) -> String {
    if let Some(name) = full_name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    email
        .and_then(|e| e.split('@').next())
        .map(str::trim)
        .filter(|local| !local.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Who did something, as shown next to the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayProfile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub display_name: String,
}

impl DisplayProfile {
    pub fn unknown(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
            display_name: UNKNOWN_USER.to_string(),
        }
    }
}

impl From<&Profile> for DisplayProfile {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.id,
            email: profile.email.clone(),
            display_name: display_name(profile.full_name.as_deref(), profile.email.as_deref()),
        }
    }
}

/// A row paired with its author's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<R> {
    pub row: R,
    pub author: DisplayProfile,
}

#[derive(Clone)]
pub struct ProfileJoiner {
    profiles: Repository<Profile>,
}

impl ProfileJoiner {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            profiles: Repository::new(store),
        }
    }

    /// Profiles for the given ids. Every requested id is present in the
    /// result; unresolvable ones map to [`DisplayProfile::unknown`].
    #[tracing::instrument(name = "profiles.resolve", skip_all)]
    pub async fn resolve(
        &self,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, DisplayProfile>> {
        let distinct: BTreeSet<Uuid> = ids.into_iter().collect();
        if distinct.is_empty() {
            return Ok(HashMap::new());
        }

        let found = self
            .profiles
            .list(Filter::new().is_in("id", distinct.iter().map(Uuid::to_string)))
            .await?;
        debug!(requested = distinct.len(), found = found.len(), "Profiles resolved");

        let mut resolved: HashMap<Uuid, DisplayProfile> = found
            .iter()
            .map(|profile| (profile.id, DisplayProfile::from(profile)))
            .collect();
        for id in distinct {
            resolved
                .entry(id)
                .or_insert_with(|| DisplayProfile::unknown(id));
        }
        Ok(resolved)
    }

    pub async fn resolve_one(&self, id: Uuid) -> Result<DisplayProfile> {
        let mut resolved = self.resolve([id]).await?;
        Ok(resolved
            .remove(&id)
            .unwrap_or_else(|| DisplayProfile::unknown(id)))
    }

    /// Attach author profiles to rows, keeping row order.
    pub async fn join<R: Authored>(&self, rows: Vec<R>) -> Result<Vec<Joined<R>>> {
        let profiles = self.resolve(rows.iter().map(Authored::author_id)).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let author_id = row.author_id();
                let author = profiles
                    .get(&author_id)
                    .cloned()
                    .unwrap_or_else(|| DisplayProfile::unknown(author_id));
                Joined { row, author }
            })
            .collect())
    }

    /// Profile registered under an email, compared case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let normalized = email.trim().to_lowercase();
        let exact = self
            .profiles
            .list(Filter::new().eq("email", normalized.clone()))
            .await?;
        if let Some(profile) = exact.into_iter().next() {
            return Ok(Some(profile));
        }
        // Stored emails are not normalized
        let all = self.profiles.list(Filter::new()).await?;
        Ok(all.into_iter().find(|p| {
            p.email
                .as_deref()
                .map(|e| e.trim().eq_ignore_ascii_case(&normalized))
                .unwrap_or(false)
        }))
    }
}
