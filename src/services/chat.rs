//! Group chat.

use std::sync::Arc;

use uuid::Uuid;

use super::{caller, required_text};
use crate::config::RealtimeConfig;
use crate::error::Result;
use crate::interfaces::RowStore;
use crate::model::{GroupMessage, NewMessage};
use crate::profiles::{Joined, ProfileJoiner};
use crate::reconciler::Reconciler;
use crate::repository::Repository;

#[derive(Clone)]
pub struct ChatService {
    me: Uuid,
    store: Arc<dyn RowStore>,
    messages: Repository<GroupMessage>,
    joiner: ProfileJoiner,
    realtime: RealtimeConfig,
}

impl ChatService {
    pub fn new(store: Arc<dyn RowStore>, realtime: RealtimeConfig) -> Self {
        Self {
            me: caller(&store),
            messages: Repository::new(store.clone()),
            joiner: ProfileJoiner::new(store.clone()),
            store,
            realtime,
        }
    }

    #[tracing::instrument(name = "chat.send", skip_all, fields(group_id = %group_id))]
    pub async fn send(&self, group_id: Uuid, text: &str) -> Result<GroupMessage> {
        let message = required_text("message", text, "Message cannot be empty")?;
        self.messages
            .insert(&NewMessage {
                group_id,
                user_id: self.me,
                message,
            })
            .await
    }

    /// Full history, oldest first, with senders.
    pub async fn history(&self, group_id: Uuid) -> Result<Vec<Joined<GroupMessage>>> {
        let messages = self.messages.list_by_group(group_id).await?;
        self.joiner.join(messages).await
    }

    /// Live view of a group's chat. Call `start` (or `spawn`) to load it.
    pub fn open(&self, group_id: Uuid) -> Reconciler<GroupMessage> {
        Reconciler::new(self.store.clone(), group_id, self.realtime.clone())
    }
}
