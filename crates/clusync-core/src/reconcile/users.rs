use std::sync::{Mutex, PoisonError};

use clusync_api::models::User;
use secrecy::SecretString;

use crate::config::LiveState;
use crate::convert::user_spec;
use crate::error::CoreError;
use crate::model::DeclaredUser;
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// Local users, matched by name or pinned uid.
///
/// New users get `initial_password`; updates never send a password.
pub struct UsersKind {
    initial_password: SecretString,
    cached: Mutex<Option<Vec<User>>>,
}

impl UsersKind {
    pub fn new(initial_password: SecretString) -> Self {
        Self {
            initial_password,
            cached: Mutex::new(None),
        }
    }

    async fn live_users<A: ClusterApi>(&self, cx: &Context<'_, A>) -> Result<Vec<User>, CoreError> {
        if cx.live_state == LiveState::PerBatch {
            if let Some(users) = self
                .cached
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
            {
                return Ok(users.clone());
            }
        }

        let users = cx.api.list_users().await?;
        if cx.live_state == LiveState::PerBatch {
            *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(users.clone());
        }
        Ok(users)
    }
}

/// Match `item` against the live user list.
///
/// The name and the uid must not point at two different users.
pub(crate) fn match_user(users: &[User], item: &DeclaredUser) -> MatchResult<String> {
    let by_name = users.iter().find(|u| u.name == item.name);
    let by_uid = item
        .pinned_uid()
        .and_then(|uid| users.iter().find(|u| u.uid.trim() == uid));

    match (by_name, by_uid) {
        (None, None) => MatchResult::Absent,
        (Some(user), None) | (None, Some(user)) => MatchResult::Found(user.id.clone()),
        (Some(a), Some(b)) if a.id == b.id => MatchResult::Found(a.id.clone()),
        (Some(a), Some(b)) => MatchResult::Conflict(format!(
            "name `{}` belongs to user {} but uid {} belongs to user {} (`{}`)",
            item.name, a.id, item.uid, b.id, b.name
        )),
    }
}

impl ResourceKind for UsersKind {
    type Item = DeclaredUser;
    type LiveId = String;

    const KIND: &'static str = "users";

    fn natural_key(item: &DeclaredUser) -> String {
        item.name.clone()
    }

    fn begin_batch(&self) {
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredUser,
    ) -> Result<MatchResult<String>, CoreError> {
        let users = self.live_users(cx).await?;
        Ok(match_user(&users, item))
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredUser,
    ) -> Result<(), CoreError> {
        cx.api
            .create_user(&user_spec(item), &self.initial_password)
            .await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: String,
        item: &DeclaredUser,
    ) -> Result<(), CoreError> {
        cx.api.update_user(&id, &user_spec(item)).await
    }
}
