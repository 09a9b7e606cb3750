// Cluster-wide singletons. They always exist on the target, so lookup
// reports `Found` and the engine asks for an update. Active Directory is
// the exception: membership is joined, reconfigured, or in conflict.

use clusync_api::models::TimeSettings;
use serde_json::{Map, Value};

use crate::config::BindCredentials;
use crate::convert::{ad_join_request, ad_reconfigure_request, ldap_spec};
use crate::error::CoreError;
use crate::model::{DeclaredAd, DeclaredLdap};
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// Time synchronization settings (`ntp.json`).
pub struct TimeKind;

impl ResourceKind for TimeKind {
    type Item = TimeSettings;
    type LiveId = ();

    const KIND: &'static str = "ntp";

    fn natural_key(_item: &TimeSettings) -> String {
        "time settings".into()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        _item: &TimeSettings,
    ) -> Result<MatchResult<()>, CoreError> {
        cx.api.get_time_settings().await?;
        Ok(MatchResult::Found(()))
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &TimeSettings,
    ) -> Result<(), CoreError> {
        cx.api.set_time_settings(item).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        (): (),
        item: &TimeSettings,
    ) -> Result<(), CoreError> {
        cx.api.set_time_settings(item).await
    }
}

/// Global SMB settings, stored alongside the shares in `smb.json`.
pub struct SmbSettingsKind;

impl ResourceKind for SmbSettingsKind {
    type Item = Map<String, Value>;
    type LiveId = ();

    const KIND: &'static str = "smb";

    fn natural_key(_item: &Map<String, Value>) -> String {
        "smb settings".into()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        _item: &Map<String, Value>,
    ) -> Result<MatchResult<()>, CoreError> {
        cx.api.get_smb_settings().await?;
        Ok(MatchResult::Found(()))
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &Map<String, Value>,
    ) -> Result<(), CoreError> {
        cx.api.set_smb_settings(&Value::Object(item.clone())).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        (): (),
        item: &Map<String, Value>,
    ) -> Result<(), CoreError> {
        cx.api.set_smb_settings(&Value::Object(item.clone())).await
    }
}

/// User-defined identity mappings (`maps.json`).
pub struct UserMappingsKind;

impl ResourceKind for UserMappingsKind {
    type Item = Value;
    type LiveId = ();

    const KIND: &'static str = "mappings";

    fn natural_key(_item: &Value) -> String {
        "user-defined mappings".into()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        _item: &Value,
    ) -> Result<MatchResult<()>, CoreError> {
        cx.api.get_user_mappings().await?;
        Ok(MatchResult::Found(()))
    }

    async fn create<A: ClusterApi>(&self, cx: &Context<'_, A>, item: &Value) -> Result<(), CoreError> {
        cx.api.set_user_mappings(item).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        (): (),
        item: &Value,
    ) -> Result<(), CoreError> {
        cx.api.set_user_mappings(item).await
    }
}

/// LDAP binding (`ldap.json`), replayed with operator-supplied bind credentials.
pub struct LdapKind {
    credentials: BindCredentials,
}

impl LdapKind {
    pub fn new(credentials: BindCredentials) -> Self {
        Self { credentials }
    }
}

impl ResourceKind for LdapKind {
    type Item = DeclaredLdap;
    type LiveId = ();

    const KIND: &'static str = "ldap";

    fn natural_key(item: &DeclaredLdap) -> String {
        if item.bind_uri.is_empty() {
            "ldap settings".into()
        } else {
            item.bind_uri.clone()
        }
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        _item: &DeclaredLdap,
    ) -> Result<MatchResult<()>, CoreError> {
        cx.api.get_ldap_settings().await?;
        Ok(MatchResult::Found(()))
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredLdap,
    ) -> Result<(), CoreError> {
        self.update(cx, (), item).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        (): (),
        item: &DeclaredLdap,
    ) -> Result<(), CoreError> {
        let spec = ldap_spec(item, &self.credentials.username, &self.credentials.password);
        cx.api.set_ldap_settings(&spec).await
    }
}

/// Active Directory membership (`ad.json`), keyed by domain.
///
/// Not joined → join. Joined to the same domain → reconfigure. Joined to a
/// different domain → conflict; leaving a domain is out of reach here.
pub struct AdKind {
    credentials: BindCredentials,
}

impl AdKind {
    pub fn new(credentials: BindCredentials) -> Self {
        Self { credentials }
    }
}

impl ResourceKind for AdKind {
    type Item = DeclaredAd;
    type LiveId = ();

    const KIND: &'static str = "ad";

    fn natural_key(item: &DeclaredAd) -> String {
        item.domain.clone()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredAd,
    ) -> Result<MatchResult<()>, CoreError> {
        if item.domain.is_empty() {
            return Ok(MatchResult::Conflict(
                "snapshot cluster was not joined to a domain".into(),
            ));
        }
        let live = cx.api.ad_status().await?;
        Ok(match (live.is_joined(), live.domain.eq_ignore_ascii_case(&item.domain)) {
            (false, _) => MatchResult::Absent,
            (true, true) => MatchResult::Found(()),
            (true, false) => {
                MatchResult::Conflict(format!("target is joined to `{}`", live.domain))
            }
        })
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredAd,
    ) -> Result<(), CoreError> {
        let request = ad_join_request(item, &self.credentials.username, &self.credentials.password);
        cx.api.ad_join(&request).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        (): (),
        item: &DeclaredAd,
    ) -> Result<(), CoreError> {
        cx.api.ad_reconfigure(&ad_reconfigure_request(item)).await
    }
}
