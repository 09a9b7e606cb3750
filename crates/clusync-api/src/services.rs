// Cluster-wide service settings: time sync, LDAP and Active Directory

use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{
    AdJoinRequest, AdReconfigureRequest, AdStatus, LdapSettings, LdapSettingsSpec, TimeSettings,
};

impl ClusterClient {
    // ── Time ─────────────────────────────────────────────────────────

    /// `GET /v1/time/settings`
    pub async fn get_time_settings(&self) -> Result<TimeSettings, Error> {
        let url = self.endpoint(&["v1", "time", "settings"])?;
        self.get(url).await
    }

    /// `PUT /v1/time/settings`
    pub async fn set_time_settings(&self, settings: &TimeSettings) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "time", "settings"])?;
        debug!(servers = settings.ntp_servers.len(), "replacing time settings");
        self.put_no_response(url, settings).await
    }

    // ── LDAP ─────────────────────────────────────────────────────────

    /// `GET /v2/ldap/settings`
    pub async fn get_ldap_settings(&self) -> Result<LdapSettings, Error> {
        let url = self.endpoint(&["v2", "ldap", "settings"])?;
        self.get(url).await
    }

    /// `PUT /v2/ldap/settings`
    pub async fn set_ldap_settings(&self, spec: &LdapSettingsSpec) -> Result<(), Error> {
        let url = self.endpoint(&["v2", "ldap", "settings"])?;
        debug!(bind_uri = %spec.bind_uri, "replacing LDAP settings");
        self.put_no_response(url, spec).await
    }

    // ── Active Directory ─────────────────────────────────────────────

    /// `GET /v1/ad/monitor`
    pub async fn ad_status(&self) -> Result<AdStatus, Error> {
        let url = self.endpoint(&["v1", "ad", "monitor"])?;
        self.get(url).await
    }

    /// `POST /v1/ad/join`
    pub async fn ad_join(&self, request: &AdJoinRequest) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "ad", "join"])?;
        debug!(domain = %request.domain, "joining AD domain");
        self.post_no_response(url, request).await
    }

    /// `POST /v1/ad/reconfigure`
    pub async fn ad_reconfigure(&self, request: &AdReconfigureRequest) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "ad", "reconfigure"])?;
        debug!("reconfiguring AD membership");
        self.post_no_response(url, request).await
    }
}
