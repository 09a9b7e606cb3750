//! Command dispatch: bridges CLI args to the engine and renders results.

pub mod apply;
pub mod config_cmd;
pub mod dump;

use clusync_config::{Config, CredentialPrompt, CredentialResolver, CredentialRole, load_credentials};
use clusync_core::ResourceSet;

use crate::cli::{Command, GlobalOpts, KindArg, RoleArg};
use crate::error::CliError;

/// Dispatch a cluster-bound command to its handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Dump(args) => dump::handle(&args, cfg, global).await,
        Command::Apply(args) => apply::handle(&args, cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

pub fn resource_sets(kinds: &[KindArg]) -> Vec<ResourceSet> {
    kinds
        .iter()
        .map(|kind| match kind {
            KindArg::Nfs => ResourceSet::Nfs,
            KindArg::Smb => ResourceSet::Smb,
            KindArg::Quotas => ResourceSet::Quotas,
            KindArg::Users => ResourceSet::Users,
            KindArg::Others => ResourceSet::Others,
        })
        .collect()
}

pub fn credential_role(role: RoleArg) -> CredentialRole {
    match role {
        RoleArg::Primary => CredentialRole::Primary,
        RoleArg::Secondary => CredentialRole::Secondary,
        RoleArg::Ldap => CredentialRole::Ldap,
        RoleArg::Ad => CredentialRole::Ad,
    }
}

/// Credential chain over the configured credentials file.
pub fn credential_resolver<P: CredentialPrompt>(
    cfg: &Config,
    prompt: P,
) -> Result<CredentialResolver<P>, CliError> {
    let file = load_credentials(&cfg.defaults.credentials_file)?;
    Ok(CredentialResolver::new(file, prompt))
}
