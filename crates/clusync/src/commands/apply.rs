//! `clusync apply`: snapshot files → secondary cluster.

use tracing::info;

use clusync_config::{Config, CredentialRole};
use clusync_core::{
    Action, Applier, ApprovalGate, ApprovalMode, Context, SnapshotStore, TenantResolver, connect,
};

use crate::cli::{GlobalOpts, KindsArgs};
use crate::error::CliError;
use crate::output;
use crate::prompt::{CliSecrets, TerminalCredentials, TerminalPrompter};

use super::{credential_resolver, resource_sets};

pub async fn handle(args: &KindsArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let defaults = &cfg.defaults;
    let mut resolver = credential_resolver(cfg, TerminalCredentials)?;
    let cluster = resolver.resolve_cluster(CredentialRole::Secondary, defaults)?;
    let client = connect(&cluster).await?;

    let mode = if global.auto_approve {
        ApprovalMode::Auto
    } else {
        ApprovalMode::Interactive
    };
    let store = SnapshotStore::new(&defaults.snapshot_dir);
    let tenants = TenantResolver::new(defaults.live_state);
    info!(
        dir = %store.dir().display(),
        approval = %mode,
        live_state = %defaults.live_state,
        "applying snapshot"
    );

    let applier = Applier::new(
        Context::new(&client, &tenants, defaults.live_state),
        ApprovalGate::new(mode, TerminalPrompter),
        &store,
    );
    let mut secrets = CliSecrets::new(resolver);
    let log = applier
        .apply(&resource_sets(&args.kinds), &mut secrets)
        .await;

    info!(
        created = log.count(Action::Created),
        updated = log.count(Action::Updated),
        skipped = log.count(Action::Skipped),
        failed = log.count(Action::Failed),
        "apply finished"
    );
    output::print_output(
        &output::render_outcomes(&log, output::should_color(global.color)),
        global.quiet,
    );
    Ok(())
}
