//! `clusync dump`: primary cluster → snapshot files.

use tracing::{info, warn};

use clusync_config::{Config, CredentialRole};
use clusync_core::{Dumper, SnapshotStore, TenantResolver, connect};

use crate::cli::{GlobalOpts, KindsArgs};
use crate::error::CliError;
use crate::output;
use crate::prompt::TerminalCredentials;

use super::{credential_resolver, resource_sets};

pub async fn handle(args: &KindsArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let defaults = &cfg.defaults;
    let cluster = credential_resolver(cfg, TerminalCredentials)?
        .resolve_cluster(CredentialRole::Primary, defaults)?;
    let client = connect(&cluster).await?;

    let tenants = TenantResolver::new(defaults.live_state);
    let store = SnapshotStore::new(&defaults.snapshot_dir);
    info!(dir = %store.dir().display(), "writing snapshot");

    let entries = Dumper::new(&client, &tenants, &store)
        .dump(&resource_sets(&args.kinds))
        .await;

    let failed = entries.iter().filter(|e| e.result.is_err()).count();
    if failed > 0 {
        warn!(failed, total = entries.len(), "some snapshot files were not written");
    }

    output::print_output(
        &output::render_dump(&entries, output::should_color(global.color)),
        global.quiet,
    );
    Ok(())
}
