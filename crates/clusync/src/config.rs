//! CLI configuration: thin wrapper around `clusync_config`.
//!
//! Loads the TOML config and applies `GlobalOpts` flag overrides on top.

use clusync_core::LiveState;

use crate::cli::{GlobalOpts, LiveStateArg};
use crate::error::CliError;

pub use clusync_config::{Config, Defaults, config_path, load_config, to_toml};

/// Load the config file + environment, then apply CLI flags.
pub fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    apply_overrides(&mut cfg.defaults, global);
    Ok(cfg)
}

/// CLI flag overrides take priority over config and environment values.
pub fn apply_overrides(defaults: &mut Defaults, global: &GlobalOpts) {
    if let Some(ref dir) = global.snapshot_dir {
        defaults.snapshot_dir.clone_from(dir);
    }
    if let Some(ref file) = global.credentials {
        defaults.credentials_file.clone_from(file);
    }
    if let Some(ref file) = global.log_file {
        defaults.log_file.clone_from(file);
    }
    if let Some(timeout) = global.timeout {
        defaults.timeout = timeout;
    }
    if global.insecure {
        defaults.insecure = true;
    } else if global.verify_tls {
        defaults.insecure = false;
    }
    if let Some(live_state) = global.live_state {
        defaults.live_state = match live_state {
            LiveStateArg::PerItem => LiveState::PerItem,
            LiveStateArg::PerBatch => LiveState::PerBatch,
        };
    }
}
