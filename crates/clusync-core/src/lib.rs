//! Snapshot and reconciliation engine between `clusync-api` and the CLI.
//!
//! - **Capture** ([`Dumper`]) reads a source cluster and writes portable
//!   snapshot files through the [`SnapshotStore`]: trustees normalized,
//!   tenant ids replaced by names, directories referenced by path.
//!
//! - **Replay** ([`Applier`]) reads those files and drives every declared
//!   item through the generic [`Reconciler`]: look the natural key up on
//!   the target, ask the [`ApprovalGate`], issue one full create or update,
//!   record the [`Outcome`]. Per-kind behavior is a [`ResourceKind`]
//!   strategy; missing quota directories are provisioned on approval.
//!
//! - **Seams**: the cluster is reached through [`ClusterApi`] (implemented
//!   for `ClusterClient`), prompts through [`Prompter`], secrets the
//!   snapshot never holds through [`SecretSource`].

pub mod apply;
pub mod approval;
pub mod config;
pub mod convert;
pub mod dump;
pub mod error;
pub mod identity;
pub mod model;
pub mod outcome;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod snapshot;
pub mod tenant;

// ── Primary re-exports ──────────────────────────────────────────────
pub use apply::{Applier, DirectoryService, ResourceSet, SecretSource};
pub use approval::{ApprovalGate, ApprovalMode, Prompter};
pub use config::{BindCredentials, ClusterConfig, LiveState, TlsVerification};
pub use dump::{DumpEntry, Dumper};
pub use error::CoreError;
pub use outcome::{Action, Outcome, OutcomeLog};
pub use reconcile::{Context, MatchResult, Reconciler, ResourceKind};
pub use remote::ClusterApi;
pub use session::connect;
pub use snapshot::{SnapshotFile, SnapshotStore};
pub use tenant::TenantResolver;
