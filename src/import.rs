//! One conversion run, from an input path to a change-set or a live model.
//!
//! ```text
//! input ──load_path──▶ PackageDef ──resolve──▶ ResolvedTree ─┬─build_changeset──▶ ChangeSet
//!                                                            └─reconcile────────▶ ModelHost
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::base::constants::DEFAULT_TYPES_LAYER;
use crate::changeset::{ApplyReport, ChangeSet, apply_changeset, build_changeset, yaml};
use crate::error::{Error, Result};
use crate::model::{Anchors, ModelHost};
use crate::reconcile::{Policy, Prompter, ReconcileReport, reconcile};
use crate::resolve::{ResolvedTree, resolve};
use crate::schema::load_path;

/// Everything a conversion run needs besides the model itself.
#[derive(Clone, Debug)]
pub struct ImportOptions {
    /// A schema file or a directory of schema files.
    pub input: PathBuf,
    /// Layer name or element id that receives the packages.
    pub destination: String,
    /// Explicit datatypes container (layer name or element id).
    pub types: Option<String>,
    /// Parent of the `Data Types` package; the `sa` layer when absent.
    pub types_parent: Option<String>,
    /// Conflict policy for direct reconciliation.
    pub policy: Policy,
}

impl ImportOptions {
    pub fn new(input: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            destination: destination.into(),
            types: None,
            types_parent: None,
            policy: Policy::default(),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn anchors(&self, host: &ModelHost) -> Result<Anchors> {
        Ok(host.anchors(
            &self.destination,
            self.types.as_deref(),
            self.types_parent.as_deref(),
            DEFAULT_TYPES_LAYER,
        )?)
    }
}

/// Load and resolve the input tree.
pub fn load_tree(input: &Path) -> Result<ResolvedTree> {
    let root = load_path(input)?;
    Ok(resolve(root))
}

/// Mode A: the change-set that brings `host` in line with the input.
pub fn generate_changeset(host: &ModelHost, options: &ImportOptions) -> Result<ChangeSet> {
    let anchors = options.anchors(host)?;
    let tree = load_tree(&options.input)?;
    Ok(build_changeset(&tree, &anchors))
}

/// Mode B: reconcile the input directly into `host`.
///
/// The model is not saved; a failed run leaves it partially applied.
pub fn import_live<P: Prompter>(
    host: &mut ModelHost,
    options: &ImportOptions,
    prompter: P,
) -> Result<ReconcileReport> {
    let anchors = options.anchors(host)?;
    let tree = load_tree(&options.input)?;
    Ok(reconcile(host, &tree, &anchors, options.policy, prompter)?)
}

/// Write `changeset` as YAML to `path`.
pub fn write_changeset(changeset: &ChangeSet, path: &Path) -> Result<()> {
    let text = yaml::dump(changeset)?;
    fs::write(path, text).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), "change-set written");
    Ok(())
}

/// Read a YAML change-set from `path` and apply it to `host`.
pub fn apply_file(host: &mut ModelHost, path: &Path) -> Result<ApplyReport> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let changeset = yaml::load(&text)?;
    Ok(apply_changeset(host, &changeset)?)
}
