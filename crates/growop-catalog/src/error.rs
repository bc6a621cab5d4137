//! Error types for catalog loading and validation.

/// Errors that can occur when loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read a catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The growth phase table does not have exactly six entries.
    #[error("expected 6 growth phases, found {found}")]
    PhaseCount {
        /// Number of phases present.
        found: usize,
    },

    /// A research node names a prerequisite that is not in the tree.
    #[error("research node {node} requires unknown node {missing}")]
    UnknownPrerequisite {
        /// The node with the dangling reference.
        node: String,
        /// The missing prerequisite.
        missing: String,
    },

    /// A dealer has an invalid quantity band or availability window.
    #[error("dealer {dealer} is misconfigured: {reason}")]
    InvalidDealer {
        /// The dealer slug.
        dealer: String,
        /// What is wrong.
        reason: String,
    },

    /// Two entries of the same table share a slug.
    #[error("duplicate {table} entry: {id}")]
    DuplicateId {
        /// Table name.
        table: &'static str,
        /// The repeated slug.
        id: String,
    },

    /// A starter strain is not in the strain table.
    #[error("starter strain {strain} is not in the strain table")]
    UnknownStarter {
        /// The missing strain.
        strain: String,
    },
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
