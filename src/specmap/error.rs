use thiserror::Error;

/// Failures while loading a spec map. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum SpecMapError {
    #[error("spec map {path} does not exist")]
    ResourceMissing { path: String },

    #[error("spec map {path} is malformed at line {line}: {reason}")]
    ResourceMalformed {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("cannot read spec map {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
