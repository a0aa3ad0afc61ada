//! Sandbox infrastructure errors.
//!
//! These cover only faults of the sandbox itself. Faults of the candidate
//! code (import failure, bad signature, exception, timeout) are not
//! errors; they are [`super::ExecOutcome`] variants.

/// Result type for sandbox operations.
pub type SandboxResult<T> = std::result::Result<T, SandboxError>;

/// Failures of the sandbox machinery, fatal to the current command.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("failed to stage harness: {0}")]
    Harness(#[source] std::io::Error),

    #[error("failed to spawn {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sandbox child wait failed: {0}")]
    Child(#[source] std::io::Error),

    #[error("sandbox exited cleanly without a report: {stderr}")]
    MissingReport { stderr: String },

    #[error("malformed sandbox report: {0}")]
    MalformedReport(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SandboxError::Spawn {
            bin: "python3".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("python3"));

        let err = SandboxError::MissingReport {
            stderr: "boom".to_string(),
        };
        assert!(err.to_string().contains("without a report"));
    }
}
