use sailnav_core::CommandError;

/// Errors that can occur during simulator operations.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Command lost: link down at {0} ms")]
    LinkDown(u64),

    #[error("Command rejected: {0}")]
    CommandRejected(#[from] CommandError),

    #[error("Autopilot task stopped")]
    ChannelClosed,

    #[error("Autopilot task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sailnav_core::parameters::ParameterError;
    use std::error::Error;

    #[test]
    fn test_command_error_converts_with_source() {
        let err: SimulatorError = CommandError::Parameter(ParameterError::ReadOnly).into();
        assert!(matches!(err, SimulatorError::CommandRejected(_)));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "parameter rejected: parameter is read-only");
        assert_eq!(
            source.source().unwrap().to_string(),
            "parameter is read-only"
        );
    }
}
