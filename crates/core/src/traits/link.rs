//! Ground link monitoring

/// Reports when the last external command was successfully received.
///
/// The guidance fail-safe compares this timestamp against the injected clock;
/// resumption of traffic alone never clears a triggered recovery.
pub trait LinkMonitor {
    /// Timestamp (milliseconds, same clock as [`super::TimeSource::now_ms`])
    /// of the last successfully received command
    fn last_command_ms(&self) -> u64;
}
