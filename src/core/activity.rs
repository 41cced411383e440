//! User-facing activity log

/// Append-only log of what the application did, one line per message.
pub trait ActivityLog: Send + Sync {
    fn log(&self, message: &str);

    /// Up to `count` most recent lines, newest first.
    fn last_lines(&self, count: usize) -> Vec<String>;
}
