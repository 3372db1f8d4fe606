//! User-visible notifications supplied by the host

/// Fire-and-forget messages shown to the user
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}
