//! Notifications from migrations to the application's model layer.

/// Model-layer callbacks invoked by migrations that change a model's columns.
///
/// The application implements this for its models; the migration binary on
/// its own uses [`NoopHooks`].
pub trait SchemaHooks: Send + Sync {
    /// Drop any cached column metadata for `table` so the next load sees the
    /// current schema.
    fn reset_column_information(&self, _table: &str) {}

    /// Attach the cached label-list behaviour to the model backed by `table`.
    ///
    /// Returns `false` when the application has no tagging cache to attach.
    fn register_label_cache(&self, _table: &str) -> bool {
        false
    }
}

/// Hooks for running without an application model layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl SchemaHooks for NoopHooks {}
