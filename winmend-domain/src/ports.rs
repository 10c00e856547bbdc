/// Read-only access to the platform configuration store.
///
/// The profiler reads through this so it can be tested without a registry.
pub trait IdentitySource {
    /// Raw textual value of a named identity field.
    fn read_value(&self, name: &str) -> anyhow::Result<String>;
}

/// Existence check for a platform marker (a registry key path on Windows).
pub trait MarkerProbe {
    fn exists(&self, marker: &str) -> bool;
}
