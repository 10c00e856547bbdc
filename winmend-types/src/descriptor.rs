use serde::{Deserialize, Serialize};

/// Canonical identity of the running OS, built once by the profiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsDescriptor {
    pub product_name: String,
    pub edition_id: String,
    pub build_number: u32,
    pub update_build_revision: u32,
    /// `"{build_number}.{update_build_revision}"`.
    pub full_build: String,
}

impl OsDescriptor {
    pub fn new(
        product_name: impl Into<String>,
        edition_id: impl Into<String>,
        build_number: u32,
        update_build_revision: u32,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            edition_id: edition_id.into(),
            build_number,
            update_build_revision,
            full_build: format!("{}.{}", build_number, update_build_revision),
        }
    }
}
