//! ID prefix constants and formatting.
//!
//! Every stored record gets a `{prefix}-{8 hex chars}` id. The random part is
//! supplied by the store layer; this module only fixes the shape.

pub const PREFIX_TECHNOLOGY: &str = "tec";
pub const PREFIX_API_VERSION: &str = "api";
pub const PREFIX_NOTICE: &str = "ntc";
pub const PREFIX_SNAPSHOT: &str = "snp";

/// Format a prefixed id, e.g. `format_id("tec", 0xa3f8_b2c1)` → `"tec-a3f8b2c1"`.
#[must_use]
pub fn format_id(prefix: &str, value: u32) -> String {
    format!("{prefix}-{value:08x}")
}

/// Whether `id` carries the given prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('-') && rest.len() == 9)
}
