//! Hostname resolution for access records.

use std::ffi::OsString;

/// Recorded when the OS hostname cannot be read or is not valid UTF-8.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// Resolve the hostname once: a non-blank override wins, then the OS name.
pub fn resolve_hostname(override_name: Option<&str>) -> String {
    if let Some(name) = override_name.map(str::trim).filter(|name| !name.is_empty()) {
        return name.to_string();
    }
    from_os_name(gethostname::gethostname())
}

fn from_os_name(raw: OsString) -> String {
    match raw.into_string() {
        Ok(name) if !name.is_empty() => name,
        _ => UNKNOWN_HOSTNAME.to_string(),
    }
}
