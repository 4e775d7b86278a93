//! Compile-time build information.
//!
//! With the `build-info` feature the values come from `built`; without it
//! only the package name and version are known.

#[cfg(feature = "build-info")]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Multi-line description of this build.
///
/// ```text
/// cmdapi 0.8.0 (x86_64-unknown-linux-gnu)
/// Built: Mon, 19 Oct 2026 09:12:44 +0000
/// Commit: 3f9c2e1
/// Rustc: rustc 1.82.0
/// ```
#[cfg(feature = "build-info")]
pub fn version_info() -> String {
    format!(
        "{} {} ({})\nBuilt: {}\nCommit: {}\nRustc: {}",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::TARGET,
        built_info::BUILT_TIME_UTC,
        built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown"),
        built_info::RUSTC_VERSION
    )
}

#[cfg(feature = "build-info")]
pub fn version_short() -> &'static str {
    built_info::PKG_VERSION
}

#[cfg(feature = "build-info")]
pub fn package_name() -> &'static str {
    built_info::PKG_NAME
}

#[cfg(feature = "build-info")]
pub fn git_commit() -> Option<&'static str> {
    built_info::GIT_COMMIT_HASH
}

#[cfg(not(feature = "build-info"))]
pub fn version_info() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(not(feature = "build-info"))]
pub fn version_short() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(not(feature = "build-info"))]
pub fn package_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

#[cfg(not(feature = "build-info"))]
pub fn git_commit() -> Option<&'static str> {
    None
}

/// One line naming this build and the server release it drives
pub fn startup_banner(server_version: &str, release: &str) -> String {
    format!(
        "{} {} on server {} (adapter {})",
        package_name(),
        version_short(),
        server_version,
        release
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info_names_package() {
        let info = version_info();
        assert!(info.starts_with("cmdapi "));
    }

    #[test]
    fn test_version_short() {
        assert_eq!(version_short(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name(), "cmdapi");
    }

    #[test]
    fn test_startup_banner() {
        let banner = startup_banner("1.16.1", "1_16_R1");
        assert!(banner.starts_with("cmdapi "));
        assert!(banner.ends_with("on server 1.16.1 (adapter 1_16_R1)"));
    }
}
