//! Synthetic Maven group IDs for upstream projects.
//!
//! Hangar projects live under `io.papermc.hangar`, qualified by platform and then by channel when
//! present. Modrinth projects live under `com.modrinth`, qualified by loader.

use crate::hangar::Platform;
use crate::modrinth::Loader;

pub const HANGAR_ROOT: &str = "io.papermc.hangar";
pub const MODRINTH_ROOT: &str = "com.modrinth";

#[must_use]
pub fn hangar(platform: Option<Platform>, channel: Option<&str>) -> String {
    let mut group_id = String::from(HANGAR_ROOT);

    if let Some(platform) = platform {
        group_id.push('.');
        group_id.push_str(platform.as_str());
    }

    if let Some(channel) = channel {
        group_id.push('.');
        group_id.push_str(channel);
    }

    group_id
}

#[must_use]
pub fn modrinth(loader: Loader) -> String {
    format!("{MODRINTH_ROOT}.{loader}")
}
