//! Versions command - list the default compiler versions

use anyhow::Result;
use typesver_config::VersionSet;

/// Default versions, highest first
pub fn default_versions() -> Vec<String> {
    VersionSet::defaults()
        .sorted_descending()
        .iter()
        .map(|v| v.to_string())
        .collect()
}

/// Run the versions command
pub fn run(json: bool) -> Result<()> {
    let versions = default_versions();
    if json {
        println!("{}", serde_json::json!({ "versions": versions }));
    } else {
        for version in versions {
            println!("{}", version);
        }
    }
    Ok(())
}
