//! Write a commented default configuration file.

use std::path::PathBuf;

use super::config::{default_config_path, default_data_dir, VeriflowConfig};

pub fn execute(path: Option<String>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

    if path.exists() && !force {
        return Err(format!(
            "Config already exists at '{}'. Use --force to overwrite.",
            path.display()
        )
        .into());
    }

    VeriflowConfig::create_default(&path, &default_data_dir())?;
    println!("Created: {}", path.display());
    println!("Edit the prover and mail sections, then run: veriflow serve");
    Ok(())
}
