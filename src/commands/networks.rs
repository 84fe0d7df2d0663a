use std::path::Path;

use anyhow::Result;

use crate::config::Config;

/// Print the configured network aliases. Read-only; the alias wizard owns
/// creating and editing them.
pub fn run(config_path: &Path) -> Result<()> {
	let config = Config::load(config_path)?;

	if config.networks.is_empty() {
		println!("No network aliases configured.");
		return Ok(());
	}

	for (name, alias) in &config.networks {
		println!("{name}");
		println!("  URL:      {}", alias.url);
		println!("  Fee:      {} MINA", alias.fee);
		println!("  Key:      {}", alias.key_path);
		println!(
			"  Contract: {}",
			alias.smart_contract.as_deref().unwrap_or("(not chosen yet)")
		);
	}
	Ok(())
}
