use anyhow::Result;

use buildact_lib::serialize::ActionRegistry;

use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_actions(format: OutputFormat) -> Result<()> {
  let registry = ActionRegistry::with_builtins();
  let names: Vec<&str> = registry.names().collect();

  if format.is_json() {
    print_json(&names)?;
  } else {
    for name in names {
      println!("  {} {}", symbols::INFO, name);
    }
  }

  Ok(())
}
