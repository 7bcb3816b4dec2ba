//! `tracker config` -- print the effective configuration.

use crate::cli::{GlobalArgs, ServerArgs};

pub fn run(global: &GlobalArgs, args: &ServerArgs) -> anyhow::Result<()> {
    let config = super::resolve_config(global, args)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
