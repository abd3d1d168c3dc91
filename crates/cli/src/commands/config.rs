// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `queuectl config get/set` (spec §4.5, §6.1).

use anyhow::Result;
use clap::Subcommand;
use queuectl_core::config::is_recognized_key;
use queuectl_storage::{Store, StoreError};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print a config value (falls back to the hard-coded default)
    Get { key: String },
    /// Persist a config value
    Set { key: String, value: String },
}

pub fn handle(store: &Store, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            println!("{}", store.get_config(&key)?);
        }
        ConfigCommand::Set { key, value } => {
            if !is_recognized_key(&key) {
                return Err(StoreError::config_invalid(key).into());
            }
            store.set_config(&key, &value)?;
        }
    }
    Ok(())
}
