use anyhow::Result;
use caderneta_config::AppConfig;
use caderneta_core::domain::{Group, GroupName};
use caderneta_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod backup;
pub mod completions;
pub mod contacts;
pub mod dedup;
pub mod groups;
pub mod phone;
pub mod stats;
pub mod transfer;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Resolves `--group NAME`, falling back to the configured default group.
/// The group is created on first use.
pub fn resolve_group(
    ctx: &Context<'_>,
    now_utc: i64,
    flag: Option<&str>,
) -> Result<Option<Group>> {
    let name = match flag {
        Some(name) => Some(name.to_string()),
        None => ctx.config.default_group.clone(),
    };
    let Some(name) = name else {
        return Ok(None);
    };
    let name = GroupName::new(&name)?;
    let group = ctx.store.groups().upsert(now_utc, name)?;
    Ok(Some(group))
}
