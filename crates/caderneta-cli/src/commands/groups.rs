use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::now_utc;
use anyhow::Result;
use clap::{Args, Subcommand};
use caderneta_core::domain::GroupName;
use caderneta_core::dto::GroupListItemDto;

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    Add(GroupAddArgs),
    Rm(GroupRemoveArgs),
    Ls(GroupListArgs),
    Rename(GroupRenameArgs),
}

#[derive(Debug, Args)]
pub struct GroupAddArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct GroupRemoveArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct GroupListArgs {}

#[derive(Debug, Args)]
pub struct GroupRenameArgs {
    pub name: String,
    pub new_name: String,
}

pub fn add_group(ctx: &Context<'_>, args: GroupAddArgs) -> Result<()> {
    let name = GroupName::new(&args.name)?;
    let group = ctx.store.groups().create(now_utc(), name)?;
    if ctx.json {
        print_json(&group)?;
    } else {
        println!("created group {} {}", group.id, group.name.as_str());
    }
    Ok(())
}

pub fn remove_group(ctx: &Context<'_>, args: GroupRemoveArgs) -> Result<()> {
    let group = ctx
        .store
        .groups()
        .find_by_name(args.name.trim())?
        .ok_or_else(|| not_found(format!("group {}", args.name)))?;
    ctx.store.groups().delete(group.id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "id": group.id }))?;
    } else {
        println!("deleted group {}", group.name.as_str());
    }
    Ok(())
}

pub fn list_groups(ctx: &Context<'_>, _args: GroupListArgs) -> Result<()> {
    let items: Vec<GroupListItemDto> = ctx
        .store
        .groups()
        .list_with_counts()?
        .into_iter()
        .map(|(group, count)| GroupListItemDto {
            id: group.id,
            name: group.name.as_str().to_string(),
            contacts: count,
        })
        .collect();

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("no groups");
        return Ok(());
    }

    for item in items {
        println!("{} ({})", item.name, item.contacts);
    }
    Ok(())
}

pub fn rename_group(ctx: &Context<'_>, args: GroupRenameArgs) -> Result<()> {
    let group = ctx
        .store
        .groups()
        .find_by_name(args.name.trim())?
        .ok_or_else(|| not_found(format!("group {}", args.name)))?;
    let new_name = GroupName::new(&args.new_name)?;
    let renamed = ctx.store.groups().rename(group.id, new_name)?;
    if ctx.json {
        print_json(&renamed)?;
    } else {
        println!("renamed group to {}", renamed.name.as_str());
    }
    Ok(())
}
