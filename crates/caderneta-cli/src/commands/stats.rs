use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use caderneta_core::domain::normalize_phone;
use caderneta_core::dto::{GroupListItemDto, StatsDto};
use caderneta_core::rules::{annotate_duplicates, duplicate_groups};

#[derive(Debug, Args)]
pub struct StatsArgs {}

pub fn stats(ctx: &Context<'_>, _args: StatsArgs) -> Result<()> {
    let contacts = ctx.store.contacts().list_all()?;
    let groups = ctx.store.groups().list_with_counts()?;

    let marks = annotate_duplicates(&contacts);
    let duplicate_contacts = marks.iter().filter(|mark| mark.is_some()).count();
    let invalid_phones = contacts
        .iter()
        .filter(|contact| normalize_phone(&contact.phone).is_none())
        .count();

    let dto = StatsDto {
        contacts: contacts.len(),
        groups: groups.len(),
        duplicate_groups: duplicate_groups(&contacts).len(),
        duplicate_contacts,
        invalid_phones,
        per_group: groups
            .into_iter()
            .map(|(group, count)| GroupListItemDto {
                id: group.id,
                name: group.name.as_str().to_string(),
                contacts: count,
            })
            .collect(),
    };

    if ctx.json {
        return print_json(&dto);
    }

    println!("contacts: {}", dto.contacts);
    println!("groups: {}", dto.groups);
    println!("duplicate groups: {}", dto.duplicate_groups);
    println!("duplicate contacts: {}", dto.duplicate_contacts);
    println!("invalid phones: {}", dto.invalid_phones);
    if !dto.per_group.is_empty() {
        println!("per group:");
        for group in &dto.per_group {
            println!("  {} ({})", group.name, group.contacts);
        }
    }
    Ok(())
}
