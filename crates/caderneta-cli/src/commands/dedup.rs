use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::{Args, Subcommand};
use caderneta_core::domain::{format_phone, Contact, ContactId};
use caderneta_core::rules::{duplicate_groups, DuplicateKind};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Subcommand)]
pub enum DedupCommand {
    /// Scan all contacts for duplicate phones and emails
    Scan(DedupScanArgs),
}

#[derive(Debug, Args)]
pub struct DedupScanArgs {
    #[arg(long, help = "Only report the first N duplicate groups (after sorting)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct DedupScanReport {
    contacts_scanned: usize,
    duplicate_groups: usize,
    groups_reported: usize,
    // Groups are ordered by size desc, then key.
    groups: Vec<DedupGroupResult>,
}

#[derive(Debug, Serialize)]
struct DedupGroupResult {
    kind: DuplicateKind,
    key: String,
    members: Vec<DedupMemberResult>,
}

#[derive(Debug, Serialize)]
struct DedupMemberResult {
    id: ContactId,
    name: String,
    phone: String,
    email: Option<String>,
}

pub fn scan(ctx: &Context<'_>, args: DedupScanArgs) -> Result<()> {
    let contacts = ctx.store.contacts().list_all()?;
    let by_id: HashMap<ContactId, &Contact> =
        contacts.iter().map(|contact| (contact.id, contact)).collect();

    let mut groups = duplicate_groups(&contacts);
    let duplicate_count = groups.len();
    if let Some(limit) = args.limit {
        groups.truncate(limit);
    }

    let report = DedupScanReport {
        contacts_scanned: contacts.len(),
        duplicate_groups: duplicate_count,
        groups_reported: groups.len(),
        groups: groups
            .into_iter()
            .map(|group| DedupGroupResult {
                kind: group.kind,
                key: group.key,
                members: group
                    .contact_ids
                    .iter()
                    .filter_map(|id| by_id.get(id))
                    .map(|contact| DedupMemberResult {
                        id: contact.id,
                        name: contact.name.clone(),
                        phone: contact.phone.clone(),
                        email: contact.email.clone(),
                    })
                    .collect(),
            })
            .collect(),
    };

    if ctx.json {
        return print_json(&report);
    }

    if report.duplicate_groups == 0 {
        println!("No duplicate groups found.");
        return Ok(());
    }

    println!(
        "{} duplicate group(s) across {} contact(s).",
        report.duplicate_groups, report.contacts_scanned
    );
    for group in &report.groups {
        println!();
        match group.kind {
            DuplicateKind::Phone => println!("phone {} ({} contacts)", group.key, group.members.len()),
            DuplicateKind::Email => println!("email {} ({} contacts)", group.key, group.members.len()),
        }
        for member in &group.members {
            println!("  {}  {}  {}", member.id, member.name, format_phone(&member.phone));
        }
    }
    Ok(())
}
