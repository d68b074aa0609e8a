use crate::commands::{print_json, resolve_group, Context};
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args, Subcommand};
use caderneta_core::domain::{normalize_email, normalize_phone, GroupId};
use caderneta_core::dto::ContactDetailDto;
use caderneta_import::{parse_csv, ImportReport};
use caderneta_store::repo::ContactNew;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import contacts from a CSV file (name/phone/email header)
    Csv(ImportCsvArgs),
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Write all contacts to stdout as CSV
    Csv(ExportArgs),
    /// Write all contacts to stdout as JSON
    Json(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ImportCsvArgs {
    pub path: PathBuf,
    #[arg(long, help = "Assign imported contacts to this group")]
    pub group: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {}

pub fn import_csv(ctx: &Context<'_>, args: ImportCsvArgs) -> Result<()> {
    let data = fs::read_to_string(&args.path)
        .with_context(|| format!("read csv file {}", args.path.display()))?;
    let parsed = parse_csv(&data)?;

    // Duplicate checks run against every stored contact, regardless of
    // group: phone/email identity is global across the whole book.
    let existing = ctx.store.contacts().list_all()?;
    let mut seen_keys: HashSet<String> = existing
        .iter()
        .filter_map(|contact| normalize_phone(&contact.phone))
        .map(|key| key.as_str().to_string())
        .collect();
    let mut seen_emails: HashSet<String> = existing
        .iter()
        .filter_map(|contact| contact.email.as_deref().and_then(normalize_email))
        .collect();

    let now = now_utc();
    let group = if args.dry_run {
        None
    } else {
        resolve_group(ctx, now, args.group.as_deref())?
    };

    let mut report = ImportReport {
        created: 0,
        skipped_duplicates: 0,
        skipped_invalid: parsed.skipped,
        warnings: parsed.warnings,
        dry_run: args.dry_run,
    };

    for row in parsed.contacts {
        let key = normalize_phone(&row.phone);
        if key.is_none() && !ctx.config.import.allow_invalid_phones {
            report.warnings.push(format!(
                "{}: phone {:?} is not a valid Brazilian number, row skipped",
                row.name, row.phone
            ));
            report.skipped_invalid += 1;
            continue;
        }

        let email = row.email.as_deref().and_then(normalize_email);
        let duplicate = key
            .as_ref()
            .is_some_and(|key| seen_keys.contains(key.as_str()))
            || email.as_ref().is_some_and(|email| seen_emails.contains(email));
        if duplicate && ctx.config.import.skip_duplicates {
            report.warnings.push(format!(
                "{}: phone or email already present, row skipped",
                row.name
            ));
            report.skipped_duplicates += 1;
            continue;
        }

        if key.is_none() {
            report
                .warnings
                .push(format!("{}: phone {:?} stored unnormalized", row.name, row.phone));
        }

        if let Some(key) = &key {
            seen_keys.insert(key.as_str().to_string());
        }
        if let Some(email) = &email {
            seen_emails.insert(email.clone());
        }

        if !args.dry_run {
            ctx.store.contacts().create(
                now,
                ContactNew {
                    name: row.name,
                    phone: row.phone,
                    email: row.email,
                    group_id: group.as_ref().map(|g| g.id),
                },
            )?;
        }
        report.created += 1;
    }

    if ctx.json {
        return print_json(&report);
    }

    if report.dry_run {
        println!(
            "Dry-run: {} contact(s) would be created, {} duplicate(s), {} invalid row(s).",
            report.created, report.skipped_duplicates, report.skipped_invalid
        );
    } else {
        println!(
            "Imported {} contact(s), skipped {} duplicate(s) and {} invalid row(s).",
            report.created, report.skipped_duplicates, report.skipped_invalid
        );
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
    Ok(())
}

pub fn export_csv(ctx: &Context<'_>, _args: ExportArgs) -> Result<()> {
    let contacts = ctx.store.contacts().list_all()?;
    let group_names = group_name_map(ctx)?;
    print!("{}", caderneta_import::export_csv(&contacts, &group_names));
    Ok(())
}

pub fn export_json(ctx: &Context<'_>, _args: ExportArgs) -> Result<()> {
    let contacts = ctx.store.contacts().list_all()?;
    let group_names = group_name_map(ctx)?;
    let items: Vec<ContactDetailDto> = contacts
        .into_iter()
        .map(|contact| ContactDetailDto {
            id: contact.id,
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            phone_key: normalize_phone(&contact.phone).map(|key| key.as_str().to_string()),
            email: contact.email.clone(),
            group_id: contact.group_id,
            group: contact
                .group_id
                .and_then(|id| group_names.get(&id).cloned()),
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        })
        .collect();
    print_json(&items)
}

fn group_name_map(ctx: &Context<'_>) -> Result<HashMap<GroupId, String>> {
    Ok(ctx
        .store
        .groups()
        .list_with_counts()?
        .into_iter()
        .map(|(group, _)| (group.id, group.name.as_str().to_string()))
        .collect())
}
