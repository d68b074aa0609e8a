use crate::commands::{print_json, resolve_group, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{format_timestamp_datetime, now_utc, parse_contact_id};
use anyhow::Result;
use clap::{ArgAction, Args};
use caderneta_core::domain::{
    format_phone, is_valid_phone, normalize_phone, validate_phone, ContactId, GroupId,
};
use caderneta_core::dto::{ContactDetailDto, ContactListItemDto};
use caderneta_core::rules::{annotate_duplicates, DuplicateKind};
use caderneta_store::query::ContactQuery;
use caderneta_store::repo::{ContactNew, ContactUpdate};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Args)]
pub struct AddContactArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub group: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditContactArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "group")]
    pub ungroup: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "group")]
    pub ungrouped: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub duplicates: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn add_contact(ctx: &Context<'_>, args: AddContactArgs) -> Result<()> {
    validate_phone(&args.phone).map_err(|err| invalid_input(err.to_string()))?;

    let now = now_utc();
    let group = resolve_group(ctx, now, args.group.as_deref())?;
    let contact = ctx.store.contacts().create(
        now,
        ContactNew {
            name: args.name,
            phone: args.phone,
            email: args.email,
            group_id: group.as_ref().map(|g| g.id),
        },
    )?;

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("created {} {}", contact.id, contact.name);
    }
    Ok(())
}

pub fn edit_contact(ctx: &Context<'_>, args: EditContactArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_contact_id(&args.id)?;

    let mut update = ContactUpdate::default();
    if let Some(name) = args.name {
        update.name = Some(name);
    }
    if let Some(phone) = args.phone {
        if !is_valid_phone(&phone) {
            // Accepted so legacy data can be corrected incrementally; the
            // contact simply drops out of phone-based dedup.
            warn!(phone = %phone, "phone does not normalize, contact will not match duplicates");
        }
        update.phone = Some(phone);
    }
    if let Some(email) = args.email {
        update.email = Some(normalize_optional_value(email));
    }
    if args.ungroup {
        update.group_id = Some(None);
    } else if let Some(group) = args.group.as_deref() {
        let group = resolve_group(ctx, now, Some(group))?;
        update.group_id = Some(group.map(|g| g.id));
    }

    if update.is_empty() {
        return Err(invalid_input("no updates provided"));
    }

    let contact = ctx.store.contacts().update(now, id, update)?;
    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("updated {} {}", contact.id, contact.name);
    }
    Ok(())
}

pub fn show_contact(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let contact = ctx
        .store
        .contacts()
        .get(id)?
        .ok_or_else(|| not_found("contact not found"))?;

    let group = match contact.group_id {
        Some(group_id) => ctx.store.groups().get(group_id)?,
        None => None,
    };

    let detail = ContactDetailDto {
        id: contact.id,
        name: contact.name.clone(),
        phone: contact.phone.clone(),
        phone_key: normalize_phone(&contact.phone).map(|key| key.as_str().to_string()),
        email: contact.email.clone(),
        group_id: contact.group_id,
        group: group.as_ref().map(|g| g.name.as_str().to_string()),
        created_at: contact.created_at,
        updated_at: contact.updated_at,
    };

    if ctx.json {
        print_json(&detail)?;
        return Ok(());
    }

    println!("id: {}", detail.id);
    println!("name: {}", detail.name);
    println!("phone: {}", format_phone(&detail.phone));
    match detail.phone_key.as_deref() {
        Some(key) => println!("phone_key: {}", key),
        None => println!("phone_key: (not normalizable)"),
    }
    if let Some(email) = detail.email.as_deref() {
        println!("email: {}", email);
    }
    if let Some(group) = detail.group.as_deref() {
        println!("group: {}", group);
    }
    println!(
        "created_at: {}",
        format_timestamp_datetime(detail.created_at)
    );
    println!(
        "updated_at: {}",
        format_timestamp_datetime(detail.updated_at)
    );
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    // Duplicate marks are computed against the whole store, not the filtered
    // view, so a filtered listing still shows store-wide duplicates.
    let all = ctx.store.contacts().list_all()?;
    let marks: HashMap<ContactId, DuplicateKind> = all
        .iter()
        .zip(annotate_duplicates(&all))
        .filter_map(|(contact, mark)| mark.map(|kind| (contact.id, kind)))
        .collect();

    let group_names: HashMap<GroupId, String> = ctx
        .store
        .groups()
        .list_with_counts()?
        .into_iter()
        .map(|(group, _)| (group.id, group.name.as_str().to_string()))
        .collect();

    let mut query = match args.filter.as_deref() {
        Some(text) => ContactQuery::with_text(text),
        None => ContactQuery::default(),
    };
    if let Some(name) = args.group.as_deref() {
        let group = ctx
            .store
            .groups()
            .find_by_name(name)?
            .ok_or_else(|| not_found(format!("group {name}")))?;
        query.group_id = Some(group.id);
    }
    query.ungrouped = args.ungrouped;

    let listed = ctx.store.contacts().list(&query)?;
    let mut items: Vec<ContactListItemDto> = listed
        .into_iter()
        .map(|contact| ContactListItemDto {
            id: contact.id,
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            group: contact
                .group_id
                .and_then(|id| group_names.get(&id).cloned()),
            duplicate: marks.get(&contact.id).copied(),
        })
        .collect();

    if args.duplicates {
        items.retain(|item| item.duplicate.is_some());
    }

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("no contacts");
        return Ok(());
    }

    for item in items {
        let group_suffix = item
            .group
            .as_deref()
            .map(|name| format!("  [{}]", name))
            .unwrap_or_default();
        let dup_suffix = item
            .duplicate
            .map(|kind| format!("  (duplicate: {})", kind.as_str()))
            .unwrap_or_default();
        println!(
            "{}  {}  {}{}{}",
            item.id,
            item.name,
            format_phone(&item.phone),
            group_suffix,
            dup_suffix
        );
    }
    Ok(())
}

pub fn delete_contact(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    ctx.store.contacts().delete(id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "id": id }))?;
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

fn normalize_optional_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
