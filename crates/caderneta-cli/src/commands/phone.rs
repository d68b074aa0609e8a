use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::{Args, Subcommand};
use caderneta_core::domain::{format_phone, validate_phone};

#[derive(Debug, Subcommand)]
pub enum PhoneCommand {
    /// Validate a phone number and print its canonical key
    Check(PhoneCheckArgs),
    /// Pretty-print a phone number for display
    Format(PhoneFormatArgs),
}

#[derive(Debug, Args)]
pub struct PhoneCheckArgs {
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct PhoneFormatArgs {
    pub phone: String,
}

pub fn check(ctx: &Context<'_>, args: PhoneCheckArgs) -> Result<()> {
    match validate_phone(&args.phone) {
        Ok(key) => {
            if ctx.json {
                print_json(&serde_json::json!({
                    "valid": true,
                    "key": key.as_str(),
                    "formatted": format_phone(&args.phone),
                }))?;
            } else {
                println!("valid: {} (key {})", format_phone(&args.phone), key);
            }
            Ok(())
        }
        Err(err) => {
            if ctx.json {
                print_json(&serde_json::json!({
                    "valid": false,
                    "error": err.to_string(),
                }))?;
            }
            Err(invalid_input(err.to_string()))
        }
    }
}

pub fn format(ctx: &Context<'_>, args: PhoneFormatArgs) -> Result<()> {
    let formatted = format_phone(&args.phone);
    if ctx.json {
        print_json(&serde_json::json!({ "formatted": formatted }))?;
    } else {
        println!("{}", formatted);
    }
    Ok(())
}
