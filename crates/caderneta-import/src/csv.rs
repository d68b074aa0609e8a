//! CSV parsing for contact import and export.
//!
//! The first record is a header; name/phone/email columns are matched
//! case-insensitively, with the Portuguese spellings the original exports
//! use accepted as aliases. Quoted fields may contain commas, newlines and
//! doubled quotes.

use crate::error::{ImportError, Result};
use caderneta_core::domain::Contact;
use serde::Serialize;
use std::collections::HashMap;

const NAME_HEADERS: &[&str] = &["name", "nome"];
const PHONE_HEADERS: &[&str] = &["phone", "telefone", "celular"];
const EMAIL_HEADERS: &[&str] = &["email", "e-mail"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub contacts: Vec<CsvContact>,
    pub warnings: Vec<String>,
    /// Rows dropped for missing name or phone.
    pub skipped: usize,
}

/// Outcome of applying a parsed file against the store; filled in by the
/// caller that owns the duplicate policy.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub skipped_duplicates: usize,
    pub skipped_invalid: usize,
    pub warnings: Vec<String>,
    pub dry_run: bool,
}

pub fn parse_csv(data: &str) -> Result<ParsedCsv> {
    let mut records = split_records(data)?.into_iter();

    let header = records
        .next()
        .ok_or_else(|| ImportError::Parse("empty file".to_string()))?;
    let columns = HeaderMap::from_record(&header)?;

    let mut contacts = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped = 0;

    for (index, record) in records.enumerate() {
        // Header is line 1 as users see the file.
        let line = index + 2;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let name = columns.field(&record, columns.name);
        let phone = columns.field(&record, columns.phone);
        if name.is_empty() {
            warnings.push(format!("line {line}: missing name, row skipped"));
            skipped += 1;
            continue;
        }
        if phone.is_empty() {
            warnings.push(format!("line {line}: missing phone, row skipped"));
            skipped += 1;
            continue;
        }

        let email = columns
            .email
            .map(|idx| columns.field(&record, Some(idx)))
            .filter(|value| !value.is_empty());

        contacts.push(CsvContact { name, phone, email });
    }

    Ok(ParsedCsv {
        contacts,
        warnings,
        skipped,
    })
}

struct HeaderMap {
    name: Option<usize>,
    phone: Option<usize>,
    email: Option<usize>,
}

impl HeaderMap {
    fn from_record(header: &[String]) -> Result<Self> {
        let find = |aliases: &[&str]| {
            header
                .iter()
                .position(|column| aliases.iter().any(|alias| column.trim().eq_ignore_ascii_case(alias)))
        };

        let name = find(NAME_HEADERS);
        let phone = find(PHONE_HEADERS);
        if name.is_none() {
            return Err(ImportError::MissingColumn("name"));
        }
        if phone.is_none() {
            return Err(ImportError::MissingColumn("phone"));
        }

        Ok(Self {
            name,
            phone,
            email: find(EMAIL_HEADERS),
        })
    }

    fn field(&self, record: &[String], index: Option<usize>) -> String {
        index
            .and_then(|idx| record.get(idx))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

/// RFC-4180-style record splitter: fields separated by commas, records by
/// newlines, quotes hide both and double to escape themselves.
fn split_records(data: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = data.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(ImportError::Parse("unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Serializes contacts for `export csv`, resolving group ids to names.
pub fn export_csv(
    contacts: &[Contact],
    group_names: &HashMap<caderneta_core::domain::GroupId, String>,
) -> String {
    let mut out = String::from("name,phone,email,group\r\n");
    for contact in contacts {
        let group = contact
            .group_id
            .and_then(|id| group_names.get(&id))
            .map(String::as_str)
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{}\r\n",
            escape_field(&contact.name),
            escape_field(&contact.phone),
            escape_field(contact.email.as_deref().unwrap_or_default()),
            escape_field(group),
        ));
    }
    out
}

fn escape_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_csv, split_records, CsvContact};
    use crate::error::ImportError;

    #[test]
    fn parses_header_and_rows() {
        let parsed = parse_csv("name,phone,email\nAna,11987654321,ana@x.com\nBruno,2199998888,\n")
            .expect("parse");
        assert_eq!(parsed.contacts.len(), 2);
        assert_eq!(
            parsed.contacts[0],
            CsvContact {
                name: "Ana".to_string(),
                phone: "11987654321".to_string(),
                email: Some("ana@x.com".to_string()),
            }
        );
        assert_eq!(parsed.contacts[1].email, None);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn accepts_portuguese_headers() {
        let parsed = parse_csv("Nome,Telefone,E-mail\nAna,(11) 98765-4321,ana@x.com\n")
            .expect("parse");
        assert_eq!(parsed.contacts.len(), 1);
        assert_eq!(parsed.contacts[0].phone, "(11) 98765-4321");
    }

    #[test]
    fn missing_phone_column_is_an_error() {
        let err = parse_csv("name,email\nAna,ana@x.com\n").unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn("phone")));
    }

    #[test]
    fn rows_without_name_or_phone_are_skipped_with_warning() {
        let parsed = parse_csv("name,phone\nAna,11987654321\n,11987654321\nBruno,\n").expect("parse");
        assert_eq!(parsed.contacts.len(), 1);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings[0].contains("line 3"));
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let parsed =
            parse_csv("name,phone\n\"Souza, Ana \"\"Aninha\"\"\",11987654321\n").expect("parse");
        assert_eq!(parsed.contacts[0].name, "Souza, Ana \"Aninha\"");
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        let err = parse_csv("name,phone\n\"Ana,11987654321\n").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn split_records_handles_crlf_and_final_line() {
        let records = split_records("a,b\r\nc,d").expect("split");
        assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let parsed = parse_csv("name,phone\n\nAna,11987654321\n\n").expect("parse");
        assert_eq!(parsed.contacts.len(), 1);
        assert_eq!(parsed.skipped, 0);
    }
}
