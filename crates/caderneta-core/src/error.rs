use crate::domain::phone::PhoneError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("contact name is required")]
    EmptyName,
    #[error("invalid group name")]
    InvalidGroupName,
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),
}
