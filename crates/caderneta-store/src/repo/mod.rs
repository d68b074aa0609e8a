pub mod contacts;
pub mod groups;

pub use contacts::{ContactNew, ContactUpdate, ContactsRepo};
pub use groups::GroupsRepo;
