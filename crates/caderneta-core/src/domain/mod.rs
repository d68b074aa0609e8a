pub mod contact;
pub mod email;
pub mod group;
pub mod ids;
pub mod phone;

pub use contact::Contact;
pub use email::normalize_email;
pub use group::{normalize_group_name, Group, GroupName};
pub use ids::{ContactId, GroupId};
pub use phone::{
    format_phone, is_valid_phone, normalize_phone, phones_match, validate_phone, PhoneError,
    PhoneKey,
};
