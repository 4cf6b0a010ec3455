pub mod groups;
pub mod login;
