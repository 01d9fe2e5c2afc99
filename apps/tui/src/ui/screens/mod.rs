pub mod delete_confirm;
pub mod detail;
pub mod edit;
pub mod entry_form;
pub mod help;
pub mod map;
pub mod search;
