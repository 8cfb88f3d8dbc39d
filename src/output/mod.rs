mod check;
mod format;
mod store;

pub(crate) use check::{print_cleanup_table, print_system_check};
pub(crate) use store::{output_store_json, print_store_table};
