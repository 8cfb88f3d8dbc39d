pub(crate) mod disk;
pub(crate) mod field;
pub(crate) mod stamp;
pub(crate) mod text;

pub(crate) use disk::free_disk_space_gb;
pub(crate) use field::check_field;
pub(crate) use stamp::{run_stamp, warning_key};
pub(crate) use text::{parse_assignment, str_to_bool};
