mod document;
mod store;

pub(crate) use document::XmlDocument;
pub(crate) use store::{NodeValue, load, read_value, read_values, write_values};
