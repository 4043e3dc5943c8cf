pub mod datastore;
pub mod protocol;
