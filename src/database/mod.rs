// TabStash storage layer
// SQLite-backed key-value storage standing in for the extension's local
// storage area.

pub mod connection;
pub mod migrations;

pub use connection::Database;
