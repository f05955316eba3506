//! The durable store: short hashes and URLs kept in MySQL.

pub mod mysql;

pub use mysql::MySqlStore;
