//! SeaORM storage plumbing

pub mod connection;

pub use connection::connect;
