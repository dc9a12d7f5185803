//! Background jobs spawned off the request path.

pub mod batch_seeder;
