pub mod codes;
pub mod connection;
pub mod schema;
pub mod sightings;
pub mod stats;

pub use codes::fingerprint;
pub use connection::Database;
pub use sightings::DestinationUpdate;
