pub mod types;

pub use types::QrTraceError;
