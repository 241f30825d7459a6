pub mod artifacts;
pub mod decoder;
pub mod metadata;

pub use decoder::{decode_qr, DecodeOutcome};
pub use metadata::{extract_metadata, CaptureMetadata};
