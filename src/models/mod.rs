pub mod classification;
pub mod qr_code;
pub mod sighting;

pub use classification::{Category, Classification};
pub use qr_code::QrCode;
pub use sighting::{NewSighting, Sighting};
