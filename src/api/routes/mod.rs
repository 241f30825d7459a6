pub mod codes;
pub mod status;
pub mod webhook;
