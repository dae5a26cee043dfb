pub mod cancel;
pub mod status;
