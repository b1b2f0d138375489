pub mod embed;
pub mod signal;
