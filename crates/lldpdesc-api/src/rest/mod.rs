pub mod client;
pub mod multipart;
pub mod xnm;

pub use client::RestClient;
