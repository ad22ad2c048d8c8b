pub mod aggregate;
pub mod config;
pub mod filter;
pub mod model;
pub mod reducer;
pub mod settings;
pub mod state;
pub mod status;
pub mod summary;

// Vendor payloads and the fetch seam
pub mod source;
pub mod vendor;

// Derived views over successive polls
pub mod category;
pub mod history;
pub mod notify;
