// API module entry
// Face data endpoints and shared response builders

pub mod handlers;
pub mod response;
