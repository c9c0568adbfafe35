pub mod services;

pub use services::HttpIdentityService;
