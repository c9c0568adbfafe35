pub mod handlers;
pub mod models;
pub mod ports;
pub mod router;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;

pub use models::*;
pub use ports::{IdentityPort, NotificationPort};
pub use state::AppState;
pub use store::SchedulingStore;
