pub mod services;

pub use services::{MailRelayService, NullNotifier};
