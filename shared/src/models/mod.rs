// Wire model dari HR portal API
pub mod notification;

pub use notification::*;
