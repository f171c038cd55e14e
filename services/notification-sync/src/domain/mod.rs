// Modul domain untuk Notification Sync
pub mod alert;
pub mod feed;

// Export publik
pub use alert::*;
pub use feed::*;
