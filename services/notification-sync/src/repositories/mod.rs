// Repository modules untuk akses HR portal API
pub mod notification_repo;

#[cfg(test)]
pub(crate) mod fake;

// Export publik
pub use notification_repo::*;
