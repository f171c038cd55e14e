// Shared library untuk HR portal clients
pub mod models;
pub mod utils;
