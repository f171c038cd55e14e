// Handlers untuk local bell API
pub mod bell;
pub mod notification;
pub mod page;
