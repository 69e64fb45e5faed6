/// HTTP handlers, one module per resource.
///
/// Every handler returns `Result<_, AppError>`; data access failures become a generic 500
/// and the detail only reaches the logs.
pub mod assignments;
pub mod catalog;
pub mod menu;
pub mod movies;
pub mod session;
pub mod users;
