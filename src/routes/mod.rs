/// Router Module Index
///
/// Routes are grouped by who may call them. Access control is applied per group in
/// `create_router`, so a route cannot end up unprotected by being registered in the wrong place.

/// Anonymous, read-only routes (menu, movie catalog).
pub mod public;

/// Routes behind the `AuthUser` middleware.
pub mod authenticated;

/// Authenticated routes whose handlers also require the admin role.
pub mod admin;
