/// Router Module Index
///
/// Splits the console's HTTP surface by access level. Access control is applied per
/// module so a protected endpoint cannot be mounted without its check.

/// Routes open to everyone: health, navigation decisions, the sidebar menu.
/// Navigation reads the session but never rejects on it; the guard decides.
pub mod public;

/// The rule proxy. Every handler requires an `AuthenticatedSession`.
pub mod authenticated;

/// The page fallback: any other path is a console page and goes through the guard.
pub mod pages;
