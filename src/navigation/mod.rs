/// Console navigation: the static route table, location resolution, the
/// authentication guard and the sidebar menu derived from the table.
pub mod guard;
pub mod menu;
pub mod resolver;
pub mod routes;

pub use guard::{AuthState, Location, NavigationDecision, decide, requires_auth};
pub use menu::{MenuItem, menu_items, page_icon, page_title};
pub use resolver::ResolvedRoute;
pub use routes::{RouteMeta, RouteRecord, RouteTable};
