use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use super::resolver::ResolvedRoute;
use super::routes::{LAYOUT, RouteTable, join_paths};

/// One sidebar entry of the console layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
    pub title: String,
    pub icon: Option<String>,
}

/// Sidebar entries: the titled children of the layout record, in declaration order.
pub fn menu_items(table: &RouteTable) -> Vec<MenuItem> {
    let Some((layout_path, chain)) = table.find_by_name(LAYOUT) else {
        return Vec::new();
    };
    let Some(layout) = chain.last() else {
        return Vec::new();
    };

    layout
        .children
        .iter()
        .filter_map(|child| {
            let name = child.name?;
            let title = child.meta.title?;
            Some(MenuItem {
                name: name.to_string(),
                path: join_paths(&layout_path, child.path),
                title: title.to_string(),
                icon: child.meta.icon.map(str::to_string),
            })
        })
        .collect()
}

/// Title of the deepest matched record that declares one.
pub fn page_title(route: &ResolvedRoute) -> Option<&'static str> {
    route.matched.iter().rev().find_map(|record| record.meta.title)
}

/// Icon of the deepest matched record that declares one.
pub fn page_icon(route: &ResolvedRoute) -> Option<&'static str> {
    route.matched.iter().rev().find_map(|record| record.meta.icon)
}
