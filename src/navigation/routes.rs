use std::collections::HashSet;

/// Path pattern of the catch-all record. Matches any location no other record matches.
pub const WILDCARD: &str = "/:pathMatch(.*)*";

pub const LOGIN: &str = "Login";
pub const LAYOUT: &str = "Layout";
pub const DASHBOARD: &str = "Dashboard";

/// RouteMeta
///
/// Per-record metadata. `requires_auth: None` means the record does not state a
/// requirement; only an explicit `Some(false)` opens a route to anonymous users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: Option<bool>,
    pub title: Option<&'static str>,
    pub icon: Option<&'static str>,
}

/// RouteRecord
///
/// One entry of the static route table. Child paths are relative to their parent
/// unless they start with `/`.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub meta: RouteMeta,
    /// Location to continue resolution at when this record is the deepest match.
    pub redirect: Option<&'static str>,
    pub children: &'static [RouteRecord],
}

impl RouteRecord {
    pub fn is_wildcard(&self) -> bool {
        self.path == WILDCARD
    }
}

const fn page(
    path: &'static str,
    name: &'static str,
    title: &'static str,
    icon: &'static str,
) -> RouteRecord {
    RouteRecord {
        path,
        name: Some(name),
        meta: RouteMeta {
            requires_auth: None,
            title: Some(title),
            icon: Some(icon),
        },
        redirect: None,
        children: &[],
    }
}

/// The console's pages. Everything under the layout inherits its auth requirement.
pub static CONSOLE_ROUTES: &[RouteRecord] = &[
    RouteRecord {
        path: "/login",
        name: Some(LOGIN),
        meta: RouteMeta {
            requires_auth: Some(false),
            title: Some("登录"),
            icon: None,
        },
        redirect: None,
        children: &[],
    },
    RouteRecord {
        path: "/",
        name: Some(LAYOUT),
        meta: RouteMeta {
            requires_auth: Some(true),
            title: None,
            icon: None,
        },
        redirect: Some("/dashboard"),
        children: &[
            page("dashboard", DASHBOARD, "仪表盘", "Odometer"),
            page("nodes", "Nodes", "节点管理", "Monitor"),
            page("rules", "Rules", "规则管理", "Switch"),
            page("tunnels", "Tunnels", "隧道管理", "Connection"),
            page("logs", "Logs", "操作日志", "Document"),
            page("system", "System", "系统设置", "Setting"),
            page("about", "About", "关于系统", "InfoFilled"),
        ],
    },
    RouteRecord {
        path: WILDCARD,
        name: None,
        meta: RouteMeta {
            requires_auth: None,
            title: None,
            icon: None,
        },
        redirect: Some("/"),
        children: &[],
    },
];

/// Joins a child path onto its parent's full path.
pub fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// RouteTable
///
/// Read-only view over a static record tree. Built once; every lookup walks the
/// tree in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    records: &'static [RouteRecord],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::console()
    }
}

impl RouteTable {
    pub const fn new(records: &'static [RouteRecord]) -> Self {
        Self { records }
    }

    pub const fn console() -> Self {
        Self::new(CONSOLE_ROUTES)
    }

    pub fn records(&self) -> &'static [RouteRecord] {
        self.records
    }

    /// Finds a named record. Returns its full path and the chain of records from the
    /// root down to it.
    pub fn find_by_name(&self, name: &str) -> Option<(String, Vec<&'static RouteRecord>)> {
        fn walk(
            records: &'static [RouteRecord],
            parent: &str,
            name: &str,
            chain: &mut Vec<&'static RouteRecord>,
        ) -> Option<String> {
            for record in records {
                let full = join_paths(parent, record.path);
                chain.push(record);
                if record.name == Some(name) {
                    return Some(full);
                }
                if let Some(found) = walk(record.children, &full, name, chain) {
                    return Some(found);
                }
                chain.pop();
            }
            None
        }

        let mut chain = Vec::new();
        walk(self.records, "", name, &mut chain).map(|path| (path, chain))
    }

    /// Checks the table's one structural invariant: route names are unique.
    /// Returns the first duplicated name.
    pub fn duplicate_name(&self) -> Option<&'static str> {
        fn walk(
            records: &'static [RouteRecord],
            seen: &mut HashSet<&'static str>,
        ) -> Option<&'static str> {
            for record in records {
                if let Some(name) = record.name {
                    if !seen.insert(name) {
                        return Some(name);
                    }
                }
                if let Some(dup) = walk(record.children, seen) {
                    return Some(dup);
                }
            }
            None
        }

        walk(self.records, &mut HashSet::new())
    }

    /// Every named, non-redirecting record with its full path, depth-first.
    pub fn pages(&self) -> Vec<(String, Vec<&'static RouteRecord>)> {
        fn walk(
            records: &'static [RouteRecord],
            parent: &str,
            chain: &mut Vec<&'static RouteRecord>,
            out: &mut Vec<(String, Vec<&'static RouteRecord>)>,
        ) {
            for record in records {
                if record.is_wildcard() {
                    continue;
                }
                let full = join_paths(parent, record.path);
                chain.push(record);
                if record.name.is_some() && record.redirect.is_none() {
                    out.push((full.clone(), chain.clone()));
                }
                walk(record.children, &full, chain, out);
                chain.pop();
            }
        }

        let mut out = Vec::new();
        walk(self.records, "", &mut Vec::new(), &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_route_names_are_unique() {
        assert_eq!(RouteTable::console().duplicate_name(), None);
    }

    #[test]
    fn duplicate_names_are_reported() {
        static DUPLICATED: &[RouteRecord] = &[
            page("/a", "Same", "A", "a"),
            RouteRecord {
                path: "/b",
                name: None,
                meta: RouteMeta {
                    requires_auth: None,
                    title: None,
                    icon: None,
                },
                redirect: None,
                children: &[page("c", "Same", "C", "c")],
            },
        ];
        assert_eq!(RouteTable::new(DUPLICATED).duplicate_name(), Some("Same"));
    }

    #[test]
    fn children_resolve_under_parent() {
        let (path, chain) = RouteTable::console().find_by_name("Rules").unwrap();
        assert_eq!(path, "/rules");
        let names: Vec<_> = chain.iter().map(|r| r.name).collect();
        assert_eq!(names, vec![Some(LAYOUT), Some("Rules")]);
    }

    #[test]
    fn join_paths_handles_absolute_and_relative_children() {
        assert_eq!(join_paths("/", "dashboard"), "/dashboard");
        assert_eq!(join_paths("/admin", "users"), "/admin/users");
        assert_eq!(join_paths("/admin", "/login"), "/login");
        assert_eq!(join_paths("/admin", ""), "/admin");
    }

    #[test]
    fn pages_skip_redirects_and_wildcard() {
        let paths: Vec<String> = RouteTable::console()
            .pages()
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "/login", "/dashboard", "/nodes", "/rules", "/tunnels", "/logs", "/system",
                "/about"
            ]
        );
    }
}
