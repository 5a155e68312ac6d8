use reqwest::Url;

use super::routes::{RouteRecord, RouteTable, join_paths};
use crate::error::ResolveError;

/// Record redirects followed before resolution gives up.
pub const MAX_REDIRECT_HOPS: usize = 8;

// Only used to parse and normalize locations; never dialed.
const LOCATION_BASE: &str = "http://console.invalid/";

/// ResolvedRoute
///
/// A location after matching against the route table, with record redirects applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    /// Normalized path, always starting with `/`, no trailing slash except for the root.
    pub path: String,
    /// `path` plus `?query` when the query is non-empty.
    pub full_path: String,
    pub query: Vec<(String, String)>,
    /// Name of the deepest matched record.
    pub name: Option<&'static str>,
    /// Records from the root of the table down to the deepest match.
    pub matched: Vec<&'static RouteRecord>,
    /// Full path originally requested, when a record redirect was followed.
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    pub fn deepest(&self) -> Option<&'static RouteRecord> {
        self.matched.last().copied()
    }
}

struct ParsedLocation {
    path: String,
    query: Vec<(String, String)>,
    raw_query: Option<String>,
}

impl ParsedLocation {
    fn full_path(&self) -> String {
        match &self.raw_query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.path, q),
            _ => self.path.clone(),
        }
    }
}

fn parse_location(location: &str) -> ParsedLocation {
    // Collapse leading slashes so `//host/x` stays a path instead of becoming an authority.
    let relative = format!("/{}", location.trim().trim_start_matches('/'));

    let parsed = Url::parse(LOCATION_BASE).and_then(|base| base.join(&relative));
    let (path, query, raw_query) = match parsed {
        Ok(url) => (
            url.path().to_string(),
            url.query_pairs().into_owned().collect(),
            url.query().map(str::to_string),
        ),
        Err(_) => (relative, Vec::new(), None),
    };

    let path = if path.len() > 1 {
        path.trim_end_matches('/').to_string()
    } else {
        path
    };
    let path = if path.is_empty() { "/".to_string() } else { path };

    ParsedLocation {
        path,
        query,
        raw_query,
    }
}

fn match_exact(
    records: &'static [RouteRecord],
    parent: &str,
    path: &str,
) -> Option<Vec<&'static RouteRecord>> {
    for record in records {
        if record.is_wildcard() {
            continue;
        }
        let full = join_paths(parent, record.path);
        if full.eq_ignore_ascii_case(path) {
            return Some(vec![record]);
        }
        if let Some(mut chain) = match_exact(record.children, &full, path) {
            chain.insert(0, record);
            return Some(chain);
        }
    }
    None
}

fn match_wildcard(records: &'static [RouteRecord]) -> Option<Vec<&'static RouteRecord>> {
    records
        .iter()
        .find(|record| record.is_wildcard())
        .map(|record| vec![record])
}

fn redirect_target(target: &str, from: &ResolvedRoute) -> String {
    if target.contains('?') {
        return target.to_string();
    }
    match from.full_path.split_once('?') {
        Some((_, query)) => format!("{target}?{query}"),
        None => target.to_string(),
    }
}

impl RouteTable {
    /// Matches `location` against the table. Paths compare ASCII case-insensitively and
    /// exact paths win over the catch-all regardless of declaration order. An unmatched
    /// path yields an empty `matched`.
    pub fn match_location(&self, location: &str) -> ResolvedRoute {
        let parsed = parse_location(location);
        let matched = match_exact(self.records(), "", &parsed.path)
            .or_else(|| match_wildcard(self.records()))
            .unwrap_or_default();

        ResolvedRoute {
            full_path: parsed.full_path(),
            path: parsed.path,
            query: parsed.query,
            name: matched.last().and_then(|record| record.name),
            matched,
            redirected_from: None,
        }
    }

    /// Resolves `location`, following record redirects until a record without one is
    /// reached. A redirect target without a query of its own keeps the current query.
    pub fn resolve(&self, location: &str) -> Result<ResolvedRoute, ResolveError> {
        let mut route = self.match_location(location);
        let original = route.full_path.clone();

        for _ in 0..MAX_REDIRECT_HOPS {
            let Some(target) = route.deepest().and_then(|record| record.redirect) else {
                return Ok(route);
            };
            route = self.match_location(&redirect_target(target, &route));
            route.redirected_from = Some(original.clone());
        }

        match route.deepest().and_then(|record| record.redirect) {
            None => Ok(route),
            Some(_) => Err(ResolveError::RedirectLoop(original)),
        }
    }

    /// Renders a named location as an href: the record's full path plus the encoded query.
    /// Unknown names render as the root path.
    pub fn href(&self, name: &str, query: &[(String, String)]) -> String {
        let path = self
            .find_by_name(name)
            .map(|(path, _)| path)
            .unwrap_or_else(|| "/".to_string());

        if query.is_empty() {
            return path;
        }

        match Url::parse(LOCATION_BASE).and_then(|base| base.join(&path)) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                match url.query() {
                    Some(q) => format!("{}?{}", url.path(), q),
                    None => url.path().to_string(),
                }
            }
            Err(_) => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::routes::{DASHBOARD, LAYOUT, LOGIN, RouteMeta};

    fn table() -> RouteTable {
        RouteTable::console()
    }

    #[test]
    fn child_route_matches_with_parent_chain() {
        let route = table().resolve("/rules?page=2").unwrap();
        assert_eq!(route.path, "/rules");
        assert_eq!(route.full_path, "/rules?page=2");
        assert_eq!(route.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(route.name, Some("Rules"));
        assert_eq!(route.matched.len(), 2);
        assert_eq!(route.matched[0].name, Some(LAYOUT));
        assert_eq!(route.redirected_from, None);
    }

    #[test]
    fn root_redirects_to_dashboard() {
        let route = table().resolve("/").unwrap();
        assert_eq!(route.name, Some(DASHBOARD));
        assert_eq!(route.full_path, "/dashboard");
        assert_eq!(route.redirected_from.as_deref(), Some("/"));
    }

    #[test]
    fn unknown_path_falls_through_wildcard_to_dashboard() {
        let route = table().resolve("/does/not/exist?x=1").unwrap();
        assert_eq!(route.name, Some(DASHBOARD));
        assert_eq!(route.full_path, "/dashboard?x=1");
        assert_eq!(route.query, vec![("x".to_string(), "1".to_string())]);
        assert_eq!(route.redirected_from.as_deref(), Some("/does/not/exist?x=1"));
    }

    #[test]
    fn redirect_keeps_requested_query() {
        let route = table().resolve("/?tab=1").unwrap();
        assert_eq!(route.name, Some(DASHBOARD));
        assert_eq!(route.path, "/dashboard");
        assert_eq!(route.full_path, "/dashboard?tab=1");
        assert_eq!(route.redirected_from.as_deref(), Some("/?tab=1"));
    }

    #[test]
    fn paths_match_case_insensitively() {
        let route = table().resolve("/Rules").unwrap();
        assert_eq!(route.name, Some("Rules"));
        assert_eq!(route.path, "/Rules");
        assert_eq!(route.redirected_from, None);
        assert_eq!(table().resolve("/LOGIN").unwrap().name, Some(LOGIN));
    }

    #[test]
    fn locations_are_normalized() {
        assert_eq!(table().resolve("login").unwrap().name, Some(LOGIN));
        assert_eq!(table().resolve("/login/").unwrap().path, "/login");
        let route = table().match_location("//evil.example/login");
        assert_eq!(route.path, "/evil.example/login");
        assert!(route.matched[0].is_wildcard());
    }

    #[test]
    fn match_without_redirect_keeps_layout_record() {
        let route = table().match_location("/");
        assert_eq!(route.name, Some(LAYOUT));
        assert_eq!(route.matched.len(), 1);
    }

    #[test]
    fn redirect_loop_is_an_error() {
        static LOOPING: &[RouteRecord] = &[
            RouteRecord {
                path: "/a",
                name: Some("A"),
                meta: RouteMeta {
                    requires_auth: None,
                    title: None,
                    icon: None,
                },
                redirect: Some("/b"),
                children: &[],
            },
            RouteRecord {
                path: "/b",
                name: Some("B"),
                meta: RouteMeta {
                    requires_auth: None,
                    title: None,
                    icon: None,
                },
                redirect: Some("/a"),
                children: &[],
            },
        ];
        let err = RouteTable::new(LOOPING).resolve("/a").unwrap_err();
        assert_eq!(err, ResolveError::RedirectLoop("/a".to_string()));
    }

    #[test]
    fn href_encodes_query_values() {
        let href = table().href(
            LOGIN,
            &[("redirect".to_string(), "/rules?page=2&size=10".to_string())],
        );
        assert_eq!(href, "/login?redirect=%2Frules%3Fpage%3D2%26size%3D10");
        assert_eq!(table().href(DASHBOARD, &[]), "/dashboard");
    }
}
