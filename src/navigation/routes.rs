//! Static route table for the admin screens.

use std::collections::BTreeMap;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    RequiresAuth,
    RequiresGuest,
    Public,
}

/// Screen a route renders; rendering itself lives outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    Menus,
    MenuForm,
    Orders,
    OrderForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub access: Access,
}

pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor { path: "/login", name: "Login", view: View::Login, access: Access::RequiresGuest },
    RouteDescriptor { path: "/", name: "Dashboard", view: View::Dashboard, access: Access::RequiresAuth },
    RouteDescriptor { path: "/menus", name: "Menus", view: View::Menus, access: Access::RequiresAuth },
    RouteDescriptor { path: "/menus/new", name: "MenuCreate", view: View::MenuForm, access: Access::RequiresAuth },
    RouteDescriptor { path: "/menus/:id/edit", name: "MenuEdit", view: View::MenuForm, access: Access::RequiresAuth },
    RouteDescriptor { path: "/orders", name: "Orders", view: View::Orders, access: Access::RequiresAuth },
    RouteDescriptor { path: "/orders/new", name: "OrderCreate", view: View::OrderForm, access: Access::RequiresAuth },
    RouteDescriptor {
        path: "/orders/:id/edit",
        name: "OrderEdit",
        view: View::OrderForm,
        access: Access::RequiresAuth,
    },
];

/// A resolved route plus its `:param` captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static RouteDescriptor,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: &'static [RouteDescriptor]) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    /// Match a location against the table. Query strings and fragments are
    /// ignored, as is a trailing slash. Literal segments compare without regard
    /// to ASCII case; captured params keep the case they were given in. Static routes are listed before their
    /// parameterized siblings, so first match wins.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        let path = strip_location(location);
        let segments: Vec<&str> = split_segments(path).collect();
        self.routes.iter().find_map(|route| {
            match_segments(route.path, &segments).map(|params| RouteMatch { route, params })
        })
    }

    /// Access rule for a location; unknown locations are public.
    #[must_use]
    pub fn access_for(&self, location: &str) -> Access {
        self.resolve(location).map_or(Access::Public, |m| m.route.access)
    }
}

fn strip_location(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let pattern: Vec<&str> = split_segments(pattern).collect();
    if pattern.len() != segments.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (want, got) in pattern.iter().zip(segments) {
        match want.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_owned(), (*got).to_owned());
            }
            None if want.eq_ignore_ascii_case(got) => {}
            None => return None,
        }
    }
    Some(params)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
