//! Route parsing for pokeview
//!
//! ## Supported Routes
//!
//! - `/` - List screen (both list tabs)
//! - `/pokemon/<id>` - Detail screen for a numeric id or a name
//! - anything else - Not-found screen
//!
//! ## Accepted Forms
//!
//! - Plain paths: `/pokemon/25`, `pokemon/25/`
//! - Hash routing: `#/pokemon/25`
//! - Scheme links, case-insensitive: `pokeview://pokemon/25`, `POKEVIEW:/pokemon/25`
//! - Query and fragment are stripped: `/pokemon/25?utm=1#top`
//!
//! ## Example
//!
//! ```rust
//! use pokeview::router::{parse, Route};
//!
//! assert_eq!(parse("/pokemon/25"), Route::Detail { id: Some("25".into()) });
//! assert_eq!(parse("/"), Route::List);
//! ```

use std::fmt;

/// Strip query and fragment from a path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Path after a pokeview:// scheme (case-insensitive, slash variants)
#[inline]
fn after_scheme(raw: &str) -> Option<&str> {
    if let Some(pos) = raw.find("://") {
        if raw[..pos].eq_ignore_ascii_case("pokeview") {
            return Some(&raw[pos + 3..]);
        }
        return None;
    }
    let (scheme, rest) = raw.split_once(':')?;
    scheme.eq_ignore_ascii_case("pokeview").then_some(rest)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/pokemon/<id>`; `None` when the segment is missing
    Detail { id: Option<String> },
    /// Wildcard
    NotFound { path: String },
}

impl Route {
    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail { id: Some(id.into()) }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Detail { id: Some(id) } => write!(f, "/pokemon/{id}"),
            Route::Detail { id: None } => write!(f, "/pokemon/"),
            Route::NotFound { path } => write!(f, "{path}"),
        }
    }
}

/// Parse a route string. Never fails: unknown paths become `NotFound`.
pub fn parse(raw: &str) -> Route {
    let s = raw.trim();

    let path = if let Some(rest) = after_scheme(s) {
        rest
    } else if let Some(rest) = s.strip_prefix('#') {
        rest
    } else {
        s
    };
    let path = strip_query_frag(path);

    let mut segments = path.split('/').filter(|seg| !seg.is_empty());
    let first = segments.next().map(str::to_ascii_lowercase);
    let second = segments.next();
    let extra = segments.next();

    match (first.as_deref(), second, extra) {
        (None, _, _) => Route::List,
        (Some("pokemon"), id, None) => Route::Detail {
            id: id.map(|s| s.to_string()),
        },
        _ => Route::NotFound {
            path: normalized(path),
        },
    }
}

fn normalized(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
