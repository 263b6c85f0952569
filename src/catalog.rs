//! Endpoint layout and list-item derivation.
//!
//! List items carry no image in the API payload; the sprite URL is built from
//! the numeric id found at the end of each resource URL.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{ListPage, NamedResource, SummaryRecord};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Base URLs for the three external surfaces
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    sprite_base: String,
}

impl Endpoints {
    pub fn new(api_base: impl Into<String>, sprite_base: impl Into<String>) -> Self {
        Self {
            api_base: trim_slash(api_base.into()),
            sprite_base: trim_slash(sprite_base.into()),
        }
    }

    /// `{api}/pokemon`
    pub fn listing_base(&self) -> String {
        format!("{}/pokemon", self.api_base)
    }

    pub fn list_url(&self, limit: u32, offset: u64) -> String {
        format!("{}?limit={limit}&offset={offset}", self.listing_base())
    }

    pub fn first_page_url(&self, limit: u32) -> String {
        self.list_url(limit, 0)
    }

    /// `{api}/pokemon/{id}/` with the id percent-encoded
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/{}/", self.listing_base(), urlencoding::encode(id))
    }

    pub fn sprite_url(&self, id: u32) -> String {
        format!("{}/{id}.png", self.sprite_base)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_SPRITE_BASE)
    }
}

fn trim_slash(mut s: String) -> String {
    while s.ends_with('/') {
        s.pop();
    }
    s
}

fn trailing_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/(\d+)/$").expect("static regex"))
}

/// Numeric id from the last path segment before the final slash.
/// `".../pokemon/25/"` -> `Some(25)`; anything else -> `None`.
pub fn extract_id(url: &str) -> Option<u32> {
    trailing_id_re()
        .captures(url)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn summarize_one(res: &NamedResource, endpoints: &Endpoints) -> SummaryRecord {
    let id = extract_id(&res.url);
    SummaryRecord {
        id,
        name: res.name.clone(),
        sprite_url: id.map(|id| endpoints.sprite_url(id)),
        url: res.url.clone(),
    }
}

/// Map one page of results, preserving server order
pub fn summarize(page: &ListPage, endpoints: &Endpoints) -> Vec<SummaryRecord> {
    page.results
        .iter()
        .map(|r| summarize_one(r, endpoints))
        .collect()
}

/// `ceil(count / page_size)`; zero for an empty catalog
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(u64::from(page_size)).min(u64::from(u32::MAX)) as u32
}

/// Skip count for a 1-based page
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_id() {
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/10001/"), Some(10001));
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/25"), None);
        assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
        assert_eq!(extract_id(""), None);
        assert_eq!(extract_id("https://x/pokemon/99999999999999/"), None);
    }

    #[test]
    fn test_urls() {
        let ep = Endpoints::new("https://pokeapi.co/api/v2/", "https://img.example/sprites");
        assert_eq!(ep.list_url(20, 40), "https://pokeapi.co/api/v2/pokemon?limit=20&offset=40");
        assert_eq!(ep.first_page_url(20), "https://pokeapi.co/api/v2/pokemon?limit=20&offset=0");
        assert_eq!(ep.detail_url("25"), "https://pokeapi.co/api/v2/pokemon/25/");
        assert_eq!(ep.detail_url("mr mime"), "https://pokeapi.co/api/v2/pokemon/mr%20mime/");
        assert_eq!(ep.sprite_url(25), "https://img.example/sprites/25.png");
    }

    #[test]
    fn test_summarize_builds_sprite_from_id() {
        let ep = Endpoints::default();
        let page = ListPage {
            count: 2,
            next: None,
            previous: None,
            results: vec![
                NamedResource { name: "pikachu".into(), url: "https://pokeapi.co/api/v2/pokemon/25/".into() },
                NamedResource { name: "missingno".into(), url: "https://pokeapi.co/api/v2/pokemon/".into() },
            ],
        };
        let recs = summarize(&page, &ep);
        assert_eq!(recs[0].id, Some(25));
        assert_eq!(recs[0].sprite_url.as_deref(), Some(format!("{DEFAULT_SPRITE_BASE}/25.png").as_str()));
        assert_eq!(recs[1].id, None);
        assert_eq!(recs[1].sprite_url, None);
        assert_eq!(recs[1].name, "missingno");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(1302, 20), 66);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(2, 20), 20);
        assert_eq!(page_offset(66, 20), 1300);
    }
}
