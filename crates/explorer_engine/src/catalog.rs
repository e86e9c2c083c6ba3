//! Paged public catalogs: request URLs and payload decoding.
//!
//! Each catalog pages differently. Pokémon pages on the server (`limit` and
//! `offset` query parameters), countries come back as one collection that is
//! sliced locally, and jokes ignore the offset and return ten random entries.
use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::{CatalogItem, FailureKind, FetchError, ItemKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// PokéAPI listing. With `details`, every entry's detail record is also
    /// fetched for its stats and sprite.
    Pokemon { details: bool },
    /// REST Countries, sorted by common name.
    Countries,
    /// Official Joke API, ten random jokes per call.
    Jokes,
}

impl Catalog {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Catalog::Pokemon { .. } => "https://pokeapi.co",
            Catalog::Countries => "https://restcountries.com",
            Catalog::Jokes => "https://official-joke-api.appspot.com",
        }
    }

    /// URL of the request that yields the page at `offset`.
    pub fn page_url(
        &self,
        base_url: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Url, FetchError> {
        let base = base_url.trim_end_matches('/');
        match self {
            Catalog::Pokemon { .. } => {
                let mut url = parse_url(&format!("{base}/api/v2/pokemon"))?;
                url.query_pairs_mut()
                    .append_pair("limit", &limit.to_string())
                    .append_pair("offset", &offset.to_string());
                Ok(url)
            }
            Catalog::Countries => {
                let mut url = parse_url(&format!("{base}/v3.1/all"))?;
                url.query_pairs_mut().append_pair("fields", "name,flags,cca3");
                Ok(url)
            }
            Catalog::Jokes => parse_url(&format!("{base}/jokes/ten")),
        }
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PokemonListing {
    pub results: Vec<PokemonRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PokemonRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PokemonDetail {
    pub id: u64,
    pub name: String,
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: PokemonSprites,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PokemonSprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Country {
    pub name: CountryName,
    pub cca3: String,
    #[serde(default)]
    pub flags: CountryFlags,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CountryName {
    pub common: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CountryFlags {
    pub png: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Joke {
    pub id: u64,
    pub setup: String,
    pub punchline: String,
}

pub(crate) fn pokemon_item(entry: PokemonRef) -> CatalogItem {
    CatalogItem::new(ItemKey::Text(entry.name.clone()), entry.name)
}

/// Keyed by name like the plain listing, so both modes dedupe the same way.
pub(crate) fn pokemon_detail_item(detail: PokemonDetail) -> CatalogItem {
    let mut item = CatalogItem::new(ItemKey::Text(detail.name.clone()), detail.name);
    item.details.push(format!("ID: {}", detail.id));
    if let Some(exp) = detail.base_experience {
        item.details.push(format!("Base experience: {exp}"));
    }
    item.details.extend(
        detail
            .stats
            .into_iter()
            .map(|stat| format!("{}: {}", stat.stat.name, stat.base_stat)),
    );
    item.image_url = detail.sprites.front_default;
    item
}

/// Sort the full collection by common name and cut out one page.
pub(crate) fn country_page(
    mut all: Vec<Country>,
    offset: usize,
    limit: usize,
) -> Vec<CatalogItem> {
    all.sort_by_cached_key(|country| {
        (
            collation_key(&country.name.common),
            country.name.common.clone(),
        )
    });
    all.into_iter()
        .skip(offset)
        .take(limit)
        .map(|country| {
            let mut item = CatalogItem::new(ItemKey::Text(country.cca3), country.name.common);
            item.image_url = country.flags.png;
            item
        })
        .collect()
}

/// Accent and case folded form of `name`, so "Åland Islands" sorts among the
/// A's the way a locale-aware comparison places it.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) fn joke_item(joke: Joke) -> CatalogItem {
    let mut item = CatalogItem::new(ItemKey::Number(joke.id), joke.setup);
    item.details.push(joke.punchline);
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, name: &str) -> Country {
        Country {
            name: CountryName {
                common: name.to_string(),
            },
            cca3: code.to_string(),
            flags: CountryFlags::default(),
        }
    }

    #[test]
    fn pokemon_url_carries_limit_and_offset() {
        let url = Catalog::Pokemon { details: false }
            .page_url("https://pokeapi.co/", 20, 10)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://pokeapi.co/api/v2/pokemon?limit=10&offset=20"
        );
    }

    #[test]
    fn jokes_url_ignores_offset() {
        let first = Catalog::Jokes.page_url("http://127.0.0.1:9", 0, 10).unwrap();
        let later = Catalog::Jokes.page_url("http://127.0.0.1:9", 40, 10).unwrap();
        assert_eq!(first, later);
        assert_eq!(first.path(), "/jokes/ten");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = Catalog::Countries.page_url("not a url", 0, 10).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn countries_are_sorted_then_sliced() {
        let all = vec![
            country("SWE", "Sweden"),
            country("AUT", "Austria"),
            country("NOR", "Norway"),
            country("DNK", "Denmark"),
        ];

        let page = country_page(all, 1, 2);

        let titles: Vec<_> = page.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Denmark", "Norway"]);
        assert_eq!(page[0].key, ItemKey::Text("DNK".to_string()));
    }

    #[test]
    fn accented_and_lowercase_names_sort_by_base_letter() {
        let all = vec![
            country("ZMB", "Zambia"),
            country("ALA", "Åland Islands"),
            country("CIV", "Côte d'Ivoire"),
            country("ALB", "Albania"),
            country("HRV", "Croatia"),
            country("STP", "São Tomé and Príncipe"),
            country("SAU", "Saudi Arabia"),
            country("XAX", "aland Islands"),
        ];

        let page = country_page(all, 0, 10);

        let titles: Vec<_> = page.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "aland Islands",
                "Åland Islands",
                "Albania",
                "Côte d'Ivoire",
                "Croatia",
                "São Tomé and Príncipe",
                "Saudi Arabia",
                "Zambia",
            ]
        );
    }

    #[test]
    fn country_slice_past_end_is_empty() {
        let page = country_page(vec![country("SWE", "Sweden")], 10, 10);
        assert!(page.is_empty());
    }

    #[test]
    fn pokemon_detail_lists_stats() {
        let detail: PokemonDetail = serde_json::from_str(
            r#"{
                "id": 25,
                "name": "pikachu",
                "base_experience": 112,
                "sprites": { "front_default": "https://img/25.png" },
                "stats": [ { "base_stat": 35, "stat": { "name": "hp" } } ]
            }"#,
        )
        .unwrap();

        let item = pokemon_detail_item(detail);

        assert_eq!(item.key, ItemKey::Text("pikachu".to_string()));
        assert_eq!(item.details, vec!["ID: 25", "Base experience: 112", "hp: 35"]);
        assert_eq!(item.image_url.as_deref(), Some("https://img/25.png"));
    }
}
