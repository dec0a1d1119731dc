//! HTTP query-string form of a catalog request.
//!
//! List parameters are comma separated (`colors=ivory,grey`); blank entries
//! are dropped.

use serde::{Deserialize, Deserializer};

use super::filter::ProductFilter;
use super::page::{DEFAULT_PAGE_SIZE, PageError, PageRequest};
use super::sort::SortOrder;
use crate::types::Price;

/// Raw catalog parameters as they arrive from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(alias = "q")]
    pub keyword: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "comma_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub finishes: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub colors: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub room_types: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub sizes: Vec<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort: SortOrder,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CatalogQuery {
    /// The requested page, defaulting to page 1 of [`DEFAULT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if an explicit page or limit is zero.
    pub fn page_request(&self) -> Result<PageRequest, PageError> {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// The filter part of the query.
    #[must_use]
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            keyword: self.keyword.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            finishes: self.finishes.clone(),
            colors: self.colors.clone(),
            room_types: self.room_types.clone(),
            sizes: self.sizes.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// Split a comma separated parameter into trimmed, non-empty values.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(split_list).unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" ivory, ,grey,"), vec!["ivory", "grey"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_defaults() {
        let query: CatalogQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.sort, SortOrder::Featured);
        assert_eq!(query.page_request().unwrap(), PageRequest::default());
        assert!(query.filter().is_empty());
    }

    #[test]
    fn test_parses_lists_and_aliases() {
        let query: CatalogQuery = serde_json::from_value(json!({
            "q": "marble",
            "colors": "white, grey",
            "roomTypes": "bathroom",
            "minPrice": "50",
            "sort": "price_asc",
            "page": 2,
            "limit": 24
        }))
        .unwrap();

        let filter = query.filter();
        assert_eq!(filter.keyword.as_deref(), Some("marble"));
        assert_eq!(filter.colors, vec!["white", "grey"]);
        assert_eq!(filter.room_types, vec!["bathroom"]);
        assert_eq!(filter.min_price, Some(Price::from_units(50)));
        assert_eq!(query.sort, SortOrder::PriceAsc);

        let page = query.page_request().unwrap();
        assert_eq!((page.page(), page.limit()), (2, 24));
    }

    #[test]
    fn test_zero_page_is_an_error() {
        let query = CatalogQuery {
            page: Some(0),
            ..CatalogQuery::default()
        };
        assert_eq!(query.page_request(), Err(PageError::ZeroPage));
    }
}
