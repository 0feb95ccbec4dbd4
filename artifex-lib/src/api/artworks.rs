//! URL building and payload parsing for the artworks API.

use serde::Deserialize;
use url::Url;

use super::DatasetTotals;
use super::Page;
use crate::error::ApiError;
use crate::model::RawRow;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Columns requested for each row.
pub const ROW_FIELDS: &[&str] = &[
    "id",
    "title",
    "place_of_origin",
    "artist_display",
    "inscriptions",
    "date_start",
    "date_end",
];

const COLLECTION: &str = "artworks";

/// Builds the URL for page `page` with `limit` rows and the given field list.
pub fn page_url(base: &Url, page: usize, limit: usize, fields: &[String]) -> Result<Url, ApiError> {
    let mut url = collection_url(base)?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("limit", &limit.to_string())
        .append_pair("fields", &fields.join(","));
    Ok(url)
}

/// Builds the URL used to learn the dataset size.
///
/// Only ids are requested; the response's `pagination` block is what matters.
pub fn totals_url(base: &Url, limit: usize) -> Result<Url, ApiError> {
    let mut url = collection_url(base)?;
    url.query_pairs_mut()
        .append_pair("fields", "id")
        .append_pair("page", "1")
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

fn collection_url(base: &Url) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push(COLLECTION);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct ArtworksResponse {
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    data: Vec<RawRow>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    total_pages: Option<usize>,
}

/// Parses a page payload.
///
/// Records without an id are dropped and logged; they cannot be selected.
pub fn parse_page(number: usize, body: &str) -> Result<Page, ApiError> {
    let response: ArtworksResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;

    let received = response.data.len();
    let rows: Vec<_> = response
        .data
        .into_iter()
        .filter_map(RawRow::into_row)
        .collect();

    if rows.len() < received {
        log::warn!(
            "Page {}: dropped {} record(s) without an id",
            number,
            received - rows.len()
        );
    }

    Ok(Page::new(number, rows))
}

/// Parses the totals payload for a source with `page_size` rows per page.
pub fn parse_totals(body: &str, page_size: usize) -> Result<DatasetTotals, ApiError> {
    let response: ArtworksResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;

    let pagination = response
        .pagination
        .ok_or_else(|| ApiError::parse_with_body("missing pagination block", body))?;

    match (pagination.total, pagination.total_pages) {
        (Some(total), _) => Ok(DatasetTotals::from_rows(total, page_size)),
        (None, Some(pages)) => Ok(DatasetTotals::new(pages.saturating_mul(page_size), pages)),
        (None, None) => Err(ApiError::parse_with_body("pagination block has no totals", body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NO_INSCRIPTIONS;
    use crate::model::UNKNOWN;

    fn base() -> Url {
        Url::parse(DEFAULT_BASE_URL).unwrap()
    }

    fn fields() -> Vec<String> {
        ROW_FIELDS.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_page_url() {
        let url = page_url(&base(), 3, 7, &fields()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.artic.edu/api/v1/artworks?page=3&limit=7&fields=id%2Ctitle%2Cplace_of_origin%2Cartist_display%2Cinscriptions%2Cdate_start%2Cdate_end"
        );
    }

    #[test]
    fn test_totals_url_with_trailing_slash() {
        let base = Url::parse("https://example.org/api/v1/").unwrap();
        let url = totals_url(&base, 7).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/api/v1/artworks?fields=id&page=1&limit=7"
        );
    }

    #[test]
    fn test_cannot_be_a_base_url() {
        let base = Url::parse("mailto:someone@example.org").unwrap();
        assert!(matches!(
            totals_url(&base, 7),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_page() {
        let body = r#"{
            "pagination": {"total": 10, "limit": 7, "total_pages": 2, "current_page": 1},
            "data": [
                {"id": 27992, "title": "A Sunday on La Grande Jatte", "place_of_origin": "France",
                 "artist_display": "Georges Seurat", "inscriptions": null,
                 "date_start": 1884, "date_end": 1886},
                {"id": 28560, "title": "The Bedroom"},
                {"title": "No id"}
            ]
        }"#;
        let page = parse_page(1, body).unwrap();

        assert_eq!(page.len(), 2);
        let first = &page.rows()[0];
        assert_eq!(first.id.as_str(), "27992");
        assert_eq!(first.place_of_origin, "France");
        assert_eq!(first.inscriptions, NO_INSCRIPTIONS);
        assert_eq!(first.date_start, 1884);

        let second = &page.rows()[1];
        assert_eq!(second.artist_display, UNKNOWN);
        assert_eq!(second.date_end, 0);
    }

    #[test]
    fn test_parse_page_rejects_garbage() {
        let err = parse_page(1, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Parse { body: Some(_), .. }));
    }

    #[test]
    fn test_parse_totals() {
        let body = r#"{"pagination": {"total": 129884, "limit": 7, "total_pages": 18555}, "data": []}"#;
        assert_eq!(
            parse_totals(body, 7).unwrap(),
            DatasetTotals::new(129884, 18555)
        );

        let pages_only = r#"{"pagination": {"total_pages": 3}}"#;
        assert_eq!(
            parse_totals(pages_only, 7).unwrap(),
            DatasetTotals::new(21, 3)
        );

        assert!(parse_totals(r#"{"data": []}"#, 7).is_err());
    }
}
