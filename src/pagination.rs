use axum::http::Uri;
use foodgram_shared::{Page, Pagination};
use serde::Serialize;
use url::Url;

use crate::config::PaginationConfig;

/// `{count, next, previous, results}` with absolute page links.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

pub fn pagination(config: &PaginationConfig, page: Option<u64>, limit: Option<u64>) -> Pagination {
    Pagination::new(page, limit, config.page_size, config.max_page_size)
}

/// Request URL with `page` replaced; page 1 drops the parameter.
fn page_link(base_url: &str, uri: &Uri, page: u64) -> Option<String> {
    let mut url = Url::parse(base_url).ok()?.join(uri.path()).ok()?;

    let pairs = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()))
        .into_iter()
        .flatten()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();

    url.set_query(None);
    if page > 1 || !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        query.extend_pairs(pairs);
        if page > 1 {
            query.append_pair("page", &page.to_string());
        }
    }

    Some(url.to_string())
}

impl<T> Paginated<T> {
    pub fn new(page: Page<T>, pagination: Pagination, base_url: &str, uri: &Uri) -> Self {
        let next = pagination
            .has_next(page.count)
            .then(|| page_link(base_url, uri, pagination.page + 1))
            .flatten();

        let previous = pagination
            .has_previous()
            .then(|| page_link(base_url, uri, pagination.page - 1))
            .flatten();

        Self {
            count: page.count,
            next,
            previous,
            results: page.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(count: u64) -> Page<u64> {
        Page {
            count,
            results: vec![],
        }
    }

    #[test]
    fn test_links_keep_other_params() {
        let uri: Uri = "/api/recipes/?tags=lunch&page=2&tags=dinner&limit=2"
            .parse()
            .unwrap();
        let paginated = Paginated::new(
            page(10),
            Pagination { page: 2, limit: 2 },
            "http://localhost:8000",
            &uri,
        );

        assert_eq!(
            paginated.next.as_deref(),
            Some("http://localhost:8000/api/recipes/?tags=lunch&tags=dinner&limit=2&page=3")
        );
        assert_eq!(
            paginated.previous.as_deref(),
            Some("http://localhost:8000/api/recipes/?tags=lunch&tags=dinner&limit=2")
        );
    }

    #[test]
    fn test_no_links_on_single_page() {
        let uri: Uri = "/api/users/".parse().unwrap();
        let paginated = Paginated::new(page(3), Pagination::default(), "http://localhost", &uri);

        assert_eq!(paginated.next, None);
        assert_eq!(paginated.previous, None);
    }

    #[test]
    fn test_first_page_link_has_no_query() {
        let uri: Uri = "/api/users/?page=2".parse().unwrap();
        let paginated = Paginated::new(
            page(7),
            Pagination { page: 2, limit: 6 },
            "http://localhost",
            &uri,
        );

        assert_eq!(paginated.previous.as_deref(), Some("http://localhost/api/users/"));
        assert_eq!(paginated.next, None);
    }
}
