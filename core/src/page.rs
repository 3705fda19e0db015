//! Pagination metadata carried in response headers.

use crate::http::HttpResponse;

/// Values of the `x-page` family of headers. Absent or empty headers read as
/// `None`; the last page reports an empty `x-next-page`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

impl Pagination {
    pub fn from_response(response: &HttpResponse) -> Self {
        Self {
            page: number(response, "x-page"),
            per_page: number(response, "x-per-page"),
            next_page: number(response, "x-next-page"),
            prev_page: number(response, "x-prev-page"),
            total: number(response, "x-total"),
            total_pages: number(response, "x-total-pages"),
        }
    }
}

fn number<T: std::str::FromStr>(response: &HttpResponse, name: &str) -> Option<T> {
    response
        .header(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}

/// One page of a list result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.pagination.next_page.is_some()
    }

    /// Converts every item, keeping the pagination metadata.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            pagination: self.pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: "[]".to_string(),
        }
    }

    #[test]
    fn reads_gitlab_pagination_headers() {
        let pagination = Pagination::from_response(&response(&[
            ("X-Page", "2"),
            ("X-Per-Page", "20"),
            ("X-Next-Page", "3"),
            ("X-Prev-Page", "1"),
            ("X-Total", "45"),
            ("X-Total-Pages", "3"),
        ]));
        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.next_page, Some(3));
        assert_eq!(pagination.total, Some(45));
    }

    #[test]
    fn empty_next_page_means_last_page() {
        let page = Page {
            items: vec![1, 2],
            pagination: Pagination::from_response(&response(&[("x-next-page", "")])),
        };
        assert!(!page.has_next());
    }

    #[test]
    fn try_map_keeps_metadata_and_stops_on_error() {
        let page = Page {
            items: vec![1, 2, 3],
            pagination: Pagination {
                next_page: Some(2),
                ..Pagination::default()
            },
        };
        let doubled: Page<i32> = page.clone().try_map(|n| Ok::<_, ()>(n * 2)).unwrap();
        assert_eq!(doubled.items, vec![2, 4, 6]);
        assert!(doubled.has_next());
        assert!(page.try_map(|n| if n == 2 { Err("two") } else { Ok(n) }).is_err());
    }
}
