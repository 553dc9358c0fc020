/// Shared pagination contract for list endpoints
///
/// Every listing operation runs a count query and a page query; responses
/// are wrapped in `{page, pageSize, total, data, links}` where `next` is
/// present only while more rows remain and `prev` only past page one.
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Page query parameters, 1-based
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Clamp page and pageSize to at least 1 so offset math stays valid
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        // Saturate: u32::MAX * u32::MAX exceeds i64, and an astronomical
        // OFFSET just yields an empty page.
        (self.page.max(1) as i64 - 1).saturating_mul(self.page_size as i64)
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// `self`/`next`/`prev` links for a paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub data: Vec<T>,
    pub links: PageLinks,
}

fn page_url(path: &str, extra: &[(&str, &str)], page: u32, page_size: u32) -> String {
    let mut query = String::new();
    for (key, value) in extra {
        query.push_str(key);
        query.push('=');
        query.push_str(&urlencoding::encode(value));
        query.push('&');
    }
    format!("{path}?{query}page={page}&pageSize={page_size}")
}

/// Build page links. `extra` carries the request's own filter parameters
/// (search query, structured filters) so links reproduce the full request.
pub fn build_links(path: &str, extra: &[(&str, &str)], params: PageParams, total: i64) -> PageLinks {
    let PageParams { page, page_size } = params.normalized();

    let consumed = (page as i64).saturating_mul(page_size as i64);
    let next = if total > consumed {
        Some(page_url(path, extra, page.saturating_add(1), page_size))
    } else {
        None
    };
    let prev = if page > 1 {
        Some(page_url(path, extra, page - 1, page_size))
    } else {
        None
    };

    PageLinks {
        self_link: page_url(path, extra, page, page_size),
        next,
        prev,
    }
}

/// Wrap a page of rows in the response envelope
pub fn paginate<T>(
    path: &str,
    extra: &[(&str, &str)],
    params: PageParams,
    total: i64,
    data: Vec<T>,
) -> Paginated<T> {
    let normalized = params.normalized();
    Paginated {
        page: normalized.page,
        page_size: normalized.page_size,
        total,
        links: build_links(path, extra, normalized, total),
        data,
    }
}
