//! Abstractions for page-based pagination.

/// Default amount of items on a single [`Page`].
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Maximum amount of items on a single [`Page`].
pub const MAX_PER_PAGE: u32 = 100;

/// Arguments selecting a single [`Page`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Arguments {
    /// One-based number of the requested [`Page`].
    pub page: u32,

    /// Amount of items on the requested [`Page`].
    pub per_page: u32,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Arguments {
    /// Creates new [`Arguments`], clamping the provided values into the
    /// supported ranges.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    /// Returns these [`Arguments`] with the values clamped into the supported
    /// ranges.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(Some(self.page), Some(self.per_page))
    }
}

/// Single page of items.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// One-based number of this [`Page`].
    pub page: u32,

    /// Amount of items requested per [`Page`].
    pub per_page: u32,

    /// Total amount of items across all the pages.
    pub total: u64,

    /// Total amount of pages.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Maps the items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}
