use crate::validation::ValidationFailure;

/// Page size used when a caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A zero-based page index and a page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Build a page request. The size must be positive; there is no upper bound.
    pub fn new(page: u32, size: u32) -> Result<Self, ValidationFailure> {
        if size == 0 {
            return Err(ValidationFailure::single("size", "must be greater than 0"));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Sort direction for ordered scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse; anything other than `ASC` sorts descending
    pub fn parse_or_default(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

impl From<SortDirection> for sea_query::Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => sea_query::Order::Asc,
            SortDirection::Desc => sea_query::Order::Desc,
        }
    }
}

/// One slice of a larger ordered result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(request.size())),
        }
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.page) + 1 >= self.total_pages
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
