//! Page / page-size convention of the REST layer, mapped onto LIMIT/OFFSET.
//!
//! Pages are 0-based for callers and 1-based for the store query.

use crate::{config::PaginationConfig, query::SparqlQueryBuilder};

#[derive(Debug, Clone, Default)]
pub struct Pagination {
    page: Option<i64>,
    page_size: Option<i64>,
    config: PaginationConfig,
}

impl Pagination {
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            page: None,
            page_size: None,
            config,
        }
    }

    /// Requested page; a negative value falls back to the configured
    /// default page.
    pub fn set_page(&mut self, page: i64) -> &mut Self {
        self.page = Some(if page < 0 {
            i64::from(self.config.default_page)
        } else {
            page
        });
        self
    }

    /// Requested page size, kept as given. Negative sizes are resolved by
    /// [`Pagination::effective_page_size`].
    pub fn set_page_size(&mut self, page_size: i64) -> &mut Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn page(&self) -> Option<i64> {
        self.page
    }

    pub fn page_size(&self) -> Option<i64> {
        self.page_size
    }

    fn page_size_is_negative(&self) -> bool {
        self.page_size.is_some_and(|size| size < 0)
    }

    /// 0 when no page was requested or the page size is negative.
    pub fn effective_page(&self) -> u64 {
        match self.page {
            Some(page) if !self.page_size_is_negative() => u64::try_from(page).unwrap_or(0),
            _ => 0,
        }
    }

    /// 1-based page for the store query: 1 when no page was requested or
    /// the page size is negative, page + 1 otherwise.
    pub fn effective_page_for_store_query(&self) -> u64 {
        match self.page {
            Some(page) if !self.page_size_is_negative() => {
                u64::try_from(page).unwrap_or(0).saturating_add(1)
            }
            _ => 1,
        }
    }

    /// Configured default page size when unset or negative.
    pub fn effective_page_size(&self) -> u64 {
        match self.page_size {
            Some(size) if size >= 0 => size.unsigned_abs(),
            _ => u64::from(self.config.default_page_size),
        }
    }

    /// Ceiling for fetches that want every result in one page.
    pub fn max_page_size(&self) -> u64 {
        u64::from(self.config.max_page_size)
    }

    pub fn offset(&self) -> u64 {
        (self.effective_page_for_store_query() - 1).saturating_mul(self.effective_page_size())
    }

    /// LIMIT/OFFSET for the current page.
    pub fn apply_to<'q>(&self, query: &'q mut SparqlQueryBuilder) -> &'q mut SparqlQueryBuilder {
        query
            .add_limit(self.effective_page_size())
            .add_offset(self.offset())
    }

    /// LIMIT of the maximum page size, no offset.
    pub fn apply_max_page<'q>(
        &self,
        query: &'q mut SparqlQueryBuilder,
    ) -> &'q mut SparqlQueryBuilder {
        query.add_limit(self.max_page_size())
    }
}
