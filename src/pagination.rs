use std::collections::HashSet;

use crate::gateway::{ApiClient, GatewayError};
use crate::models::{MovieListing, MovieListingItem};
use crate::sorts::SortOption;

/// Flatten pages in fetch order, keeping the first occurrence of every id.
pub fn merge_pages(pages: &[MovieListing]) -> Vec<MovieListingItem> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .flat_map(|page| page.results.iter())
        .filter(|movie| seen.insert(movie.id))
        .cloned()
        .collect()
}

#[derive(Debug, Default, Clone)]
pub struct PageAccumulator {
    pages: Vec<MovieListing>,
    movies: Vec<MovieListingItem>,
    seen: HashSet<u64>,
}

impl PageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: MovieListing) {
        for movie in &page.results {
            if self.seen.insert(movie.id) {
                self.movies.push(movie.clone());
            }
        }
        self.pages.push(page);
    }

    pub fn movies(&self) -> &[MovieListingItem] {
        &self.movies
    }

    pub fn pages(&self) -> &[MovieListing] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.pages
            .last()
            .is_some_and(|last| last.page < last.total_pages)
    }

    pub fn next_page_param(&self) -> Option<u32> {
        self.pages
            .last()
            .filter(|_| self.has_next_page())
            .map(|last| last.page + 1)
    }

    pub fn reset(&mut self) {
        self.pages.clear();
        self.movies.clear();
        self.seen.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    Discover(SortOption),
    Search(String),
}

impl ListingSource {
    pub fn is_enabled(&self) -> bool {
        match self {
            ListingSource::Discover(_) => true,
            ListingSource::Search(query) => !query.trim().is_empty(),
        }
    }

    pub async fn fetch_page(
        &self,
        api: &ApiClient,
        page: u32,
    ) -> Result<Option<MovieListing>, GatewayError> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let listing = match self {
            ListingSource::Discover(sort_by) => api.get_movies(*sort_by, Some(page)).await?,
            ListingSource::Search(query) => api.search_movies(query, Some(page)).await?,
        };
        Ok(Some(listing))
    }
}

#[derive(Debug, Clone)]
pub struct MovieFeed {
    source: ListingSource,
    pages: PageAccumulator,
}

impl MovieFeed {
    pub fn new(source: ListingSource) -> Self {
        Self {
            source,
            pages: PageAccumulator::new(),
        }
    }

    pub fn source(&self) -> &ListingSource {
        &self.source
    }

    pub fn set_source(&mut self, source: ListingSource) {
        if source != self.source {
            self.source = source;
            self.pages.reset();
        }
    }

    pub fn movies(&self) -> &[MovieListingItem] {
        self.pages.movies()
    }

    pub fn has_next_page(&self) -> bool {
        self.source.is_enabled() && self.pages.has_next_page()
    }

    fn next_page(&self) -> Option<u32> {
        if self.pages.is_empty() {
            Some(1)
        } else {
            self.pages.next_page_param()
        }
    }

    /// Fetch and append the next page. Returns whether a page was added.
    pub async fn fetch_next_page(&mut self, api: &ApiClient) -> Result<bool, GatewayError> {
        let Some(next) = self.next_page() else {
            return Ok(false);
        };
        match self.source.fetch_page(api, next).await? {
            Some(listing) => {
                self.pages.push(listing);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
