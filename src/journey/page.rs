//! Browser page access for journey contexts

use async_trait::async_trait;
use chromiumoxide::page::Page;

use crate::error::{PageSpeedError, PageSpeedResult};

/// Read access to the page currently shown in a journey context
#[async_trait]
pub trait PageAccessor: Send + Sync {
    /// Resolve the URL the page currently shows
    async fn current_url(&self) -> PageSpeedResult<String>;
}

/// `PageAccessor` over a chromiumoxide page
#[derive(Debug, Clone)]
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn into_inner(self) -> Page {
        self.page
    }
}

#[async_trait]
impl PageAccessor for ChromiumPage {
    async fn current_url(&self) -> PageSpeedResult<String> {
        // A page that has not navigated yet has no URL; storing a placeholder
        // would send a bogus address to the scoring service.
        self.page.url().await?.ok_or_else(|| {
            PageSpeedError::Browser("page has not navigated to a URL yet".to_string())
        })
    }
}
