use crate::crawler::FetchError;

/// What happened to one frontier entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page body was fetched and scanned for links
    Crawled {
        /// URL the body was actually served from
        final_url: String,
        /// Redirect hops followed to get there
        redirects: u32,
        /// Links found in the body, duplicates included
        links_found: usize,
        /// Links newly admitted to the frontier
        links_added: usize,
    },

    /// Fetch failed; the run carried on
    Failed(FetchError),
}

impl PageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Crawled { .. })
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Crawled { .. } => None,
        }
    }
}

/// Outcome of one processed frontier entry, tagged with the URL it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub url: String,
    pub outcome: PageOutcome,
}
