//! Crawl frontier: the FIFO work queue plus the set of every URL ever admitted
//!
//! A URL is marked the moment it is queued, not when it is fetched, so a
//! page that links back to something still waiting in the queue never
//! re-enqueues it. The enqueued set only grows for the lifetime of a run.
//!
//! The frontier does not know about the page budget; the engine checks the
//! budget against `enqueued_count()` before admitting.

use std::collections::{HashSet, VecDeque};

/// Pending work plus the deduplication set for one crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, oldest first
    pending: VecDeque<String>,

    /// Every URL ever admitted
    enqueued: HashSet<String>,

    /// Admission order of `enqueued`, kept for reporting
    admitted: Vec<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a URL if it has never been seen before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now pending
    /// * `false` - The URL was already admitted earlier in this run
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.enqueued.contains(&url) {
            tracing::trace!("Already enqueued: {}", url);
            return false;
        }

        self.enqueued.insert(url.clone());
        self.admitted.push(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Removes and returns the earliest-admitted pending URL
    pub fn dequeue(&mut self) -> Option<String> {
        let next = self.pending.pop_front();
        if let Some(url) = &next {
            tracing::debug!("Dequeued {} ({} still pending)", url, self.pending.len());
        }
        next
    }

    /// Returns the number of URLs waiting to be fetched
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of distinct URLs ever admitted
    pub fn enqueued_count(&self) -> usize {
        self.enqueued.len()
    }

    /// Alias for `pending_count`
    pub fn size(&self) -> usize {
        self.pending_count()
    }

    /// Returns whether no URLs are waiting
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns whether the URL was ever admitted
    pub fn contains(&self, url: &str) -> bool {
        self.enqueued.contains(url)
    }

    /// Iterates over pending URLs in the order they will be dequeued
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    /// Every admitted URL in admission order
    pub fn admitted(&self) -> &[String] {
        &self.admitted
    }
}
