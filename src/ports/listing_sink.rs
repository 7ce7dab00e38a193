use async_trait::async_trait;

use crate::domain::listing::Listing;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub submitted: usize,
    pub failed: usize,
}

/// A destination that accepts a batch of listings.
#[async_trait]
pub trait ListingSink: Send + Sync {
    async fn submit(&self, listings: &[Listing]) -> Result<SubmissionReport>;
}
