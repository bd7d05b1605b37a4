//! Driving port for recording donations.

use async_trait::async_trait;

use crate::domain::{DonationOutcome, DonationSubmission, Error};

/// Records a donation and maintains the category and donor aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationCommand: Send + Sync {
    /// Record `submission`.
    ///
    /// The category total and the donor record are written in two separate
    /// store calls. A failure in the second leaves the first in place.
    async fn record(&self, submission: DonationSubmission) -> Result<DonationOutcome, Error>;
}
