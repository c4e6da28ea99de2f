use crate::{
    gateway::{PaystackStatusResponse, PaystackTransactionStatus},
    verify::{ProviderStatus, VerificationResult},
};

impl From<PaystackTransactionStatus> for ProviderStatus {
    fn from(value: PaystackTransactionStatus) -> Self {
        match value {
            PaystackTransactionStatus::Success => Self::Success,
            PaystackTransactionStatus::Failed | PaystackTransactionStatus::Reversed => Self::Failed,
            PaystackTransactionStatus::Abandoned => Self::Abandoned,
            PaystackTransactionStatus::Pending
            | PaystackTransactionStatus::Ongoing
            | PaystackTransactionStatus::Processing
            | PaystackTransactionStatus::Queued => Self::Pending,
            PaystackTransactionStatus::Unknown => Self::Unknown,
        }
    }
}

impl From<&PaystackStatusResponse> for VerificationResult {
    fn from(value: &PaystackStatusResponse) -> Self {
        VerificationResult::new(value.data.status.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{gateway::PaystackTransactionStatus as Upstream, verify::ProviderStatus};

    #[test]
    fn status_mapping() {
        let cases = [
            (Upstream::Success, ProviderStatus::Success),
            (Upstream::Failed, ProviderStatus::Failed),
            (Upstream::Reversed, ProviderStatus::Failed),
            (Upstream::Abandoned, ProviderStatus::Abandoned),
            (Upstream::Ongoing, ProviderStatus::Pending),
            (Upstream::Queued, ProviderStatus::Pending),
            (Upstream::Unknown, ProviderStatus::Unknown),
        ];
        for (upstream, expected) in cases {
            assert_eq!(ProviderStatus::from(upstream), expected, "{upstream:?}");
        }
    }
}
