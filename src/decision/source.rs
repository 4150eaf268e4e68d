use async_trait::async_trait;

use crate::decision::error::DecisionError;
use crate::models::decision::{Decision, DecisionOrigin, DecisionRequest};

/// Anything that can turn an indicator snapshot into a [`Decision`].
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// The origin stamped on every decision this source produces.
    fn origin(&self) -> DecisionOrigin;

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError>;
}
