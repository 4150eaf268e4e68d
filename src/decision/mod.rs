//! Decision sources: remote decision service, local rule engine, and the
//! fallback chain that combines them.

pub mod chain;
pub mod error;
pub mod remote;
pub mod rules;
pub mod source;

pub use chain::FallbackDecisionChain;
pub use error::DecisionError;
pub use remote::{RemoteDecisionSource, DEFAULT_DECISION_TIMEOUT};
pub use rules::RuleDecisionSource;
pub use source::DecisionSource;
