//! Remote operation seam.
//!
//! The core never owns transport. Screens hand the dispatcher something that
//! implements [`RemoteOperation`]; the implementation wraps the app's actual
//! fetch primitive and normalizes its outcome at the boundary.

use async_trait::async_trait;
use trellis_core::{OperationEnvelope, RawFailure};

/// A remote call the dispatcher can execute.
///
/// `confirm` is the phase-two flag: implementations must re-issue the
/// identical call with `args.confirm = true` when it is set (see
/// [`trellis_core::OperationRequest::confirmed`]).
///
/// The two failure channels are distinct on purpose: a server that answered
/// returns `Ok` with a failure envelope; a transport that never produced an
/// HTTP status returns `Err(RawFailure)` for the dispatcher to classify.
#[async_trait]
pub trait RemoteOperation: Send + Sync {
    /// Success payload type.
    type Output: Send;

    /// Execute the call once. Never retried by the dispatcher.
    async fn call(&self, confirm: bool) -> Result<OperationEnvelope<Self::Output>, RawFailure>;
}
