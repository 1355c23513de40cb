//! BuildDispatcher trait definition.

use webtoys_types::error::DispatchError;
use webtoys_types::request::{BuildRequest, DispatchAck};

/// Sends a build request to the downstream app builder.
///
/// Implementations issue exactly one outbound call per invocation and never
/// retry. A 404 from the endpoint is `DispatchError::NotFound`; transport
/// failures are `DispatchError::Transport`.
///
/// Implementations live in webtoys-infra (e.g., `WebhookDispatcher`).
pub trait BuildDispatcher: Send + Sync {
    fn dispatch(
        &self,
        request: &BuildRequest,
    ) -> impl std::future::Future<Output = Result<DispatchAck, DispatchError>> + Send;
}
