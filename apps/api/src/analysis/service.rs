use tracing::info;

use super::AnalysisRequest;
use crate::llm_client::CompletionGateway;
use crate::recovery::{recover_completion, RecoveredResult};

/// Runs one analysis request end to end. Never fails: a failed or
/// unsalvageable completion yields the request's fallback.
pub async fn analyze<R: AnalysisRequest>(
    gateway: &dyn CompletionGateway,
    request: &R,
) -> RecoveredResult {
    let operation = R::OPERATION;
    let contract = request.contract();

    if let Some(reason) = request.skip_reason() {
        info!("{}: {reason}, answering from fallback", operation.name());
        return contract.fallback_result(reason);
    }

    let prompt = request.compose();
    let completion = gateway
        .complete(&prompt.system, &prompt.messages, &prompt.options)
        .await;

    let result = recover_completion(completion, &contract);
    info!("{}: {}", operation.name(), result.provenance);
    result
}
