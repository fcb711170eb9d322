use async_trait::async_trait;
use aws_sdk_sfn::Client as SfnClient;
use serde_json::json;
use tracing::{error, info};

/// SendTaskFailure rejects error names longer than this.
const MAX_ERROR_LEN: usize = 256;

/// Output handed back to the state machine when the record was stored.
pub fn success_output() -> String {
    json!({"Result": "Success", "Message": "Completed"}).to_string()
}

/// Callback into the orchestrating workflow. Reporting is best effort:
/// implementations log their own failures and never return them.
#[async_trait]
pub trait OutcomeReporter: Send + Sync {
    async fn report_success(&self, task_token: &str);
    async fn report_failure(&self, task_token: &str, cause: &str, error: &str);
}

pub struct StepFunctionsReporter {
    client: SfnClient,
}

impl StepFunctionsReporter {
    pub fn new(client: SfnClient) -> Self {
        StepFunctionsReporter { client }
    }
}

#[async_trait]
impl OutcomeReporter for StepFunctionsReporter {
    async fn report_success(&self, task_token: &str) {
        let result = self
            .client
            .send_task_success()
            .task_token(task_token)
            .output(success_output())
            .send()
            .await;

        match result {
            Ok(_) => info!("reported task success"),
            Err(e) => error!("SendTaskSuccess failed: {}", e.into_service_error()),
        }
    }

    async fn report_failure(&self, task_token: &str, cause: &str, error: &str) {
        let result = self
            .client
            .send_task_failure()
            .task_token(task_token)
            .cause(cause)
            .error(truncate(error, MAX_ERROR_LEN))
            .send()
            .await;

        match result {
            Ok(_) => info!("reported task failure: {}", cause),
            Err(e) => error!("SendTaskFailure failed: {}", e.into_service_error()),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
