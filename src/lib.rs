use chrono::Utc;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::clients::Collaborators;
use crate::config::Config;
use crate::events::{Invocation, TransitionEvent};

pub mod clients;
pub mod config;
pub mod cxm;
pub mod error;
pub mod events;
pub mod process;
pub mod record;
pub mod reporter;
pub mod routing;
pub mod secrets;
pub mod storage;
pub mod transition;

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

// lambda handler
pub async fn handler(
    collaborators: &Collaborators,
    config: &Config,
    evt: LambdaEvent<Value>,
) -> Result<(), Error> {
    info!("Handling lambda invocation");
    debug!("Handling event payload: {:?}", evt.payload);

    let event = match TransitionEvent::from_value(&evt.payload) {
        Ok(event) => event,
        Err(e) => {
            // without a task token there is nobody to report to
            let Some(task_token) = events::task_token_of(&evt.payload) else {
                error!("{}", e);
                return Err(e.into());
            };
            error!("Lambda Parameter Error: {}", e);
            collaborators
                .reporter
                .report_failure(task_token, "Lambda Parameter Error", &e.to_string())
                .await;
            return Ok(());
        }
    };

    info!(
        "caseReference : {} transition : {}",
        event.case_reference, event.transition
    );
    let invocation = Invocation::new(event, config.instance.is_live(), Utc::now());

    match process::run(collaborators, config, &invocation).await {
        Ok(_) => {
            collaborators
                .reporter
                .report_success(invocation.task_token())
                .await;
        }
        Err(failure) => {
            error!("{} : {:?}", failure.cause, failure.error);
            collaborators
                .reporter
                .report_failure(
                    invocation.task_token(),
                    &failure.cause,
                    &failure.error.to_string(),
                )
                .await;
        }
    }

    Ok(())
}
