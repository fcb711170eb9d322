use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CaseError;

/// Payload sent by the Step Functions task that invokes this function.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TransitionEvent {
    pub case_reference: String,
    pub transition: String,
    #[serde(default)]
    pub transitioner: Option<String>,
    pub task_token: String,
    #[serde(default)]
    pub from_status: Option<String>,
}

impl TransitionEvent {
    pub fn from_value(value: &Value) -> Result<TransitionEvent, CaseError> {
        TransitionEvent::deserialize(value).map_err(|e| CaseError::InvalidEvent(e.to_string()))
    }
}

/// Pulls the task token out of an event that failed to parse, so the
/// failure can still be reported back to the state machine.
pub fn task_token_of(value: &Value) -> Option<&str> {
    value
        .get("TaskToken")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
}

/// Everything one invocation needs to know about itself. Built once per
/// event and only ever borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub event: TransitionEvent,
    pub live: bool,
    pub now: DateTime<Utc>,
}

impl Invocation {
    pub fn new(event: TransitionEvent, live: bool, now: DateTime<Utc>) -> Self {
        Invocation { event, live, now }
    }

    pub fn case_reference(&self) -> &str {
        &self.event.case_reference
    }

    pub fn task_token(&self) -> &str {
        &self.event.task_token
    }
}
