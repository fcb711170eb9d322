use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::CaseError;
use crate::events::Invocation;
use crate::transition::{Source, TransitionSpec, Variant};

pub const ACTION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Key under which CXM nests case fields, and the name stored records use
/// for it instead.
pub const VALUES_KEY: &str = "values";
pub const CASE_DETAILS_KEY: &str = "case_details";

/// Case as returned by the CXM API: the response text and its parsed form.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDetails {
    pub raw: String,
    pub value: Value,
}

impl CaseDetails {
    pub fn parse(raw: String) -> Result<CaseDetails, serde_json::Error> {
        let value = serde_json::from_str(&raw)?;
        Ok(CaseDetails { raw, value })
    }

    /// Follows `path` through nested objects. JSON `null` counts as absent;
    /// non-string scalars are rendered as their JSON text.
    pub fn lookup(&self, path: &[&str]) -> Option<String> {
        let found = path
            .iter()
            .try_fold(&self.value, |value, key| value.get(key))?;
        match found {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputRecord {
    Created(CaseDetails),
    Action(ActionRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub action: &'static str,
    pub action_date: String,
    pub case_reference: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Serialize for ActionRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3 + self.fields.len()))?;
        map.serialize_entry("action", self.action)?;
        map.serialize_entry("actionDate", &self.action_date)?;
        map.serialize_entry("caseReference", &self.case_reference)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl OutputRecord {
    /// Serialized record as written to S3, with the CXM `values` key renamed.
    pub fn to_body(&self) -> Result<String, CaseError> {
        let text = match self {
            OutputRecord::Created(case) => case.raw.clone(),
            OutputRecord::Action(record) => serde_json::to_string(record)?,
        };
        Ok(rename_values_key(&text))
    }
}

/// Plain text substitution over the serialized record. Matches inside string
/// values are replaced too; stored records have always been written this way.
pub fn rename_values_key(text: &str) -> String {
    text.replace(VALUES_KEY, CASE_DETAILS_KEY)
}

pub fn build(
    spec: &TransitionSpec,
    invocation: &Invocation,
    case: &CaseDetails,
) -> Result<OutputRecord, CaseError> {
    let action = match spec.variant {
        Variant::Created => return Ok(OutputRecord::Created(case.clone())),
        Variant::Undefined => {
            return Err(CaseError::UnrecognizedTransition(
                invocation.event.transition.clone(),
            ))
        }
        Variant::Action(action) => action,
    };

    let mut fields = Vec::with_capacity(spec.fields.len());
    for rule in spec.fields {
        let value = match rule.source {
            Source::Transitioner => invocation.event.transitioner.clone(),
            Source::FromStatus => invocation.event.from_status.clone(),
            Source::Payload { path, default } => case
                .lookup(path)
                .or_else(|| default.map(str::to_string)),
        };
        let value = value.ok_or(CaseError::FieldExtraction {
            field: rule.name,
            transition: spec.name,
        })?;
        fields.push((rule.name, value));
    }

    Ok(OutputRecord::Action(ActionRecord {
        action,
        action_date: invocation.now.format(ACTION_DATE_FORMAT).to_string(),
        case_reference: invocation.case_reference().to_string(),
        fields,
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::events::TransitionEvent;
    use crate::transition::{classify, TRANSITIONS};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::BTreeSet;

    fn invocation(transition: &str) -> Invocation {
        Invocation::new(
            TransitionEvent {
                case_reference: "EMA12345".to_string(),
                transition: transition.to_string(),
                transitioner: Some("u@x.com".to_string()),
                task_token: "token".to_string(),
                from_status: Some("awaiting-review".to_string()),
            },
            false,
            Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        )
    }

    fn full_case() -> CaseDetails {
        CaseDetails::parse(
            json!({
                "reference": "EMA12345",
                "values": {
                    "forward_email_to": "a@b.com",
                    "customer_has_updated": "Y",
                    "sovereign_council": "Wellingborough",
                    "sovereign_service_area": "Waste",
                    "service_area_4": "Highways"
                }
            })
            .to_string(),
        )
        .unwrap()
    }

    fn parsed(record: &OutputRecord) -> Value {
        serde_json::from_str(&record.to_body().unwrap()).unwrap()
    }

    #[test]
    fn test_forward_via_email() {
        let record = build(
            classify("forward-via-email"),
            &invocation("forward-via-email"),
            &CaseDetails::parse(r#"{"values":{"forward_email_to":"a@b.com"}}"#.to_string())
                .unwrap(),
        )
        .unwrap();

        assert_eq!(
            parsed(&record),
            json!({
                "action": "forward",
                "actionDate": "2024-03-09 14:05:07",
                "caseReference": "EMA12345",
                "userEmail": "u@x.com",
                "toEmail": "a@b.com"
            })
        );
    }

    #[test]
    fn test_action_records_have_exactly_declared_fields() {
        let case = full_case();
        for spec in TRANSITIONS {
            let Variant::Action(action) = spec.variant else {
                continue;
            };
            let record = build(spec, &invocation(spec.name), &case).unwrap();
            let value = parsed(&record);
            let object = value.as_object().unwrap();

            let mut expected: BTreeSet<&str> = ["action", "actionDate", "caseReference"].into();
            expected.extend(spec.fields.iter().map(|f| f.name));
            let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();

            assert_eq!(actual, expected, "{}", spec.name);
            assert_eq!(object["action"], action, "{}", spec.name);
        }
    }

    #[test]
    fn test_action_literal_does_not_depend_on_input() {
        let mut invocation = invocation("FORWARD-VIA-EMAIL");
        invocation.event.case_reference = "values".to_string();
        let record = build(classify("FORWARD-VIA-EMAIL"), &invocation, &full_case()).unwrap();
        assert_eq!(parsed(&record)["action"], "forward");
    }

    #[test]
    fn test_created_passes_payload_through() {
        let raw = r#"{"values": {"x": 1},   "odd spacing": true}"#.to_string();
        let case = CaseDetails::parse(raw.clone()).unwrap();
        let record = build(classify("created"), &invocation("created"), &case).unwrap();
        assert_eq!(record, OutputRecord::Created(case));
        assert_eq!(
            record.to_body().unwrap(),
            r#"{"case_details": {"x": 1},   "odd spacing": true}"#
        );
    }

    #[test]
    fn test_close_case_defaults_customer_updated() {
        let case = CaseDetails::parse(r#"{"values":{}}"#.to_string()).unwrap();
        let record = build(classify("close-case"), &invocation("close-case"), &case).unwrap();
        let value = parsed(&record);
        assert_eq!(value["customerUpdated"], "N");
        assert_eq!(value["fromStatus"], "awaiting-review");

        let case = CaseDetails::parse(r#"{"values":{"customer_has_updated":null}}"#.to_string())
            .unwrap();
        let record = build(classify("close-case"), &invocation("close-case"), &case).unwrap();
        assert_eq!(parsed(&record)["customerUpdated"], "N");
    }

    #[test]
    fn test_close_case_uses_payload_when_present() {
        let record = build(classify("close-case"), &invocation("close-case"), &full_case()).unwrap();
        assert_eq!(parsed(&record)["customerUpdated"], "Y");
    }

    #[test]
    fn test_missing_mandatory_payload_field() {
        let case = CaseDetails::parse(r#"{"values":{}}"#.to_string()).unwrap();
        let err = build(
            classify("forward-via-email"),
            &invocation("forward-via-email"),
            &case,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CaseError::FieldExtraction {
                field: "toEmail",
                transition: "forward-via-email"
            }
        );
    }

    #[test]
    fn test_missing_transitioner() {
        let mut invocation = invocation("awaiting-review");
        invocation.event.transitioner = None;
        let err = build(classify("awaiting-review"), &invocation, &full_case()).unwrap_err();
        assert!(matches!(
            err,
            CaseError::FieldExtraction {
                field: "userEmail",
                ..
            }
        ));

        // no userEmail declared, so no transitioner needed
        let record = build(classify("test-case-closed"), &invocation, &full_case()).unwrap();
        assert_eq!(parsed(&record)["action"], "test-case-closed");
    }

    #[test]
    fn test_undefined_transition_fails() {
        let err = build(
            classify("unknown-thing"),
            &invocation("unknown-thing"),
            &full_case(),
        )
        .unwrap_err();
        assert_eq!(err, CaseError::UnrecognizedTransition("unknown-thing".to_string()));
        assert_eq!(err.to_string(), "unknown-thing");
    }

    #[test]
    fn test_non_string_payload_values() {
        let case =
            CaseDetails::parse(r#"{"values":{"service_area_4": 42}}"#.to_string()).unwrap();
        let record = build(
            classify("change-service-area"),
            &invocation("change-service-area"),
            &case,
        )
        .unwrap();
        assert_eq!(parsed(&record)["toService"], "42");
    }

    #[test]
    fn test_rename_applies_to_string_data_once() {
        let case = CaseDetails::parse(
            r#"{"values":{"forward_email_to":"values@example.com"}}"#.to_string(),
        )
        .unwrap();
        let record = build(
            classify("forward-via-email"),
            &invocation("forward-via-email"),
            &case,
        )
        .unwrap();
        let body = record.to_body().unwrap();
        assert!(body.contains(r#""toEmail":"case_details@example.com""#), "{}", body);
        assert!(!body.contains("case_case_details"));
        assert_eq!(rename_values_key(&body), body);
    }

    #[test]
    fn test_action_record_field_order() {
        let record = build(classify("close-case"), &invocation("close-case"), &full_case()).unwrap();
        assert_eq!(
            record.to_body().unwrap(),
            r#"{"action":"close","actionDate":"2024-03-09 14:05:07","caseReference":"EMA12345","userEmail":"u@x.com","fromStatus":"awaiting-review","customerUpdated":"Y"}"#
        );
    }
}
