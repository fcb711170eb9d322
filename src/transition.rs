//! Declarative table of the CXM transitions this function knows how to record.
//!
//! Each entry names the record shape to build, where every extra field comes
//! from and the suffix appended to the case reference to form the S3 key.

/// Record shape selected by a transition.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Variant {
    /// The fetched case is stored as-is.
    Created,
    /// A constructed action record with a fixed `action` literal.
    Action(&'static str),
    /// Transition not in the table; building a record always fails.
    Undefined,
}

/// Where the value of an extra record field comes from.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Source {
    /// The event's `Transitioner`.
    Transitioner,
    /// The event's `FromStatus`.
    FromStatus,
    /// A nested field of the case payload, with an optional fallback.
    Payload {
        path: &'static [&'static str],
        default: Option<&'static str>,
    },
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub source: Source,
}

#[derive(PartialEq, Eq, Debug)]
pub struct TransitionSpec {
    pub name: &'static str,
    pub variant: Variant,
    pub key_suffix: &'static str,
    pub fields: &'static [FieldRule],
}

const USER_EMAIL: FieldRule = FieldRule {
    name: "userEmail",
    source: Source::Transitioner,
};

const FROM_STATUS: FieldRule = FieldRule {
    name: "fromStatus",
    source: Source::FromStatus,
};

const SOVEREIGN: FieldRule = FieldRule {
    name: "sovereign",
    source: Source::Payload {
        path: &["values", "sovereign_council"],
        default: None,
    },
};

const fn action(
    name: &'static str,
    action: &'static str,
    key_suffix: &'static str,
    fields: &'static [FieldRule],
) -> TransitionSpec {
    TransitionSpec {
        name,
        variant: Variant::Action(action),
        key_suffix,
        fields,
    }
}

pub static UNDEFINED: TransitionSpec = TransitionSpec {
    name: "undefined",
    variant: Variant::Undefined,
    key_suffix: "-UNDEFINED",
    fields: &[],
};

pub static TRANSITIONS: &[TransitionSpec] = &[
    TransitionSpec {
        name: "created",
        variant: Variant::Created,
        key_suffix: "-CREATED",
        fields: &[],
    },
    action("awaiting-review", "awaiting-review", "-AWAITING-REVIEW", &[USER_EMAIL]),
    action("awaiting-customer", "awaiting-customer", "-AWAITING-CUSTOMER", &[USER_EMAIL]),
    action(
        "close-case",
        "close",
        "-CLOSE",
        &[
            USER_EMAIL,
            FROM_STATUS,
            FieldRule {
                name: "customerUpdated",
                source: Source::Payload {
                    path: &["values", "customer_has_updated"],
                    default: Some("N"),
                },
            },
        ],
    ),
    action(
        "forward-via-email",
        "forward",
        "-FORWARD",
        &[
            USER_EMAIL,
            FieldRule {
                name: "toEmail",
                source: Source::Payload {
                    path: &["values", "forward_email_to"],
                    default: None,
                },
            },
        ],
    ),
    action(
        "close-case-without-responding",
        "close-without-responding",
        "-CLOSE-WITHOUT-RESPONDING",
        &[USER_EMAIL],
    ),
    action(
        "change-service-area",
        "change-service-area",
        "-CHANGE-SERVICE-AREA",
        &[
            USER_EMAIL,
            FieldRule {
                name: "toService",
                source: Source::Payload {
                    path: &["values", "service_area_4"],
                    default: None,
                },
            },
        ],
    ),
    action("being-reviewed", "being-reviewed", "-BEING-REVIEWED", &[USER_EMAIL]),
    action(
        "unitary-awaiting-review",
        "unitary-awaiting-review",
        "-UNITARY-AWAITING-REVIEW",
        &[USER_EMAIL, SOVEREIGN],
    ),
    action(
        "hub-awaiting-review",
        "hub-awaiting-review",
        "-HUB-AWAITING-REVIEW",
        &[USER_EMAIL],
    ),
    action(
        "hub-being-reviewed",
        "hub-being-reviewed",
        "-HUB-BEING-REVIEWED",
        &[USER_EMAIL],
    ),
    action("hub-to-review", "hub-to-review", "-HUB-TO-REVIEW", &[USER_EMAIL]),
    action(
        "unitary-being-reviewed",
        "unitary-being-reviewed",
        "-UNITARY-BEING-REVIEWED",
        &[USER_EMAIL, SOVEREIGN],
    ),
    action(
        "unitary-forward",
        "unitary-forward",
        "-UNITARY-FORWARD",
        &[
            USER_EMAIL,
            SOVEREIGN,
            FieldRule {
                name: "sovService",
                source: Source::Payload {
                    path: &["values", "sovereign_service_area"],
                    default: None,
                },
            },
        ],
    ),
    action(
        "awaiting-location-confirmation",
        "awaiting-location-confirmation",
        "-AWAITING-LOCATION-CONFIRMATION",
        &[],
    ),
    action("with-digital", "with-digital", "-WITH-DIGITAL", &[USER_EMAIL]),
    action("test-case-closed", "test-case-closed", "-TEST-CASE-CLOSED", &[]),
];

/// Looks up a transition by name, ignoring case and surrounding whitespace.
/// Names not in the table resolve to [UNDEFINED].
pub fn classify(transition: &str) -> &'static TransitionSpec {
    let wanted = transition.trim();
    TRANSITIONS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(wanted))
        .unwrap_or(&UNDEFINED)
}
