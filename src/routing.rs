use std::fmt;

use crate::error::CaseError;
use crate::secrets::Secrets;

/// CXM region a case belongs to, taken from its reference.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Region {
    West,
    North,
}

impl Region {
    /// Matches anywhere in the reference, ignoring case. West wins when both
    /// markers appear.
    pub fn from_case_reference(case_reference: &str) -> Option<Region> {
        let reference = case_reference.to_lowercase();
        if reference.contains("ema") {
            Some(Region::West)
        } else if reference.contains("emn") {
            Some(Region::North)
        } else {
            None
        }
    }

    /// Strict variant used for bucket selection: the reference must start
    /// with `EMA` or `EMN`.
    pub fn from_case_prefix(case_reference: &str) -> Option<Region> {
        let prefix = case_reference.get(..3)?.to_uppercase();
        match prefix.as_str() {
            "EMA" => Some(Region::West),
            "EMN" => Some(Region::North),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where and how to call the CXM API for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub region: Region,
    pub endpoint: String,
    pub api_key: String,
    pub api_path_segment: String,
}

pub fn resolve(case_reference: &str, live: bool, secrets: &Secrets) -> Result<Route, CaseError> {
    let region = Region::from_case_reference(case_reference)
        .ok_or_else(|| CaseError::routing(case_reference, "no CXM region matches"))?;

    let (endpoint, api_key, api_path_segment) = match (region, live) {
        (Region::West, true) => (
            &secrets.cxm_end_point_live,
            &secrets.cxm_api_key_live,
            &secrets.cxm_api_name_west,
        ),
        (Region::West, false) => (
            &secrets.cxm_end_point_test,
            &secrets.cxm_api_key_test,
            &secrets.cxm_api_name_west,
        ),
        (Region::North, true) => (
            &secrets.cxm_end_point_live_north,
            &secrets.cxm_api_key_live_north,
            &secrets.cxm_api_name_north,
        ),
        (Region::North, false) => (
            &secrets.cxm_end_point_test_north,
            &secrets.cxm_api_key_test_north,
            &secrets.cxm_api_name_north,
        ),
    };

    if endpoint.is_empty() || api_path_segment.is_empty() {
        return Err(CaseError::routing(
            case_reference,
            "CXM endpoint not configured for region",
        ));
    }

    Ok(Route {
        region,
        endpoint: endpoint.clone(),
        api_key: api_key.clone(),
        api_path_segment: api_path_segment.clone(),
    })
}
