use std::env;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::string::String;
use std::time::Duration;

pub const DEFAULT_SECRET_NAME: &str = "nbcGlobal";
pub const DEFAULT_SECRET_VERSION_STAGE: &str = "AWSCURRENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub instance: Instance,
    pub secret_name: String,
    pub secret_version_stage: String,
    pub cxm_timeout: Duration,
    pub buckets: Buckets,
}

/// Deployment flavour of the function. Decides which CXM endpoint and which
/// reporting bucket are used, independently of anything in the event.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Instance {
    Live,
    Test,
}

impl Instance {
    pub fn is_live(&self) -> bool {
        *self == Instance::Live
    }
}

impl FromStr for Instance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Instance::Live),
            "test" => Ok(Instance::Test),
            other => Err(format!("Instance not Live or Test : {}", other)),
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Destination buckets, one per region and instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub west_live: String,
    pub west_test: String,
    pub north_live: String,
    pub north_test: String,
}

impl Default for Buckets {
    fn default() -> Self {
        Buckets {
            west_live: "nbc-reporting".to_string(),
            west_test: "nbc-reporting-test".to_string(),
            north_live: "nnc-reporting".to_string(),
            north_test: "nnc-reporting-test".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_env() -> Result<Config, String> {
        let defaults = Buckets::default();
        let conf = Config {
            instance: env::var("INSTANCE")
                .map_err(|e| format!("INSTANCE not set - {}", e))
                .and_then(|s| s.parse::<Instance>())?,
            secret_name: env::var("SECRET_NAME").unwrap_or(DEFAULT_SECRET_NAME.to_string()),
            secret_version_stage: env::var("SECRET_VERSION_STAGE")
                .unwrap_or(DEFAULT_SECRET_VERSION_STAGE.to_string()),
            cxm_timeout: env::var("CXM_TIMEOUT_SECS")
                .unwrap_or("30".to_string())
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e: ParseIntError| {
                    format!("Error parsing CXM_TIMEOUT_SECS to u64 - {}", e)
                })?,
            buckets: Buckets {
                west_live: env::var("BUCKET_WEST_LIVE").unwrap_or(defaults.west_live),
                west_test: env::var("BUCKET_WEST_TEST").unwrap_or(defaults.west_test),
                north_live: env::var("BUCKET_NORTH_LIVE").unwrap_or(defaults.north_live),
                north_test: env::var("BUCKET_NORTH_TEST").unwrap_or(defaults.north_test),
            },
        };

        Ok(conf)
    }
}
