use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_sfn::Client as SfnClient;

use crate::config::Config;
use crate::cxm::{CaseSource, CxmClient};
use crate::reporter::{OutcomeReporter, StepFunctionsReporter};
use crate::secrets::{SecretSource, SecretsManagerSource};
use crate::storage::{RecordSink, S3Sink};

/// A type used to hold the AWS clients required to interact with AWS services
/// used by the lambda function.
#[derive(Clone)]
pub struct AwsClients {
    pub s3: S3Client,
    pub secrets_manager: SecretsManagerClient,
    pub sfn: SfnClient,
}

impl AwsClients {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        AwsClients {
            s3: S3Client::new(sdk_config),
            secrets_manager: SecretsManagerClient::new(sdk_config),
            sfn: SfnClient::new(sdk_config),
        }
    }
}

/// External services one invocation talks to, behind traits so the handler
/// can run against fakes.
#[derive(Clone)]
pub struct Collaborators {
    pub secrets: Arc<dyn SecretSource>,
    pub cases: Arc<dyn CaseSource>,
    pub records: Arc<dyn RecordSink>,
    pub reporter: Arc<dyn OutcomeReporter>,
}

impl Collaborators {
    pub fn from_aws(clients: &AwsClients, config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Collaborators {
            secrets: Arc::new(SecretsManagerSource::new(
                clients.secrets_manager.clone(),
                config.secret_name.clone(),
                config.secret_version_stage.clone(),
            )),
            cases: Arc::new(CxmClient::new(config.cxm_timeout)?),
            records: Arc::new(S3Sink::new(clients.s3.clone())),
            reporter: Arc::new(StepFunctionsReporter::new(clients.sfn.clone())),
        })
    }
}
