use aws_config::BehaviorVersion;
use cxm_case_to_s3::clients::{AwsClients, Collaborators};
use cxm_case_to_s3::config;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    cxm_case_to_s3::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let aws_config = aws_config::load_defaults(BehaviorVersion::v2023_11_09()).await;
    let clients = AwsClients::new(&aws_config);
    let config = config::Config::load_from_env()?;
    info!("running as {} instance", config.instance);

    let collaborators = Collaborators::from_aws(&clients, &config)?;

    run(service_fn(|request: LambdaEvent<Value>| {
        cxm_case_to_s3::handler(&collaborators, &config, request)
    }))
    .await
}
