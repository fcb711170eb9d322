use tracing::{debug, info};

use crate::clients::Collaborators;
use crate::config::Config;
use crate::error::Failure;
use crate::events::Invocation;
use crate::record;
use crate::routing;
use crate::storage::{self, StorageTarget};
use crate::transition;

/// Fetches the case, builds the record for the transition and stores it.
///
/// Each stage's error is tagged with the cause reported back to the state
/// machine. Nothing is written unless every earlier stage succeeded.
pub async fn run(
    collaborators: &Collaborators,
    config: &Config,
    invocation: &Invocation,
) -> Result<StorageTarget, Failure> {
    let case_reference = invocation.case_reference();

    let secrets = collaborators
        .secrets
        .fetch_secrets()
        .await
        .map_err(|e| Failure::new("GetSecrets", e))?;

    let route = routing::resolve(case_reference, invocation.live, &secrets)
        .map_err(|e| Failure::new(format!("Routing case {}", case_reference), e))?;
    debug!("{} routed to {} region", case_reference, route.region);

    let case = collaborators
        .cases
        .fetch_case(&route, case_reference)
        .await
        .map_err(|e| Failure::new(format!("Getting case details for {}", case_reference), e))?;
    info!("fetched case details for {}", case_reference);

    let spec = transition::classify(&invocation.event.transition);
    let building = || format!("Building record for {}", case_reference);
    let output = record::build(spec, invocation, &case).map_err(|e| Failure::new(building(), e))?;
    let body = output.to_body().map_err(|e| Failure::new(building(), e))?;

    let target = storage::target(
        case_reference,
        invocation.live,
        spec.key_suffix,
        &config.buckets,
    )
    .map_err(|e| Failure::new(format!("Routing case {}", case_reference), e))?;

    collaborators
        .records
        .put_record(&target, body)
        .await
        .map_err(|e| Failure::new(format!("Saving case details for {}", case_reference), e))?;
    info!("saved {} to s3://{}/{}", spec.name, target.bucket, target.key);

    Ok(target)
}
