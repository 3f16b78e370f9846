//! AWS client construction from one shared SDK configuration.

use aws_config::{Region, SdkConfig};

use crate::queue::SqsScanQueue;
use crate::store::SecretsManagerStore;

/// The AWS-backed collaborators this module talks to.
pub struct AwsClients {
    pub secrets: SecretsManagerStore,
    pub queue: SqsScanQueue,
}

impl AwsClients {
    /// Loads the ambient AWS configuration (env vars, instance profile,
    /// etc.), optionally overriding the region, and builds both clients
    /// from it.
    pub async fn load(region: Option<String>) -> Self {
        let base = aws_config::load_from_env().await;
        let config = match region {
            Some(region) => base.into_builder().region(Region::new(region)).build(),
            None => base,
        };
        Self::new(&config)
    }

    pub fn new(config: &SdkConfig) -> Self {
        Self {
            secrets: SecretsManagerStore::new(config),
            queue: SqsScanQueue::new(config),
        }
    }
}
