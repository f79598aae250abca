// Domain stream table (`stream_domain`)

use tracing::debug;

use crate::client::IkuaiClient;
use crate::error::Error;
use crate::models::{BYPASS_COMMENT, StreamDomainEntry};

const FUNC_NAME: &str = "stream_domain";

impl IkuaiClient {
    /// Add one domain-based routing rule.
    pub async fn add_stream_domain(&self, entry: &StreamDomainEntry) -> Result<(), Error> {
        debug!(interface = %entry.interface, "adding domain stream rule");
        self.add(FUNC_NAME, entry).await
    }

    /// Remove every domain stream rule created by this tool.
    pub async fn delete_bypass_stream_domains(&self) -> Result<usize, Error> {
        self.delete_by_comment(FUNC_NAME, BYPASS_COMMENT).await
    }
}
