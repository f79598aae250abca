// IP/port stream table (`stream_ipport`)

use tracing::debug;

use crate::client::IkuaiClient;
use crate::error::Error;
use crate::models::{BYPASS_COMMENT, StreamIpPortEntry};

const FUNC_NAME: &str = "stream_ipport";

impl IkuaiClient {
    /// Add one IP/port routing rule.
    ///
    /// `dst_addr` must name IP groups that already exist on the router.
    pub async fn add_stream_ipport(&self, entry: &StreamIpPortEntry) -> Result<(), Error> {
        debug!(interface = %entry.interface, dst = %entry.dst_addr, "adding ip/port stream rule");
        self.add(FUNC_NAME, entry).await
    }

    /// Remove every IP/port stream rule created by this tool.
    pub async fn delete_bypass_stream_ipports(&self) -> Result<usize, Error> {
        self.delete_by_comment(FUNC_NAME, BYPASS_COMMENT).await
    }
}
