// Custom ISP table (`custom_isp`)

use tracing::debug;

use crate::client::IkuaiClient;
use crate::error::Error;
use crate::models::{BYPASS_COMMENT, CustomIspEntry};

const FUNC_NAME: &str = "custom_isp";

impl IkuaiClient {
    /// Add one custom ISP address list.
    ///
    /// `POST /Action/call` `{func_name: "custom_isp", action: "add"}`
    pub async fn add_custom_isp(&self, entry: &CustomIspEntry) -> Result<(), Error> {
        debug!(name = %entry.name, "adding custom isp");
        self.add(FUNC_NAME, entry).await
    }

    /// Remove every custom ISP created by this tool.
    pub async fn delete_bypass_custom_isps(&self) -> Result<usize, Error> {
        self.delete_by_comment(FUNC_NAME, BYPASS_COMMENT).await
    }
}
