// IP group table (`ipgroup`)
//
// Large lists are stored as several groups named `<name>_<index>`, so
// resolving a group by name returns every chunk group that belongs to it.

use tracing::debug;

use crate::client::IkuaiClient;
use crate::error::Error;
use crate::models::{BYPASS_COMMENT, IpGroupEntry};

const FUNC_NAME: &str = "ipgroup";

impl IkuaiClient {
    /// Add one IP group.
    pub async fn add_ip_group(&self, entry: &IpGroupEntry) -> Result<(), Error> {
        debug!(group = %entry.group_name, "adding ip group");
        self.add(FUNC_NAME, entry).await
    }

    /// Remove every IP group created by this tool.
    pub async fn delete_bypass_ip_groups(&self) -> Result<usize, Error> {
        self.delete_by_comment(FUNC_NAME, BYPASS_COMMENT).await
    }

    /// Names of the bypass-managed groups that make up `name`.
    ///
    /// Matches `name` itself and its chunk groups `name_0`, `name_1`, ...
    /// in the order the router lists them.
    pub async fn bypass_ip_group_names(&self, name: &str) -> Result<Vec<String>, Error> {
        let rows = self.show(FUNC_NAME, "group_name", name, 0).await?;
        let names: Vec<String> = rows
            .into_iter()
            .filter(|row| row.comment == BYPASS_COMMENT)
            .filter_map(|row| row.group_name)
            .filter(|group| belongs_to(name, group))
            .collect();
        debug!(name, groups = names.len(), "resolved ip group");
        Ok(names)
    }
}

/// `group` is `name` or one of its `name_<digits>` chunks.
fn belongs_to(name: &str, group: &str) -> bool {
    if group == name {
        return true;
    }
    group
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}
