//! Per-repository settings persisted by `setup`.

use serde::{Deserialize, Serialize};

use super::Host;

/// Contents of `<state-dir>/<name>/settings.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSettings {
    pub host: Host,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl RepoSettings {
    pub fn is_local(&self) -> bool {
        self.host.is_local()
    }
}
