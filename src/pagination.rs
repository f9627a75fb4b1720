//! This modules defines the common functionality for paging through lists of data.

use serde::Deserialize;

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The number of items to return when a request does not specify a limit.
    pub default_limit: u64,
    /// The largest limit a request may ask for. Larger limits are reduced to this.
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// The query parameters for requesting one page of a list.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageQuery {
    /// The number of items to skip. Defaults to zero.
    pub offset: Option<u64>,
    /// The maximum number of items to return.
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Fill in missing values from `config` and cap the limit.
    ///
    /// # Returns
    /// The offset and limit, in that order.
    pub fn resolve(self, config: &PaginationConfig) -> (u64, u64) {
        let offset = self.offset.unwrap_or(0);
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .min(config.max_limit);

        (offset, limit)
    }
}
