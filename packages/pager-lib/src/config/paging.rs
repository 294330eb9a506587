use crate::{
    config::{Env, PagerConfigResult},
    defaults,
};
use serde::Deserialize;

/// Page size limits applied to every connection request.
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct PagingConfig {
    /// Page size used when neither `first` nor `last` is supplied.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Largest `first`/`last` a caller may request. `None` disables the check.
    #[serde(default = "max_page_size")]
    pub max_page_size: Option<u64>,
}

fn default_page_size() -> u64 {
    defaults::DEFAULT_PAGE_SIZE
}

fn max_page_size() -> Option<u64> {
    Some(defaults::MAX_PAGE_SIZE)
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

impl Env for PagingConfig {
    fn inject_opt_env_vars(&mut self) -> PagerConfigResult<()> {
        Ok(())
    }
}
