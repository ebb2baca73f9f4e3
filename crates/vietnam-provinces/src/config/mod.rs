use crate::{
    error::ProvincesError,
    search::{DistrictResolution, SearchConfig},
};

/// Builder for search configurations
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder: unlimited results, first-match district resolution
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Every match, and every district tied for the best score
    pub fn exhaustive() -> Self {
        let mut builder = Self::new();
        builder.config.limit = None;
        builder.config.district_resolution = DistrictResolution::AllBestMatches;
        builder
    }

    /// Only the `n` best matches of ranked searches
    pub fn top(n: usize) -> Self {
        Self::new().limit(n)
    }

    /// Set the maximum number of results of ranked searches
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = Some(limit);
        self
    }

    /// Remove any result limit
    pub fn unlimited(mut self) -> Self {
        self.config.limit = None;
        self
    }

    /// Choose how a legacy district given by name is resolved
    pub fn district_resolution(mut self, resolution: DistrictResolution) -> Self {
        self.config.district_resolution = resolution;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }

    /// Build, rejecting a zero limit
    pub fn try_build(self) -> Result<SearchConfig, ProvincesError> {
        if self.config.limit == Some(0) {
            return Err(ProvincesError::ConfigError(
                "Result limit must be at least 1".to_string(),
            ));
        }
        Ok(self.config)
    }
}
