use std::path::Path;

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dns: crate::dns::config::Config,
    #[serde(default)]
    pub resolver: crate::service::resolver::Config,
}

impl Config {
    /// Reads the optional file, then the environment on top of it
    /// (`RESOLVER__CACHE_SIZE=100`).
    pub fn load(path: &Path) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(::config::Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
