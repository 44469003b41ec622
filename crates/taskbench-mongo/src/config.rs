pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "testDB";

pub const ENV_URI: &str = "MONGODB_URI";
pub const ENV_DATABASE: &str = "MONGODB_DATABASE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URI, DEFAULT_DATABASE)
    }
}
