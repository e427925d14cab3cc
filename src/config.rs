use clap::Parser;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Limits and strictness for every list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Report malformed filter blobs and refused keys as validation errors
    /// instead of ignoring them.
    pub strict_filters: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            strict_filters: false,
        }
    }
}

/// Server configuration, from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "attendance-api", version, about = "HR attendance API server")]
pub struct AppConfig {
    /// Database connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite::memory:")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Page size used when a request does not give one
    #[arg(long, env = "DEFAULT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub default_page_size: u64,

    /// Largest page size a request may ask for
    #[arg(long, env = "MAX_PAGE_SIZE", default_value_t = MAX_PAGE_SIZE)]
    pub max_page_size: u64,

    /// Reject malformed or unknown filter input with 400 instead of ignoring it
    #[arg(long, env = "STRICT_FILTERS")]
    pub strict_filters: bool,
}

impl AppConfig {
    #[must_use]
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            default_page_size: self.default_page_size.max(1),
            max_page_size: self.max_page_size.max(1),
            strict_filters: self.strict_filters,
        }
    }
}
