use celestial_region::RegionError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}")]
    Status { service: String, status: u16 },

    #[error("Unexpected response from {service}: {message}")]
    UnexpectedResponse { service: String, message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Table error in {table}: {message}")]
    Table { table: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Region error: {source}")]
    Region {
        #[from]
        source: RegionError,
    },
}

impl ServiceError {
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn status(service: impl Into<String>, status: u16) -> Self {
        Self::Status {
            service: service.into(),
            status,
        }
    }

    pub fn unexpected_response(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn table(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Table {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for client-side timeouts, which batch callers record and skip.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http { source } if source.is_timeout())
    }
}
