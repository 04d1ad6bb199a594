use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shape error: {0}")]
    Shape(String),

    #[error("network error while {context}: {message}")]
    Network {
        context: &'static str,
        message: String,
    },

    #[error("decode error while {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("pipeline error: {0}")]
    Pipeline(String),
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn network(context: &'static str, message: impl ToString) -> Self {
        Self::Network {
            context,
            message: message.to_string(),
        }
    }

    pub fn decode(context: &'static str, source: std::io::Error) -> Self {
        Self::Decode { context, source }
    }

    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline(message.into())
    }
}
