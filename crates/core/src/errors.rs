use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no ticker symbol or company was provided")]
    SymbolNotProvided,
    #[error("no ticker symbol is known for company `{company}`")]
    UnknownCompany { company: String },
    #[error("no metric was provided")]
    MetricNotProvided,
    #[error("metric `{phrase}` is not supported")]
    UnknownMetric { phrase: String },
}

impl ResolutionError {
    pub fn is_unresolved_symbol(&self) -> bool {
        matches!(self, Self::SymbolNotProvided | Self::UnknownCompany { .. })
    }

    pub fn is_unresolved_metric(&self) -> bool {
        matches!(self, Self::MetricNotProvided | Self::UnknownMetric { .. })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteServiceError {
    #[error("quote service request failed: {0}")]
    Transport(String),
    #[error("quote service did not answer within {secs} seconds")]
    Timeout { secs: u64 },
    #[error("quote service returned status {status}")]
    Status { status: u16 },
    #[error("quote service response could not be decoded: {0}")]
    Decode(String),
    #[error("{0}")]
    Provider(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("no handler is registered for intent `{name}`")]
    UnknownIntent { name: String },
    #[error("request was addressed to application `{received}`")]
    InvalidApplication { received: String },
    #[error("malformed platform request: {0}")]
    MalformedRequest(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("forbidden: {message}")]
    Forbidden { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "The skill does not support this request.",
            Self::Forbidden { .. } => "The request was not addressed to this skill.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Forbidden { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl SkillError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let message = self.to_string();
        match self {
            Self::UnknownIntent { .. } | Self::MalformedRequest(_) => {
                InterfaceError::BadRequest { message, correlation_id }
            }
            Self::InvalidApplication { .. } => InterfaceError::Forbidden { message, correlation_id },
        }
    }
}
