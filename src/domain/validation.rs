use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhraseType { phrases: Vec<serde_json::Value> },
    InvalidRegionCode { geo_id: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhraseType { phrases } => {
                let rendered = phrases
                    .iter()
                    .map(serde_json::Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "all phrases must be strings; invalid phrases: [{rendered}]")
            }
            Self::InvalidRegionCode { geo_id } => write!(f, "invalid region code: {geo_id}"),
        }
    }
}

impl std::error::Error for ValidationError {}
