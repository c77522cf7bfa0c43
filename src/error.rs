use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum TrackError {
    String(String),
    Serde(serde_json::Error),
}

impl Error for TrackError {}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackError::String(err) => write!(f, "{err}"),
            TrackError::Serde(err) => write!(f, "{err}"),
        }
    }
}

impl From<String> for TrackError {
    fn from(err: String) -> Self {
        TrackError::String(err)
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Serde(err)
    }
}
