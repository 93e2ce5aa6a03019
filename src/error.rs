use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while wiring the gesture to a page.
///
/// Ignored touch input is not an error; see [`crate::state::IgnoreReason`].
#[derive(Debug, Error)]
pub enum PullToRefreshError {
    #[error("no element with id {id} found")]
    ElementNotFound { id: String },
    #[error("element with id {id} is not an html element")]
    NotAnHtmlElement { id: String },
    #[error("no global `window` exists")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("malformed options json: {0}")]
    OptionsJson(#[from] serde_json::Error),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for PullToRefreshError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        PullToRefreshError::Js(msg)
    }
}

pub type Result<T, E = PullToRefreshError> = std::result::Result<T, E>;
