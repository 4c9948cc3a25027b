use std::fmt;

/// Submission response body: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Structured(serde_json::Value),
    Raw(String),
}

impl ResponseBody {
    /// Never fails: anything that is not valid JSON (including an empty body)
    /// becomes lossy UTF-8 text.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(value) => ResponseBody::Structured(value),
            Err(_) => ResponseBody::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResponseBody::Structured(value) => value.clone(),
            ResponseBody::Raw(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Structured(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => f.write_str(&pretty),
                Err(_) => write!(f, "{}", value),
            },
            ResponseBody::Raw(text) => f.write_str(text),
        }
    }
}
