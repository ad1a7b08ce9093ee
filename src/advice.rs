//! Daily advice

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What the strategist has to say about a given day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    /// The strategic task of the day
    pub todo: String,
    /// What to be wary of
    pub caution: String,
    /// A line to keep the author going
    pub motivation: String,
}

impl Advice {
    /// Validate a JSON document produced by the advice service.
    ///
    /// All three fields are required and must be strings. Unknown fields are ignored.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| Error::MalformedAdviceResponse(err.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_advice() {
        let advice = Advice::from_json(r#"{"todo": "Write 2000 words", "caution": "Avoid rereading", "motivation": "Onwards", "mood": "calm"}"#).unwrap();
        assert_eq!(advice.todo, "Write 2000 words");
        assert_eq!(advice.caution, "Avoid rereading");
        assert_eq!(advice.motivation, "Onwards");
    }

    #[test]
    fn reject_incomplete_advice() {
        let invalid = [
            "",
            "{}",
            r#"{"todo": "Write", "motivation": "Onwards"}"#,
            r#"{"todo": "Write", "caution": null, "motivation": "Onwards"}"#,
            r#"{"todo": 1, "caution": "x", "motivation": "y"}"#,
        ];
        for text in &invalid {
            match Advice::from_json(text) {
                Err(Error::MalformedAdviceResponse(_)) => {},
                other => panic!("{:?} should be malformed, got {:?}", text, other),
            }
        }
    }
}
