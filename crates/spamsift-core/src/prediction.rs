//! Prediction result types shared between the inference layer and the
//! HTTP surface.
//!
//! `raw_class == 1 ⟺ label == SPAM` is unforgeable: the success variant
//! stores only a [`SpamClass`] and the `ok`, `label`, and `raw_class` wire
//! fields are emitted from the variant at serialization time, never set
//! independently. Parsing rejects bodies where the flags disagree.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Binary classification outcome. The integer encoding (ham=0, spam=1)
/// follows the training convention of the model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamClass {
    Ham,
    Spam,
}

impl SpamClass {
    /// Integer class as emitted on the wire.
    pub fn raw(self) -> u8 {
        match self {
            Self::Ham => 0,
            Self::Spam => 1,
        }
    }

    pub fn label(self) -> Label {
        match self {
            Self::Ham => Label::Ham,
            Self::Spam => Label::Spam,
        }
    }
}

/// Human-facing label string for a [`SpamClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "HAM")]
    Ham,
    #[serde(rename = "SPAM")]
    Spam,
}

impl Label {
    pub fn class(self) -> SpamClass {
        match self {
            Self::Ham => SpamClass::Ham,
            Self::Spam => SpamClass::Spam,
        }
    }
}

/// Result of one prediction, created fresh per request and never stored.
///
/// Serializes as a flat JSON object: success bodies carry `ok=true`,
/// `label`, `raw_class`, `spam_probability` (null when the model has no
/// probability support), and `latency_ms`; rejected bodies carry `ok=false`
/// and `error`.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Success {
        class: SpamClass,
        spam_probability: Option<f64>,
        latency_ms: f64,
    },
    Rejected {
        error: String,
    },
}

impl Prediction {
    pub fn success(class: SpamClass, spam_probability: Option<f64>, latency_ms: f64) -> Self {
        Self::Success {
            class,
            spam_probability,
            latency_ms,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self::Rejected {
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success {
                class,
                spam_probability,
                latency_ms,
            } => {
                let mut s = serializer.serialize_struct("Prediction", 5)?;
                s.serialize_field("ok", &true)?;
                s.serialize_field("label", &class.label())?;
                s.serialize_field("raw_class", &class.raw())?;
                s.serialize_field("spam_probability", spam_probability)?;
                s.serialize_field("latency_ms", latency_ms)?;
                s.end()
            }
            Self::Rejected { error } => {
                let mut s = serializer.serialize_struct("Prediction", 2)?;
                s.serialize_field("ok", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

/// Raw wire shape, before consistency checks.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePrediction {
    Success {
        ok: bool,
        label: Label,
        raw_class: u8,
        spam_probability: Option<f64>,
        latency_ms: f64,
    },
    Rejected {
        ok: bool,
        error: String,
    },
}

impl<'de> Deserialize<'de> for Prediction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WirePrediction::deserialize(deserializer)? {
            WirePrediction::Success {
                ok: true,
                label,
                raw_class,
                spam_probability,
                latency_ms,
            } => {
                let class = label.class();
                if raw_class != class.raw() {
                    return Err(D::Error::custom(format!(
                        "raw_class {raw_class} does not match label {label:?}"
                    )));
                }
                Ok(Prediction::Success {
                    class,
                    spam_probability,
                    latency_ms,
                })
            }
            WirePrediction::Rejected { ok: false, error } => Ok(Prediction::Rejected { error }),
            _ => Err(D::Error::custom("ok flag does not match response shape")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_label_raw_agree() {
        assert_eq!(SpamClass::Ham.raw(), 0);
        assert_eq!(SpamClass::Spam.raw(), 1);
        assert_eq!(SpamClass::Ham.label(), Label::Ham);
        assert_eq!(SpamClass::Spam.label(), Label::Spam);
        assert_eq!(Label::Ham.class(), SpamClass::Ham);
        assert_eq!(Label::Spam.class(), SpamClass::Spam);
    }

    #[test]
    fn is_ok_derives_from_variant() {
        assert!(Prediction::success(SpamClass::Ham, None, 0.1).is_ok());
        assert!(!Prediction::rejected("nope").is_ok());
    }

    #[test]
    fn success_wire_shape() {
        let p = Prediction::success(SpamClass::Spam, Some(0.93), 1.25);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["label"], "SPAM");
        assert_eq!(json["raw_class"], 1);
        assert_eq!(json["spam_probability"], 0.93);
        assert_eq!(json["latency_ms"], 1.25);
    }

    #[test]
    fn missing_probability_serializes_as_null() {
        let p = Prediction::success(SpamClass::Ham, None, 0.4);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json["spam_probability"].is_null());
        assert_eq!(json["label"], "HAM");
        assert_eq!(json["raw_class"], 0);
    }

    #[test]
    fn rejected_wire_shape() {
        let p = Prediction::rejected("Message is empty.");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "Message is empty.");
        // Failure bodies carry no classification fields.
        assert!(json.get("label").is_none());
        assert!(json.get("latency_ms").is_none());
    }

    #[test]
    fn prediction_json_roundtrip() {
        for p in [
            Prediction::success(SpamClass::Spam, None, 2.0),
            Prediction::success(SpamClass::Ham, Some(0.02), 0.75),
            Prediction::rejected("Message is empty."),
        ] {
            let json = serde_json::to_string(&p).unwrap();
            let parsed: Prediction = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, p);
        }
    }

    #[test]
    fn parse_rejects_mismatched_raw_class() {
        let forged = r#"{
            "ok": true, "label": "SPAM", "raw_class": 0,
            "spam_probability": null, "latency_ms": 1.0
        }"#;
        assert!(serde_json::from_str::<Prediction>(forged).is_err());
    }

    #[test]
    fn parse_rejects_mismatched_ok_flag() {
        let not_ok_success = r#"{
            "ok": false, "label": "HAM", "raw_class": 0,
            "spam_probability": null, "latency_ms": 1.0
        }"#;
        assert!(serde_json::from_str::<Prediction>(not_ok_success).is_err());

        let ok_failure = r#"{ "ok": true, "error": "Message is empty." }"#;
        assert!(serde_json::from_str::<Prediction>(ok_failure).is_err());
    }
}
