//! C-compatible API exposed to the web front end.
//!
//! Ownership rules: an engine returned by `heartrisk_engine_open` must be
//! released with `heartrisk_engine_close`; every string returned by
//! `heartrisk_predict` must be released with `heartrisk_free_str`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::Serialize;
use serde_json::Value;

use crate::common::config::AppCfg;
use crate::common::error::{RiskCode, RiskError, RiskResult};
use crate::common::log;
use crate::engine::service::RiskEngine;
use crate::features::domain::RawSubmission;

/// ABI version to coordinate with the front end.
#[no_mangle]
pub extern "C" fn heartrisk_api_version() -> u32 {
    1
}

/// Load config, schema and model. Never returns null: a missing model still
/// yields an engine whose predictions report `ModelUnavailable`.
#[no_mangle]
pub extern "C" fn heartrisk_engine_open() -> *mut RiskEngine {
    let cfg = AppCfg::load();
    log::init(&cfg.log_level);
    Box::into_raw(Box::new(RiskEngine::from_config(&cfg)))
}

/// Release an engine created by `heartrisk_engine_open`.
#[no_mangle]
pub extern "C" fn heartrisk_engine_close(engine: *mut RiskEngine) {
    if engine.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(engine));
    }
}

/// Assess a JSON object of form fields and return a JSON result (caller must free).
#[no_mangle]
pub extern "C" fn heartrisk_predict(
    engine: *const RiskEngine,
    form_json: *const c_char,
) -> *const c_char {
    if engine.is_null() || form_json.is_null() {
        return string_to_raw(failure_json(&RiskError::invalid("null pointer")));
    }

    let engine = unsafe { &*engine };
    let input = unsafe { CStr::from_ptr(form_json) }.to_string_lossy();
    string_to_raw(respond(engine, &input))
}

/// Free strings allocated by Rust.
#[no_mangle]
pub extern "C" fn heartrisk_free_str(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(ptr as *mut c_char);
    }
}

/// JSON payload handed back across the boundary.
#[derive(Debug, Serialize)]
struct Response<'a> {
    ok: bool,
    code: u32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<bool>,
    threshold: f64,
    warnings: Vec<String>,
    form: &'a RawSubmission,
}

/// Run one form through `engine` and render the response document.
pub fn respond(engine: &RiskEngine, form_json: &str) -> String {
    let raw = match parse_form(form_json) {
        Ok(raw) => raw,
        Err(err) => return failure_json(&err),
    };

    let assessment = engine.assess(&raw);
    let warnings = assessment.warnings.iter().map(ToString::to_string).collect();
    let response = match &assessment.outcome {
        Ok(result) => Response {
            ok: true,
            code: RiskCode::Ok as u32,
            message: "Prediction completed".to_string(),
            prediction: Some(result.label()),
            probability: Some(result.probability),
            decision: Some(result.decision),
            threshold: result.threshold,
            warnings,
            form: &raw,
        },
        Err(err) => Response {
            ok: false,
            code: err.code() as u32,
            message: err.to_string(),
            prediction: None,
            probability: None,
            decision: None,
            threshold: engine.schema().threshold(),
            warnings,
            form: &raw,
        },
    };

    serde_json::to_string(&response)
        .unwrap_or_else(|err| failure_json(&RiskError::internal(err.to_string())))
}

/// Interpret a JSON object as form fields. Scalars are stringified, null is empty.
pub fn parse_form(form_json: &str) -> RiskResult<RawSubmission> {
    let value: Value = serde_json::from_str(form_json)
        .map_err(|err| RiskError::invalid(format!("form is not JSON: {err}")))?;
    let Value::Object(map) = value else {
        return Err(RiskError::invalid("form must be a JSON object"));
    };

    let mut raw = RawSubmission::new();
    for (key, value) in map {
        let text = match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(RiskError::invalid(format!("field {key:?} is not a scalar")));
            }
        };
        raw.insert(key, text);
    }
    Ok(raw)
}

fn failure_json(err: &RiskError) -> String {
    serde_json::json!({
        "ok": false,
        "code": err.code() as u32,
        "message": err.to_string(),
        "warnings": [],
        "form": {},
    })
    .to_string()
}

/// Hand a document to C. One with an interior NUL is replaced by an internal error.
fn string_to_raw(s: String) -> *const c_char {
    CString::new(s)
        .or_else(|_| {
            let err = RiskError::internal("response contained an interior NUL byte");
            CString::new(failure_json(&err))
        })
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::domain::FeatureRecord;
    use crate::inference::domain::{Classifier, ClassifierError, ModelSlot, ProbaMatrix};
    use crate::schema::domain::{CoercionStrategy, FeatureSchema};
    use std::path::Path;

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn predict_proba(&self, _: &[FeatureRecord]) -> Result<ProbaMatrix, ClassifierError> {
            Ok(ProbaMatrix::single(self.0.clone()))
        }
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new(["Age", "Smoking"], ["Age"], 0.15, CoercionStrategy::DeclaredNumeric)
    }

    fn parse(doc: &str) -> Value {
        serde_json::from_str(doc).unwrap()
    }

    #[test]
    fn api_version_is_one() {
        assert_eq!(heartrisk_api_version(), 1);
    }

    #[test]
    fn success_document() {
        let engine = RiskEngine::new(schema(), ModelSlot::ready(Fixed(vec![0.82, 0.18])));
        let doc = parse(&respond(&engine, r#"{"Age": "x", "Smoking": "yes"}"#));
        assert_eq!(doc["ok"], true);
        assert_eq!(doc["code"], 0);
        assert_eq!(doc["prediction"], 1);
        assert_eq!(doc["decision"], true);
        assert_eq!(doc["probability"], 0.18);
        assert_eq!(doc["threshold"], 0.15);
        assert_eq!(doc["message"], "Prediction completed");
        assert_eq!(
            doc["warnings"][0],
            "Could not parse numeric field Age. Treating as missing."
        );
        assert_eq!(doc["form"]["Smoking"], "yes");
    }

    #[test]
    fn unavailable_model_document() {
        let engine = RiskEngine::new(
            schema(),
            ModelSlot::unavailable(Path::new("heart_disease_predictor.json"), "not found"),
        );
        let doc = parse(&respond(&engine, r#"{"Age": 54}"#));
        assert_eq!(doc["ok"], false);
        assert_eq!(doc["code"], RiskCode::ModelUnavailable as u32);
        assert_eq!(
            doc["message"],
            "Model not loaded. Check server logs. Expected file: heart_disease_predictor.json"
        );
        assert!(doc.get("probability").is_none());
        assert_eq!(doc["form"]["Age"], "54");
    }

    #[test]
    fn form_parsing() {
        let raw = parse_form(r#"{"b": "1", "a": null, "c": true}"#).unwrap();
        let pairs: Vec<_> = raw.iter().collect();
        assert_eq!(pairs, vec![("b", "1"), ("a", ""), ("c", "true")]);

        assert_eq!(parse_form("[]").unwrap_err().code(), RiskCode::InvalidInput);
        assert_eq!(parse_form("{").unwrap_err().code(), RiskCode::InvalidInput);
        assert_eq!(
            parse_form(r#"{"Age": [1]}"#).unwrap_err().code(),
            RiskCode::InvalidInput
        );
    }

    #[test]
    fn invalid_form_document() {
        let engine = RiskEngine::new(schema(), ModelSlot::ready(Fixed(vec![0.5])));
        let doc = parse(&respond(&engine, "not json"));
        assert_eq!(doc["ok"], false);
        assert_eq!(doc["code"], RiskCode::InvalidInput as u32);
    }

    #[test]
    fn round_trip_through_c_strings() {
        let engine = Box::into_raw(Box::new(RiskEngine::new(
            schema(),
            ModelSlot::ready(Fixed(vec![0.9])),
        )));
        let input = CString::new(r#"{"Age": "70"}"#).unwrap();
        let out = heartrisk_predict(engine, input.as_ptr());
        assert!(!out.is_null());
        let text = unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned();
        heartrisk_free_str(out);
        heartrisk_engine_close(engine);

        let doc = parse(&text);
        assert_eq!(doc["probability"], 0.9);

        let out = heartrisk_predict(std::ptr::null(), input.as_ptr());
        let text = unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned();
        heartrisk_free_str(out);
        assert_eq!(parse(&text)["code"], RiskCode::InvalidInput as u32);
    }

    #[test]
    fn nul_in_document_becomes_internal_error() {
        let out = string_to_raw("{\"message\": \"a\0b\"}".to_string());
        assert!(!out.is_null());
        let text = unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned();
        heartrisk_free_str(out);

        let doc = parse(&text);
        assert_eq!(doc["ok"], false);
        assert_eq!(doc["code"], RiskCode::Internal as u32);
        assert_eq!(
            doc["message"],
            "internal error: response contained an interior NUL byte"
        );
    }
}
