use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::disc::basis::triangle::MAX_POLYNOMIAL_ORDER;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse parameter file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parameter `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SolverParamParser {
    pub cfl: f64,
    pub final_time: f64,
    pub final_step: usize,
    pub polynomial_order: usize,
    pub output_interval: usize,
    pub hcr: f64,
    pub mach: f64,
    pub r_inner: f64,
    pub r_outer: f64,
    pub radial_num: usize,
    pub angular_num: usize,
}
impl Default for SolverParamParser {
    fn default() -> Self {
        Self {
            cfl: 0.5,
            final_time: 1.0,
            final_step: 100_000,
            polynomial_order: 2,
            output_interval: 0,
            hcr: 1.4,
            mach: 2.5,
            r_inner: 1.0,
            r_outer: 1.384,
            radial_num: 8,
            angular_num: 16,
        }
    }
}
impl SolverParamParser {
    pub fn parse(file_path: impl AsRef<Path>) -> Result<Self, ParamError> {
        let file_content = fs::read_to_string(file_path)?;
        Self::from_json(&file_content)
    }
    pub fn from_json(content: &str) -> Result<Self, ParamError> {
        let param: SolverParamParser = serde_json::from_str(content)?;
        param.validate()?;
        Ok(param)
    }
    pub fn validate(&self) -> Result<(), ParamError> {
        let invalid = |name, reason: &str| {
            Err(ParamError::Invalid {
                name,
                reason: reason.to_string(),
            })
        };
        if !(self.cfl > 0.0) {
            return invalid("cfl", "must be positive");
        }
        if !(self.final_time >= 0.0) {
            return invalid("final_time", "must be non-negative");
        }
        if self.polynomial_order > MAX_POLYNOMIAL_ORDER {
            return invalid(
                "polynomial_order",
                &format!("must not exceed {MAX_POLYNOMIAL_ORDER}"),
            );
        }
        if !(self.hcr > 1.0) {
            return invalid("hcr", "must be greater than one");
        }
        if !(self.mach > 0.0) {
            return invalid("mach", "must be positive");
        }
        if !(self.r_inner > 0.0 && self.r_outer > self.r_inner) {
            return invalid("r_outer", "must exceed a positive r_inner");
        }
        if self.radial_num == 0 || self.angular_num == 0 {
            return invalid("radial_num", "mesh resolution must be at least one");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let json = r#"{ "cfl": 0.3, "polynomial_order": 1 }"#;
        let param = SolverParamParser::from_json(json).unwrap();
        assert_eq!(param.cfl, 0.3);
        assert_eq!(param.polynomial_order, 1);
        assert_eq!(param.hcr, 1.4);
        assert_eq!(param.r_outer, 1.384);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SolverParamParser::from_json(r#"{ "polynomial_order": 9 }"#).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Invalid {
                name: "polynomial_order",
                ..
            }
        ));
        let err = SolverParamParser::from_json(r#"{ "r_inner": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ParamError::Invalid { name: "r_outer", .. }));
        let err = SolverParamParser::from_json(r#"{ "cfl": "fast" }"#).unwrap_err();
        assert!(matches!(err, ParamError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SolverParamParser::parse("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ParamError::Io(_)));
    }
}
