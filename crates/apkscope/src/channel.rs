//! Method-call dispatch.
//!
//! Calls arrive by name with a string-keyed argument map and are answered
//! with either a JSON result or an error carrying a wire code. Legacy method
//! names (`extractApk`, `getApkDetails`, `getApkUrls`, `getEntropyDetails`)
//! route to the current methods and receive the current result shape; in
//! particular `getEntropyDetails` answers with `payloadEntropy`, not the old
//! `dexEntropy` key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Inspector, Result, ServiceError};

pub const FILE_PATH: &str = "filePath";
pub const PACKAGE_NAME: &str = "packageName";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    ExtractPackage,
    PackageMetadata,
    Endpoints,
    ObfuscationAnalysis,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "extractPackage" | "extractApk" => Some(Self::ExtractPackage),
            "getPackageMetadata" | "getApkDetails" => Some(Self::PackageMetadata),
            "getEndpoints" | "getApkUrls" => Some(Self::Endpoints),
            "getObfuscationAnalysis" | "getEntropyDetails" => Some(Self::ObfuscationAnalysis),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ExtractPackage => "extractPackage",
            Self::PackageMetadata => "getPackageMetadata",
            Self::Endpoints => "getEndpoints",
            Self::ObfuscationAnalysis => "getObfuscationAnalysis",
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MethodCall {
    #[serde(default)]
    pub id: Option<u64>,
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(id: u64, method: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: Some(id),
            method: method.into(),
            arguments,
        }
    }

    /// String argument `key`, or [`ServiceError::InvalidArgument`] when it is
    /// absent, not a string, or blank.
    pub fn require(&self, key: &'static str) -> Result<&str> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ServiceError::InvalidArgument(key))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MethodError {
    pub code: String,
    pub message: String,
}

impl From<&ServiceError> for MethodError {
    fn from(err: &ServiceError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(MethodError),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MethodResponse {
    pub id: Option<u64>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl MethodResponse {
    pub fn success(id: Option<u64>, value: Value) -> Self {
        Self {
            id,
            outcome: Outcome::Result(value),
        }
    }

    pub fn failure(id: Option<u64>, err: &ServiceError) -> Self {
        Self {
            id,
            outcome: Outcome::Error(err.into()),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&MethodError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|_| ServiceError::InvalidArchive("result is not representable".to_string()))
}

/// Run one call against `inspector`.
pub async fn dispatch(inspector: &Inspector, call: &MethodCall) -> Result<Value> {
    let method = Method::from_name(&call.method)
        .ok_or_else(|| ServiceError::NotImplemented(call.method.clone()))?;

    match method {
        Method::ExtractPackage => {
            let path = inspector.extract_package(call.require(PACKAGE_NAME)?)?;
            Ok(Value::String(path.display().to_string()))
        }
        Method::PackageMetadata => to_value(inspector.package_metadata(call.require(FILE_PATH)?)?),
        Method::Endpoints => to_value(inspector.endpoints(call.require(FILE_PATH)?).await?),
        Method::ObfuscationAnalysis => {
            to_value(inspector.obfuscation(call.require(FILE_PATH)?).await?)
        }
    }
}

/// [`dispatch`] with the outcome folded into a response tagged by call id.
pub async fn handle(inspector: &Inspector, call: &MethodCall) -> MethodResponse {
    match dispatch(inspector, call).await {
        Ok(value) => MethodResponse::success(call.id, value),
        Err(err) => {
            tracing::debug!(id = ?call.id, method = %call.method, code = err.code(), "call failed");
            MethodResponse::failure(call.id, &err)
        }
    }
}
