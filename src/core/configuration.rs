use super::decimal::PrecisionDecimal;
use super::error::{LedgerError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Run configuration: the closed set of known assets plus the exchanges and
/// holders transactions may refer to.
///
/// Every constructor in the core validates its arguments through this type
/// and propagates its errors unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Configuration {
    /// Label shown in diagnostics (usually the file the configuration came from)
    #[serde(default)]
    pub name: String,
    /// Asset symbols transactions may reference (e.g. "BTC")
    pub assets: BTreeSet<String>,
    /// Known exchanges. When empty, any non-blank exchange name is accepted.
    #[serde(default)]
    pub exchanges: BTreeSet<String>,
    /// Known holders. When empty, any non-blank holder name is accepted.
    #[serde(default)]
    pub holders: BTreeSet<String>,
}

/// JSON Schema of the configuration file.
pub fn configuration_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(Configuration);
    Ok(serde_json::to_string_pretty(&schema)?)
}

impl Configuration {
    pub fn new<A, E, H>(name: &str, assets: A, exchanges: E, holders: H) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
        H: IntoIterator,
        H::Item: Into<String>,
    {
        Configuration {
            name: name.to_string(),
            assets: assets.into_iter().map(Into::into).collect(),
            exchanges: exchanges.into_iter().map(Into::into).collect(),
            holders: holders.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a configuration from JSON
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Configuration> {
        let configuration: Configuration = serde_json::from_reader(reader)?;
        if configuration.assets.is_empty() {
            anyhow::bail!("configuration '{}' declares no assets", configuration.name);
        }
        for asset in &configuration.assets {
            configuration.type_check_string("assets", asset)?;
        }
        log::info!(
            "Loaded configuration '{}': {} assets, {} exchanges, {} holders",
            configuration.name,
            configuration.assets.len(),
            configuration.exchanges.len(),
            configuration.holders.len()
        );
        Ok(configuration)
    }

    /// Read a configuration file. The name defaults to the file path.
    pub fn from_path(path: &Path) -> anyhow::Result<Configuration> {
        let file = File::open(path)?;
        let mut configuration = Self::from_reader(BufReader::new(file))?;
        if configuration.name.is_empty() {
            configuration.name = path.display().to_string();
        }
        Ok(configuration)
    }

    /// Parameter names must be plain identifiers so error messages stay readable.
    pub fn type_check_parameter_name(name: &str) -> Result<()> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(LedgerError::Value(format!("Parameter name is not valid: {name:?}")));
        }
        Ok(())
    }

    /// Non-blank string, returned trimmed.
    pub fn type_check_string(&self, name: &str, value: &str) -> Result<String> {
        Self::type_check_parameter_name(name)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' has empty value: {value:?}"
            )));
        }
        Ok(trimmed.to_string())
    }

    pub fn type_check_asset(&self, name: &str, value: &str) -> Result<String> {
        let asset = self.type_check_string(name, value)?;
        if !self.assets.contains(&asset) {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' value is not known: {value:?}"
            )));
        }
        Ok(asset)
    }

    pub fn type_check_exchange(&self, name: &str, value: &str) -> Result<String> {
        let exchange = self.type_check_string(name, value)?;
        if !self.exchanges.is_empty() && !self.exchanges.contains(&exchange) {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' value is not known: {value:?}"
            )));
        }
        Ok(exchange)
    }

    pub fn type_check_holder(&self, name: &str, value: &str) -> Result<String> {
        let holder = self.type_check_string(name, value)?;
        if !self.holders.is_empty() && !self.holders.contains(&holder) {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' value is not known: {value:?}"
            )));
        }
        Ok(holder)
    }

    /// Value must be >= 0 (> 0 when `non_zero`), compared at quantity scale.
    pub fn type_check_positive_decimal(
        &self,
        name: &str,
        value: PrecisionDecimal,
        non_zero: bool,
    ) -> Result<PrecisionDecimal> {
        Self::type_check_parameter_name(name)?;
        if value.is_negative() {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' has negative value: {value}"
            )));
        }
        if non_zero && value.is_zero() {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' has zero value: {value}"
            )));
        }
        Ok(value)
    }

    pub fn type_check_positive_int(&self, name: &str, value: i64, non_zero: bool) -> Result<i64> {
        Self::type_check_parameter_name(name)?;
        if value < 0 {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' has negative value: {value}"
            )));
        }
        if non_zero && value == 0 {
            return Err(LedgerError::Value(format!(
                "Parameter '{name}' has zero value: {value}"
            )));
        }
        Ok(value)
    }
}
