//! Contract ABI handling
//!
//! Loads the externally supplied ABI document into an alloy [`JsonAbi`] and
//! encodes calls / decodes results through `alloy::dyn_abi`. The raw document
//! is kept alongside so it can be reported back exactly as deployed.

use std::str::FromStr;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi, Param};
use alloy::primitives::{keccak256, Address, U256};
use serde_json::Value;

use crate::error::VaultError;
use crate::Result;

/// Parsed contract ABI plus the document it came from
#[derive(Debug, Clone)]
pub struct ContractAbi {
    document: Value,
    abi: JsonAbi,
}

impl ContractAbi {
    /// Parse an ABI document
    ///
    /// Accepts a bare entry array or a build artifact with an `abi` field.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| VaultError::abi(format!("ABI is not valid JSON: {}", e)))?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self> {
        let entries = match document {
            Value::Array(_) => document.clone(),
            Value::Object(ref artifact) => artifact
                .get("abi")
                .cloned()
                .ok_or_else(|| VaultError::abi("artifact has no \"abi\" field"))?,
            _ => return Err(VaultError::abi("ABI must be an array or an artifact object")),
        };

        let abi: JsonAbi = serde_json::from_value(entries)
            .map_err(|e| VaultError::abi(format!("malformed ABI entry: {}", e)))?;

        Ok(Self { document, abi })
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// The document as loaded, wrapper and all
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Look up a function by name (first overload)
    pub fn function(&self, name: &str) -> Result<Function> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .cloned()
            .ok_or_else(|| VaultError::abi(format!("ABI has no function named '{}'", name)))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.document)
            .map_err(|e| VaultError::abi(format!("failed to render ABI: {}", e)))
    }
}

// ============================================================================
// Calls and results
// ============================================================================

/// Encode selector plus arguments for a call to `function`
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>> {
    function
        .abi_encode_input(args)
        .map_err(|e| VaultError::abi(format!("{}: {}", function.signature(), e)))
}

/// Decode a uint from the result of `function`
///
/// With `field` set, the named output (or the named component of a returned
/// struct) is used; otherwise the function must have exactly one output.
pub fn decode_uint(function: &Function, data: &[u8], field: Option<&str>) -> Result<U256> {
    let values = function.abi_decode_output(data).map_err(|e| {
        VaultError::invalid_response(format!("{} returned undecodable data: {}", function.name, e))
    })?;

    let value = match field {
        Some(field) => find_field(&function.outputs, &values, field).ok_or_else(|| {
            VaultError::abi(format!("{} has no output named '{}'", function.name, field))
        })?,
        None => match values.as_slice() {
            [single] => single,
            _ => {
                return Err(VaultError::abi(format!(
                    "{} returns {} values, expected one",
                    function.name,
                    values.len()
                )))
            }
        },
    };

    value.as_uint().map(|(value, _)| value).ok_or_else(|| {
        VaultError::abi(format!("output of {} is not an unsigned integer", function.name))
    })
}

fn find_field<'a>(
    params: &[Param],
    values: &'a [DynSolValue],
    field: &str,
) -> Option<&'a DynSolValue> {
    for (param, value) in params.iter().zip(values) {
        if param.name == field {
            return Some(value);
        }
        if let DynSolValue::Tuple(inner) = value {
            if let Some(found) = find_field(&param.components, inner, field) {
                return Some(found);
            }
        }
    }
    None
}

// ============================================================================
// Helpers
// ============================================================================

/// First four bytes of the keccak-256 hash of a function signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Parse a `0x`-prefixed 20-byte hex address
pub fn parse_address(address: &str) -> Result<Address> {
    if !address.starts_with("0x") {
        return Err(VaultError::InvalidAddress(address.to_string()));
    }
    Address::from_str(address).map_err(|_| VaultError::InvalidAddress(address.to_string()))
}

pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn from_hex_data(data: &str) -> Result<Vec<u8>> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(digits).map_err(|e| VaultError::invalid_response(format!("bad hex data: {}", e)))
}
