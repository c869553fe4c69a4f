// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the persistence representations and the encoded component body.

use serde::{de::DeserializeOwned, Serialize};

use super::{DecodeError, EncodeError};

/// The concrete representation a scene is encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneFormat {
    /// Human-readable, tree-structured JSON.
    Json,
    /// Compact, positional, length-prefixed binary (bincode standard configuration).
    Binary,
}

/// A component body encoded for one [`SceneFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A JSON tree.
    Json(serde_json::Value),
    /// A bincode-encoded byte string.
    Binary(Vec<u8>),
}

impl Payload {
    /// Encodes `value` for `format`.
    pub fn encode<T: Serialize>(format: SceneFormat, value: &T) -> Result<Self, EncodeError> {
        match format {
            SceneFormat::Json => Ok(Payload::Json(serde_json::to_value(value)?)),
            SceneFormat::Binary => Ok(Payload::Binary(bincode::serde::encode_to_vec(
                value,
                bincode::config::standard(),
            )?)),
        }
    }

    /// Decodes the body back into a value.
    ///
    /// A binary body must be consumed entirely; leftover bytes mean the body was
    /// written for a different type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        match self {
            Payload::Json(value) => Ok(T::deserialize(value)?),
            Payload::Binary(bytes) => {
                let (value, read) =
                    bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
                if read != bytes.len() {
                    return Err(DecodeError::TrailingBytes(bytes.len() - read));
                }
                Ok(value)
            }
        }
    }

    /// Returns the format this body was encoded for.
    pub fn format(&self) -> SceneFormat {
        match self {
            Payload::Json(_) => SceneFormat::Json,
            Payload::Binary(_) => SceneFormat::Binary,
        }
    }
}
