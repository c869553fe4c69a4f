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

//! Error types of the persistence contract.

use thiserror::Error;

use super::SceneFormat;

/// An error raised while encoding a scene.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A component body could not be encoded.
    #[error("failed to encode component '{type_name}': {message}")]
    Component {
        /// The registered name of the component type.
        type_name: String,
        /// The underlying serializer message.
        message: String,
    },
    /// A payload was encoded for a different format than the document.
    #[error("component payload does not match the {0:?} format")]
    PayloadMismatch(SceneFormat),
    /// The JSON writer failed.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The binary writer failed.
    #[error("binary encoding failed: {0}")]
    Binary(#[from] bincode::error::EncodeError),
}

/// An error raised while decoding a scene.
///
/// Any of these aborts the whole decode. The scene being decoded into is left
/// partially populated and must be discarded by the caller.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document is not valid JSON or lacks a required member.
    #[error("malformed json scene: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is not a valid binary scene.
    #[error("malformed binary scene: {0}")]
    Binary(#[from] bincode::error::DecodeError),
    /// Bytes remained after the binary document or body was read.
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
    /// The document names a component type that is not registered on the scene.
    #[error("unregistered component type '{0}'")]
    UnregisteredComponent(String),
    /// A component body could not be decoded into its registered type.
    #[error("failed to decode component '{type_name}': {message}")]
    Component {
        /// The registered name of the component type.
        type_name: String,
        /// The underlying deserializer message.
        message: String,
    },
    /// A payload was decoded for a different format than the document.
    #[error("component payload does not match the {0:?} format")]
    PayloadMismatch(SceneFormat),
    /// The scene refused an operation while rebuilding the decoded graph.
    #[error("scene rejected decoded data: {0}")]
    Rejected(String),
}
