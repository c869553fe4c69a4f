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

//! Groups the persistence contract of a scene.
//!
//! A scene is persisted as a tree: a list of root entities, each carrying an
//! optional name, its components keyed by registered type name, and its children
//! nested inline. The tree ([`SceneDocument`]) is representation-agnostic; the
//! concrete bytes are produced by one of the [`SceneFormat`]s. Component bodies are
//! carried as [`Payload`]s, already encoded for the chosen format, so the tree can
//! be walked without knowing any component type.

mod document;
mod error;
mod format;

pub use document::*;
pub use error::*;
pub use format::*;
