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

use serde::{de::DeserializeOwned, Serialize};

/// A marker trait for types that can be attached to entities as components.
///
/// Components must be cloneable, so entity cloning produces independent copies,
/// and serde-serializable, so scenes can be persisted in any supported format.
/// The type is registered on a scene under a name before it is used; the name is
/// what appears in encoded scenes.
pub trait Component: 'static + Clone + Serialize + DeserializeOwned {}
