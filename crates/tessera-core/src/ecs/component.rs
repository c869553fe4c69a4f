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

//! Defines the identifier of a component inside its pool.

use std::fmt;

/// Identifies a component slot in one component pool.
///
/// Component ids are local to their pool: two pools of different types number
/// their components independently. Like [`EntityId`](super::EntityId), the id
/// carries a generation so a recycled slot is never mistaken for the component
/// that used to live there. Replacing a component keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    /// The index of the slot in the owning pool.
    pub index: u32,
    /// Incremented each time the slot is recycled.
    pub generation: u32,
}

impl ComponentId {
    /// Sentinel meaning "no component".
    pub const INVALID: ComponentId = ComponentId {
        index: u32::MAX,
        generation: 0,
    };

    /// Returns `true` if this is the [`ComponentId::INVALID`] sentinel.
    pub fn is_invalid(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "<invalid>")
        } else {
            write!(f, "{}v{}", self.index, self.generation)
        }
    }
}
