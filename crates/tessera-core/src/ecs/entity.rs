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

//! Defines core types related to entities in the ECS architecture.

use std::cell::Cell;
use std::fmt;

thread_local! {
    static NEXT_SCENE_ID: Cell<u32> = const { Cell::new(1) };
}

/// Identifies the scene an entity was allocated in.
///
/// Every scene mints a fresh `SceneId` when it is constructed, so an `EntityId`
/// taken from one scene is rejected by every other scene even when the index and
/// generation happen to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u32);

impl SceneId {
    /// The id carried by [`EntityId::INVALID`]. No scene is ever assigned it.
    pub const NONE: SceneId = SceneId(0);

    /// Mints a scene id that has not been handed out on this thread before.
    ///
    /// The counter is per thread. Scenes built on different threads may share an
    /// id, so an `EntityId` is only checked against scenes of the thread that
    /// minted it. Scenes are not `Send`; keep their ids on the same thread.
    pub fn next() -> Self {
        NEXT_SCENE_ID.with(|next| {
            let id = next.get();
            next.set(id.checked_add(1).unwrap_or(1));
            SceneId(id)
        })
    }

    /// Returns the raw numeric value.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

/// A unique identifier for an entity in a scene.
///
/// It combines an index with a generation count to solve the "ABA problem".
/// When an entity is destroyed, its index can be recycled for a new entity,
/// but the generation is incremented. This ensures that old `EntityId` handles
/// pointing to a recycled index become invalid and cannot accidentally affect
/// the new entity.
///
/// Ordering compares the index first, which is the order pools iterate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    /// The index of the entity's slot in the owning pool.
    pub index: u32,
    /// A generation counter that is incremented each time the index is recycled.
    pub generation: u32,
    /// The scene whose pool allocated this id.
    pub scene: SceneId,
}

impl EntityId {
    /// Sentinel meaning "no entity".
    pub const INVALID: EntityId = EntityId {
        index: u32::MAX,
        generation: 0,
        scene: SceneId::NONE,
    };

    /// Returns `true` if this is the [`EntityId::INVALID`] sentinel.
    pub fn is_invalid(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "<invalid>")
        } else {
            write!(f, "{}v{}", self.index, self.generation)
        }
    }
}
