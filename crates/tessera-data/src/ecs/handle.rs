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

//! Self-invalidating weak references to entities.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tessera_core::ecs::EntityId;

use crate::ecs::error::EcsError;

/// The state shared by every handle to one entity.
///
/// The entity record caches the context; refresh flips `valid` when it frees the
/// entity's slot.
#[derive(Debug)]
pub(crate) struct HandleContext {
    id: EntityId,
    valid: Cell<bool>,
}

impl HandleContext {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            valid: Cell::new(true),
        }
    }

    pub(crate) fn invalidate(&self) {
        self.valid.set(false);
    }
}

/// A weak reference to an entity that reports its own invalidation.
///
/// A handle does not keep the entity alive. Once the entity is destroyed, every
/// handle to it reports invalid and [`EntityHandle::id`] fails, even if the slot
/// has been recycled for another entity since. Clones share state and compare
/// equal.
#[derive(Clone)]
pub struct EntityHandle {
    context: Rc<HandleContext>,
}

impl EntityHandle {
    pub(crate) fn new(context: Rc<HandleContext>) -> Self {
        Self { context }
    }

    /// Returns `true` while the referenced entity exists.
    pub fn is_valid(&self) -> bool {
        self.context.valid.get()
    }

    /// Returns the id of the referenced entity, if it still exists.
    pub fn id(&self) -> Result<EntityId, EcsError> {
        if self.is_valid() {
            Ok(self.context.id)
        } else {
            Err(EcsError::InvalidHandle)
        }
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.context, &other.context)
    }
}

impl Eq for EntityHandle {}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityHandle")
            .field("id", &self.context.id)
            .field("valid", &self.is_valid())
            .finish()
    }
}
