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

//! Entity storage and ID management.

use tessera_core::ecs::{EntityId, SceneId};

use crate::ecs::{entity::Entity, error::EcsError};

/// Slot storage for the entity records of one scene.
///
/// The `EntityPool` maintains a dense list of entity slots. It handles entity
/// creation, recycling of indices via a free list, and checked access to the
/// records. The backing list never shrinks; validity of an id is a property of
/// slot occupancy and generation, not of the index range.
#[derive(Debug)]
pub struct EntityPool {
    scene: SceneId,
    /// One entry per slot ever created. The `EntityId` holds the slot's current
    /// generation; the record is `Some` only while the entity is alive.
    entities: Vec<(EntityId, Option<Entity>)>,
    /// Indices available for reuse, enabling $O(1)$ allocation.
    freed_entities: Vec<u32>,
    occupied: usize,
}

impl EntityPool {
    /// Creates a new, empty pool for `scene`.
    pub(crate) fn new(scene: SceneId) -> Self {
        Self {
            scene,
            entities: Vec::new(),
            freed_entities: Vec::new(),
            occupied: 0,
        }
    }

    /// Allocates a new or recycled `EntityId` and puts a fresh record in its slot.
    ///
    /// If there are indices in the free list, one is popped and its generation is
    /// incremented. Otherwise, a new slot is appended.
    pub(crate) fn create(&mut self) -> EntityId {
        self.occupied += 1;
        if let Some(index) = self.freed_entities.pop() {
            let (id_slot, record_slot) = &mut self.entities[index as usize];
            id_slot.generation = id_slot.generation.wrapping_add(1);
            *record_slot = Some(Entity::new(*id_slot));
            *id_slot
        } else {
            let id = EntityId {
                index: self.entities.len() as u32,
                generation: 0,
                scene: self.scene,
            };
            self.entities.push((id, Some(Entity::new(id))));
            id
        }
    }

    /// Returns the record of a live entity.
    ///
    /// Fails with [`EcsError::InvalidEntity`] if the id was never created, has been
    /// destroyed, was recycled since, or belongs to another scene.
    pub fn get(&self, id: EntityId) -> Result<&Entity, EcsError> {
        self.entities
            .get(id.index as usize)
            .and_then(|(slot_id, record)| {
                if *slot_id == id {
                    record.as_ref()
                } else {
                    None
                }
            })
            .ok_or(EcsError::InvalidEntity(id))
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, EcsError> {
        self.entities
            .get_mut(id.index as usize)
            .and_then(|(slot_id, record)| {
                if *slot_id == id {
                    record.as_mut()
                } else {
                    None
                }
            })
            .ok_or(EcsError::InvalidEntity(id))
    }

    /// Frees the slot and returns the record that occupied it.
    ///
    /// Only the scene's refresh calls this, once all bookkeeping for the entity
    /// is done.
    pub(crate) fn destroy(&mut self, id: EntityId) -> Result<Entity, EcsError> {
        let record = self
            .entities
            .get_mut(id.index as usize)
            .filter(|(slot_id, _)| *slot_id == id)
            .and_then(|(_, record)| record.take())
            .ok_or(EcsError::InvalidEntity(id))?;
        self.freed_entities.push(id.index);
        self.occupied -= 1;
        Ok(record)
    }

    /// Returns `true` if `id` refers to a live entity of this pool.
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_ok()
    }

    /// Returns the number of live entities, activated or not.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if no entity is alive.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns the number of slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Iterates the activated entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .iter()
            .filter_map(|(_, record)| record.as_ref())
            .filter(|record| record.is_activated())
    }

    /// Returns the first activated entity matching `predicate`, in ascending id order.
    pub fn find_first(&self, mut predicate: impl FnMut(&Entity) -> bool) -> Option<EntityId> {
        self.iter()
            .find(|record| predicate(record))
            .map(Entity::id)
    }

    /// Returns every activated entity matching `predicate`, in ascending id order.
    pub fn find(&self, mut predicate: impl FnMut(&Entity) -> bool) -> Vec<EntityId> {
        self.iter()
            .filter(|record| predicate(record))
            .map(Entity::id)
            .collect()
    }

    // Every live record, activated or not.
    pub(crate) fn records(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter_map(|(_, record)| record.as_ref())
    }
}
