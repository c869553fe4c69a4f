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

//! Typed component storage and its add/remove notifications.

use std::fmt;
use std::ops::Deref;

use tessera_core::ecs::{ComponentId, EntityId};
use tessera_core::event::{Dispatcher, ListenerId};

use crate::ecs::{component::Component, entity_pool::EntityPool, error::EcsError};

/// Whether a component became visible or is about to stop being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentEventKind {
    /// The component is now attached to an activated entity.
    Add,
    /// The component is about to be torn down, or its entity is about to be freed.
    Remove,
}

/// A notification delivered to component listeners.
///
/// Remove events are delivered before the component is torn down, so
/// `component` always holds its final value. When the removal is part of an
/// entity's destruction, `entity` is [`EntityId::INVALID`]: the entity is
/// already on its way out and its handles have been invalidated.
#[derive(Debug)]
pub struct ComponentEvent<'a, T> {
    /// What happened.
    pub kind: ComponentEventKind,
    /// The component's id in its pool.
    pub component_id: ComponentId,
    /// The owning entity, or [`EntityId::INVALID`] during destruction.
    pub entity: EntityId,
    /// The component's value.
    pub component: &'a T,
}

type ComponentListener<T> = dyn for<'a> FnMut(&ComponentEvent<'a, T>);

struct ComponentSlot<T> {
    generation: u32,
    entry: Option<(EntityId, T)>,
}

/// Slot storage for every component of type `T` in a scene.
///
/// Mirrors the entity pool: a slot list with a free list, plus a map from entity
/// index to the component attached to it. Whether a component is visible depends
/// only on its owner being activated, so the pool carries no activation flag of
/// its own and callers pass the owner's state in.
pub(crate) struct ComponentPool<T: Component> {
    type_name: String,
    slots: Vec<ComponentSlot<T>>,
    freed_slots: Vec<u32>,
    entity_to_component: Vec<Option<ComponentId>>,
    listeners: Dispatcher<ComponentListener<T>>,
}

impl<T: Component> ComponentPool<T> {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: Vec::new(),
            freed_slots: Vec::new(),
            entity_to_component: Vec::new(),
            listeners: Dispatcher::new(),
        }
    }

    pub(crate) fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn id_of(&self, entity: EntityId) -> Option<ComponentId> {
        let id = (*self.entity_to_component.get(entity.index as usize)?)?;
        match &self.slots.get(id.index as usize)?.entry {
            Some((owner, _)) if *owner == entity => Some(id),
            _ => None,
        }
    }

    pub(crate) fn get_for(&self, entity: EntityId) -> Option<&T> {
        let id = self.id_of(entity)?;
        self.slots[id.index as usize]
            .entry
            .as_ref()
            .map(|(_, value)| value)
    }

    pub(crate) fn get_for_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        let id = self.id_of(entity)?;
        self.slots[id.index as usize]
            .entry
            .as_mut()
            .map(|(_, value)| value)
    }

    pub(crate) fn get(&self, id: ComponentId) -> Option<ComponentRef<'_, T>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref().map(|(entity, component)| ComponentRef {
            id,
            entity: *entity,
            component,
        })
    }

    /// Attaches `value` to `entity`. Fires Add right away if the entity is activated.
    pub(crate) fn insert(
        &mut self,
        entity: EntityId,
        value: T,
        activated: bool,
    ) -> Result<ComponentId, EcsError> {
        if self.id_of(entity).is_some() {
            return Err(EcsError::DuplicateComponent {
                entity,
                type_name: self.type_name.clone(),
            });
        }

        let id = match self.freed_slots.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.entry = Some((entity, value));
                ComponentId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(ComponentSlot {
                    generation: 0,
                    entry: Some((entity, value)),
                });
                ComponentId {
                    index,
                    generation: 0,
                }
            }
        };

        let entity_index = entity.index as usize;
        if self.entity_to_component.len() <= entity_index {
            self.entity_to_component.resize(entity_index + 1, None);
        }
        self.entity_to_component[entity_index] = Some(id);

        if activated {
            self.notify(ComponentEventKind::Add, entity, entity);
        }
        Ok(id)
    }

    /// Detaches the component of `entity` and returns it.
    ///
    /// Fires Remove first if the entity is activated, reporting `reported` as the
    /// owner.
    pub(crate) fn remove(
        &mut self,
        entity: EntityId,
        reported: EntityId,
        activated: bool,
    ) -> Result<T, EcsError> {
        let id = self.id_of(entity).ok_or_else(|| self.missing(entity))?;
        if activated {
            self.notify(ComponentEventKind::Remove, entity, reported);
        }

        let value = self.slots[id.index as usize]
            .entry
            .take()
            .map(|(_, value)| value)
            .ok_or_else(|| self.missing(entity))?;
        self.freed_slots.push(id.index);
        self.entity_to_component[entity.index as usize] = None;
        Ok(value)
    }

    /// Swaps the value of the component attached to `entity`, keeping its id and
    /// slot. Attaches a new component if there is none.
    pub(crate) fn replace(
        &mut self,
        entity: EntityId,
        value: T,
        activated: bool,
    ) -> Result<ComponentId, EcsError> {
        let Some(id) = self.id_of(entity) else {
            return self.insert(entity, value, activated);
        };
        if activated {
            self.notify(ComponentEventKind::Remove, entity, entity);
        }
        if let Some((_, slot_value)) = self.slots[id.index as usize].entry.as_mut() {
            *slot_value = value;
        }
        if activated {
            self.notify(ComponentEventKind::Add, entity, entity);
        }
        Ok(id)
    }

    /// Delivers an event about the component attached to `entity`, if any.
    pub(crate) fn notify(
        &mut self,
        kind: ComponentEventKind,
        entity: EntityId,
        reported: EntityId,
    ) {
        let Some(id) = self.id_of(entity) else {
            return;
        };
        let Some((_, component)) = self.slots[id.index as usize].entry.as_ref() else {
            return;
        };
        let event = ComponentEvent {
            kind,
            component_id: id,
            entity: reported,
            component,
        };
        for listener in self.listeners.listeners_mut() {
            listener(&event);
        }
    }

    pub(crate) fn add_listener(
        &mut self,
        listener: impl FnMut(&ComponentEvent<'_, T>) + 'static,
    ) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Every stored component in ascending id order, whatever its owner's state.
    pub(crate) fn entries(&self) -> impl Iterator<Item = ComponentRef<'_, T>> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|(entity, component)| ComponentRef {
                id: ComponentId {
                    index: index as u32,
                    generation: slot.generation,
                },
                entity: *entity,
                component,
            })
        })
    }

    fn missing(&self, entity: EntityId) -> EcsError {
        EcsError::MissingComponent {
            entity,
            type_name: self.type_name.clone(),
        }
    }
}

/// A component together with its id and owner.
pub struct ComponentRef<'a, T> {
    id: ComponentId,
    entity: EntityId,
    component: &'a T,
}

impl<'a, T> ComponentRef<'a, T> {
    /// The component's id in its pool.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The entity the component is attached to.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// The component's value, with the lifetime of the scene borrow.
    pub fn value(&self) -> &'a T {
        self.component
    }
}

impl<T> Clone for ComponentRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentRef<'_, T> {}

impl<T> Deref for ComponentRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.component
    }
}

impl<T: fmt::Debug> fmt::Debug for ComponentRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("id", &self.id)
            .field("entity", &self.entity)
            .field("component", self.component)
            .finish()
    }
}

/// A read view over the components of one type.
///
/// Iteration and search only see components whose owner is activated, in
/// ascending component id order.
pub struct Components<'a, T: Component> {
    pool: &'a ComponentPool<T>,
    entities: &'a EntityPool,
}

impl<'a, T: Component> Components<'a, T> {
    pub(crate) fn new(pool: &'a ComponentPool<T>, entities: &'a EntityPool) -> Self {
        Self { pool, entities }
    }

    /// The name the type was registered under.
    pub fn type_name(&self) -> &'a str {
        self.pool.type_name()
    }

    /// Iterates the visible components.
    pub fn iter(&self) -> impl Iterator<Item = ComponentRef<'a, T>> + 'a {
        let pool = self.pool;
        let entities = self.entities;
        pool.entries().filter(move |component| {
            entities
                .get(component.entity())
                .is_ok_and(|entity| entity.is_activated())
        })
    }

    /// Returns the first visible component matching `predicate`.
    pub fn find_first(
        &self,
        mut predicate: impl FnMut(&ComponentRef<'a, T>) -> bool,
    ) -> Option<ComponentRef<'a, T>> {
        self.iter().find(|component| predicate(component))
    }

    /// Returns every visible component matching `predicate`.
    pub fn find(
        &self,
        mut predicate: impl FnMut(&ComponentRef<'a, T>) -> bool,
    ) -> Vec<ComponentRef<'a, T>> {
        self.iter().filter(|component| predicate(component)).collect()
    }

    /// Resolves a component id, whether or not its owner is activated.
    ///
    /// Fails if the component was removed since the id was taken.
    pub fn get(&self, id: ComponentId) -> Result<ComponentRef<'a, T>, EcsError> {
        self.pool.get(id).ok_or_else(|| EcsError::InvalidComponent {
            id,
            type_name: self.pool.type_name().to_owned(),
        })
    }

    /// Returns the number of visible components.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no component is visible.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
