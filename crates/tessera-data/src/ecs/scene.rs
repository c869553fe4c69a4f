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

//! The scene: entity pool, component pools and the deferred lifecycle.

use std::any;
use std::fmt;
use std::mem;
use std::rc::Rc;

use tessera_core::ecs::{ComponentId, EntityId, SceneId};
use tessera_core::event::{Dispatcher, ListenerId};

use crate::ecs::{
    component::Component,
    component_pool::{ComponentEvent, ComponentEventKind, Components},
    entity::{ActivationState, EntityEvent, EntityEventKind},
    entity_pool::EntityPool,
    error::EcsError,
    handle::{EntityHandle, HandleContext},
    registry::ComponentRegistry,
    view::EntityRef,
};

/// A graph of entities and the components attached to them.
///
/// Entities are created inert. They can be named, given components and
/// children, and then queued for activation with [`Scene::activate`] or for
/// destruction with [`Scene::destroy`]. Queued work is applied by
/// [`Scene::refresh`], in request order, together with the events it causes.
/// Only activated entities are visible to iteration, and only their components
/// produce Add and Remove events.
pub struct Scene {
    id: SceneId,
    pub(crate) pool: EntityPool,
    pub(crate) registry: ComponentRegistry,
    created: Vec<EntityId>,
    pending_activation: Vec<EntityId>,
    pending_destruction: Vec<EntityId>,
    entity_count: usize,
    entity_events: Dispatcher<dyn FnMut(&EntityEvent)>,
}

impl Scene {
    /// Creates an empty scene with no registered component types.
    pub fn new() -> Self {
        let id = SceneId::next();
        log::debug!("Created {id}.");
        Self {
            id,
            pool: EntityPool::new(id),
            registry: ComponentRegistry::default(),
            created: Vec::new(),
            pending_activation: Vec::new(),
            pending_destruction: Vec::new(),
            entity_count: 0,
            entity_events: Dispatcher::new(),
        }
    }

    /// The id stamped on every entity of this scene.
    pub fn id(&self) -> SceneId {
        self.id
    }

    // --- Component types ---

    /// Registers component type `T` under `name`.
    ///
    /// The name identifies the type in encoded scenes, so it must be registered
    /// before a scene that uses it is decoded.
    pub fn register_component<T: Component>(&mut self, name: &str) -> Result<(), EcsError> {
        self.registry.register::<T>(name)?;
        log::debug!(
            "Registered component type '{name}' ({}) on {}.",
            any::type_name::<T>(),
            self.id
        );
        Ok(())
    }

    /// The registered type names, in registration order.
    pub fn component_type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.names()
    }

    // --- Entities ---

    /// Creates an inert entity.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.pool.create();
        self.created.push(id);
        log::trace!("Created entity {id}.");
        id
    }

    /// Creates an inert entity with a name.
    pub fn create_named_entity(&mut self, name: impl Into<String>) -> EntityId {
        self.create_entity_with_name(Some(name.into()))
    }

    pub(crate) fn create_entity_with_name(&mut self, name: Option<String>) -> EntityId {
        let id = self.create_entity();
        if let Ok(entity) = self.pool.get_mut(id) {
            entity.name = name;
        }
        id
    }

    /// Returns a view of a live entity.
    pub fn entity(&self, id: EntityId) -> Result<EntityRef<'_>, EcsError> {
        Ok(EntityRef::new(self, self.pool.get(id)?))
    }

    /// Returns `true` if `id` refers to a live entity of this scene.
    pub fn contains(&self, id: EntityId) -> bool {
        self.pool.contains(id)
    }

    /// The underlying entity pool.
    pub fn entity_pool(&self) -> &EntityPool {
        &self.pool
    }

    /// Iterates the activated entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> + '_ {
        self.pool
            .iter()
            .map(move |entity| EntityRef::new(self, entity))
    }

    /// The number of activated entities.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Returns the first activated entity matching `predicate`.
    pub fn find_first(
        &self,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Option<EntityId> {
        self.entities()
            .find(|entity| predicate(entity))
            .map(|entity| entity.id())
    }

    /// Returns every activated entity matching `predicate`, in ascending id order.
    pub fn find(&self, mut predicate: impl FnMut(&EntityRef<'_>) -> bool) -> Vec<EntityId> {
        self.entities()
            .filter(|entity| predicate(entity))
            .map(|entity| entity.id())
            .collect()
    }

    /// Names an entity.
    pub fn set_name(&mut self, id: EntityId, name: impl Into<String>) -> Result<(), EcsError> {
        self.pool.get_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Returns `true` if the entity is activated.
    pub fn is_activated(&self, id: EntityId) -> Result<bool, EcsError> {
        Ok(self.pool.get(id)?.is_activated())
    }

    /// Returns `true` if the entity is queued for activation.
    pub fn is_pending_activation(&self, id: EntityId) -> Result<bool, EcsError> {
        Ok(self.pool.get(id)?.is_pending_activation())
    }

    /// Returns `true` if the entity is queued for destruction.
    pub fn is_pending_destruction(&self, id: EntityId) -> Result<bool, EcsError> {
        Ok(self.pool.get(id)?.is_pending_destruction())
    }

    /// Returns `true` if the entity is excluded from persistence.
    pub fn is_transient(&self, id: EntityId) -> Result<bool, EcsError> {
        Ok(self.pool.get(id)?.is_transient())
    }

    /// Includes or excludes the entity, and with it its subtree, from persistence.
    pub fn set_transient(&mut self, id: EntityId, transient: bool) -> Result<(), EcsError> {
        self.pool.get_mut(id)?.transient = transient;
        Ok(())
    }

    /// The entity's parent, if any.
    pub fn parent(&self, id: EntityId) -> Result<Option<EntityId>, EcsError> {
        Ok(self.pool.get(id)?.parent())
    }

    /// The topmost ancestor of the entity, or the entity itself.
    pub fn root(&self, id: EntityId) -> Result<EntityId, EcsError> {
        Ok(self.entity(id)?.root().id())
    }

    /// The direct children of the entity, in child order.
    pub fn children(&self, id: EntityId) -> Result<&[EntityId], EcsError> {
        Ok(self.pool.get(id)?.children())
    }

    /// Returns `true` if the entity has at least one child.
    pub fn has_children(&self, id: EntityId) -> Result<bool, EcsError> {
        Ok(self.pool.get(id)?.has_children())
    }

    // --- Lifecycle ---

    /// Queues the entity and its whole subtree for activation, parents first.
    ///
    /// Descendants that are already activated or queued are left alone.
    pub fn activate(&mut self, id: EntityId) -> Result<(), EcsError> {
        match self.pool.get(id)?.state {
            ActivationState::Created => {}
            ActivationState::PendingActivation => {
                return Err(EcsError::AlreadyPendingActivation(id))
            }
            ActivationState::Activated
            | ActivationState::PendingDestruction {
                was_activated: true,
            } => return Err(EcsError::AlreadyActivated(id)),
            ActivationState::PendingDestruction {
                was_activated: false,
            } => return Err(EcsError::PendingDestruction(id)),
        }
        self.enqueue_activation(id);
        Ok(())
    }

    fn enqueue_activation(&mut self, id: EntityId) {
        let children = match self.pool.get_mut(id) {
            Ok(entity) if entity.state == ActivationState::Created => {
                entity.state = ActivationState::PendingActivation;
                entity.children.clone()
            }
            _ => return,
        };
        self.pending_activation.push(id);
        for child in children {
            self.enqueue_activation(child);
        }
    }

    /// Queues the entity and its whole subtree for destruction, children first.
    ///
    /// Descendants already queued for destruction are left alone.
    pub fn destroy(&mut self, id: EntityId) -> Result<(), EcsError> {
        if self.pool.get(id)?.is_pending_destruction() {
            return Err(EcsError::AlreadyPendingDestruction(id));
        }
        self.enqueue_destruction(id);
        Ok(())
    }

    /// Queues every direct child of the entity, and their subtrees, for destruction.
    pub fn destroy_all_children(&mut self, id: EntityId) -> Result<(), EcsError> {
        let children = self.pool.get(id)?.children.clone();
        for child in children {
            self.enqueue_destruction(child);
        }
        Ok(())
    }

    fn enqueue_destruction(&mut self, id: EntityId) {
        let children = match self.pool.get(id) {
            Ok(entity) if !entity.is_pending_destruction() => entity.children.clone(),
            _ => return,
        };
        for child in children {
            self.enqueue_destruction(child);
        }
        if let Ok(entity) = self.pool.get_mut(id) {
            entity.state = ActivationState::PendingDestruction {
                was_activated: entity.is_activated(),
            };
            self.pending_destruction.push(id);
        }
    }

    /// Returns `true` if a refresh has anything to do.
    pub fn has_pending_work(&self) -> bool {
        !(self.created.is_empty()
            && self.pending_activation.is_empty()
            && self.pending_destruction.is_empty())
    }

    /// Applies every queued creation notice, activation and destruction.
    ///
    /// Each pass delivers Create events, then activates queued entities in request
    /// order (Add events in registration order, then Activate), then destroys
    /// queued entities in request order (Destroy, then Remove events, then the
    /// slot is freed). Passes repeat until nothing is pending. Returns `false` if
    /// there was nothing to do.
    pub fn refresh(&mut self) -> bool {
        if !self.has_pending_work() {
            return false;
        }

        let (mut activated, mut destroyed) = (0, 0);
        while self.has_pending_work() {
            self.dispatch_creation_events();
            activated += self.activate_pending_entities();
            destroyed += self.destroy_pending_entities();
        }
        log::debug!(
            "Refreshed {}: {activated} activated, {destroyed} destroyed, {} active.",
            self.id,
            self.entity_count
        );
        true
    }

    fn dispatch_creation_events(&mut self) {
        for id in mem::take(&mut self.created) {
            if self.pool.contains(id) {
                self.entity_events.dispatch(&EntityEvent {
                    kind: EntityEventKind::Create,
                    entity: id,
                });
            }
        }
    }

    fn activate_pending_entities(&mut self) -> usize {
        let mut count = 0;
        for id in mem::take(&mut self.pending_activation) {
            match self.pool.get_mut(id) {
                Ok(entity) if entity.state == ActivationState::PendingActivation => {
                    entity.state = ActivationState::Activated;
                }
                // Destroyed before it could be activated.
                _ => continue,
            }
            self.entity_count += 1;
            count += 1;

            for pool in self.registry.iter_mut() {
                pool.notify(ComponentEventKind::Add, id, id);
            }
            self.entity_events.dispatch(&EntityEvent {
                kind: EntityEventKind::Activate,
                entity: id,
            });
            log::trace!("Activated entity {id}.");
        }
        count
    }

    fn destroy_pending_entities(&mut self) -> usize {
        let mut count = 0;
        for id in mem::take(&mut self.pending_destruction) {
            let Ok(entity) = self.pool.get(id) else {
                log::warn!("Entity {id} was queued for destruction but is already gone.");
                continue;
            };
            let activated = entity.is_activated();
            let parent = entity.parent;
            if let Some(handle) = &entity.handle {
                handle.invalidate();
            }

            self.entity_events.dispatch(&EntityEvent {
                kind: EntityEventKind::Destroy,
                entity: id,
            });
            for pool in self.registry.iter_mut() {
                pool.discard(id, EntityId::INVALID, activated);
            }
            if let Some(parent) = parent.and_then(|parent| self.pool.get_mut(parent).ok()) {
                parent.children.retain(|child| *child != id);
            }
            if activated {
                self.entity_count -= 1;
            }

            if let Ok(record) = self.pool.destroy(id) {
                for orphan in record.children {
                    if let Ok(orphan) = self.pool.get_mut(orphan) {
                        orphan.parent = None;
                    }
                }
            }
            count += 1;
            log::trace!("Destroyed entity {id}.");
        }
        count
    }

    // --- Hierarchy ---

    /// Makes `child` the last child of `parent`.
    ///
    /// The child must be unparented and from this scene, the parent must not be
    /// pending destruction, and both must agree on being activated (or queued for
    /// activation) versus inert.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EcsError> {
        for id in [parent, child] {
            if id.scene != self.id {
                return Err(EcsError::ForeignScene(id));
            }
        }
        let parent_entity = self.pool.get(parent)?;
        let child_entity = self.pool.get(child)?;

        if child_entity.parent.is_some() {
            return Err(EcsError::ChildHasParent(child));
        }
        if parent_entity.is_pending_destruction() {
            return Err(EcsError::PendingDestruction(parent));
        }
        if child_entity.is_pending_destruction() {
            return Err(EcsError::PendingDestruction(child));
        }
        if parent_entity.is_live() != child_entity.is_live() {
            return Err(EcsError::ActivationMismatch { parent, child });
        }
        if parent == child || self.entity(parent)?.ancestors().any(|a| a.id() == child) {
            return Err(EcsError::HierarchyCycle { parent, child });
        }

        self.pool.get_mut(child)?.parent = Some(parent);
        self.pool.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detaches `child` from `parent`, keeping the order of the remaining children.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EcsError> {
        for id in [parent, child] {
            if id.scene != self.id {
                return Err(EcsError::ForeignScene(id));
            }
        }
        self.pool.get(parent)?;
        if self.pool.get(child)?.parent != Some(parent) {
            return Err(EcsError::NotAChild { parent, child });
        }

        self.pool.get_mut(parent)?.children.retain(|id| *id != child);
        self.pool.get_mut(child)?.parent = None;
        Ok(())
    }

    /// Deep-copies the entity, its components and its subtree into new inert
    /// entities, and returns the copy of `source`.
    ///
    /// Names and the transient flag are copied; activation state is not.
    pub fn clone_entity(&mut self, source: EntityId) -> Result<EntityId, EcsError> {
        let entity = self.pool.get(source)?;
        let name = entity.name.clone();
        let transient = entity.transient;
        let children = entity.children.clone();

        let clone = self.create_entity_with_name(name);
        self.pool.get_mut(clone)?.transient = transient;
        for pool in self.registry.iter_mut() {
            pool.clone_onto(source, clone, false)?;
        }
        for child in children {
            let child_clone = self.clone_entity(child)?;
            self.add_child(clone, child_clone)?;
        }
        log::trace!("Cloned entity {source} into {clone}.");
        Ok(clone)
    }

    // --- Search ---

    /// Returns the first direct child matching `predicate`.
    pub fn find_first_child(
        &self,
        id: EntityId,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Result<Option<EntityId>, EcsError> {
        Ok(self
            .entity(id)?
            .children()
            .find(|entity| predicate(entity))
            .map(|entity| entity.id()))
    }

    /// Returns every direct child matching `predicate`, in child order.
    pub fn find_children(
        &self,
        id: EntityId,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Result<Vec<EntityId>, EcsError> {
        Ok(self
            .entity(id)?
            .children()
            .filter(|entity| predicate(entity))
            .map(|entity| entity.id())
            .collect())
    }

    /// Returns the first descendant matching `predicate`, searching in pre-order.
    pub fn find_first_descendant(
        &self,
        id: EntityId,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Result<Option<EntityId>, EcsError> {
        Ok(self
            .entity(id)?
            .descendants()
            .find(|entity| predicate(entity))
            .map(|entity| entity.id()))
    }

    /// Returns every descendant matching `predicate`, in pre-order.
    pub fn find_descendants(
        &self,
        id: EntityId,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Result<Vec<EntityId>, EcsError> {
        Ok(self
            .entity(id)?
            .descendants()
            .filter(|entity| predicate(entity))
            .map(|entity| entity.id())
            .collect())
    }

    /// Returns the nearest ancestor matching `predicate`.
    pub fn find_first_ancestor(
        &self,
        id: EntityId,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Result<Option<EntityId>, EcsError> {
        Ok(self
            .entity(id)?
            .ancestors()
            .find(|entity| predicate(entity))
            .map(|entity| entity.id()))
    }

    /// Returns every ancestor matching `predicate`, nearest first.
    pub fn find_ancestors(
        &self,
        id: EntityId,
        mut predicate: impl FnMut(&EntityRef<'_>) -> bool,
    ) -> Result<Vec<EntityId>, EcsError> {
        Ok(self
            .entity(id)?
            .ancestors()
            .filter(|entity| predicate(entity))
            .map(|entity| entity.id())
            .collect())
    }

    // --- Components ---

    /// Attaches a component. Fires Add right away if the entity is activated,
    /// otherwise when the entity gets activated.
    pub fn add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<ComponentId, EcsError> {
        let activated = self.pool.get(id)?.is_activated();
        self.registry
            .pool_mut::<T>()?
            .insert(id, component, activated)
    }

    /// Replaces the value of the entity's component in place, keeping its id.
    /// Fires Remove then Add if the entity is activated. Attaches the component
    /// if the entity has none.
    pub fn replace_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<ComponentId, EcsError> {
        let activated = self.pool.get(id)?.is_activated();
        self.registry
            .pool_mut::<T>()?
            .replace(id, component, activated)
    }

    /// Detaches and returns the entity's component. Fires Remove first if the
    /// entity is activated.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Result<T, EcsError> {
        let activated = self.pool.get(id)?.is_activated();
        self.registry.pool_mut::<T>()?.remove(id, id, activated)
    }

    /// The entity's component of type `T`.
    pub fn component<T: Component>(&self, id: EntityId) -> Result<&T, EcsError> {
        self.pool.get(id)?;
        let pool = self.registry.pool::<T>()?;
        pool.get_for(id).ok_or_else(|| EcsError::MissingComponent {
            entity: id,
            type_name: pool.type_name().to_owned(),
        })
    }

    /// Mutable access to the entity's component of type `T`. No event fires.
    pub fn component_mut<T: Component>(&mut self, id: EntityId) -> Result<&mut T, EcsError> {
        self.pool.get(id)?;
        let pool = self.registry.pool_mut::<T>()?;
        let type_name = pool.type_name().to_owned();
        pool.get_for_mut(id).ok_or(EcsError::MissingComponent {
            entity: id,
            type_name,
        })
    }

    /// The id of the entity's component of type `T`.
    pub fn component_id<T: Component>(&self, id: EntityId) -> Result<ComponentId, EcsError> {
        self.pool.get(id)?;
        let pool = self.registry.pool::<T>()?;
        pool.id_of(id).ok_or_else(|| EcsError::MissingComponent {
            entity: id,
            type_name: pool.type_name().to_owned(),
        })
    }

    /// Returns `true` if the entity has a component of type `T`.
    pub fn has_component<T: Component>(&self, id: EntityId) -> Result<bool, EcsError> {
        self.pool.get(id)?;
        Ok(self.registry.pool::<T>()?.id_of(id).is_some())
    }

    /// A view over the components of type `T` whose entities are activated.
    pub fn components<T: Component>(&self) -> Result<Components<'_, T>, EcsError> {
        Ok(Components::new(self.registry.pool::<T>()?, &self.pool))
    }

    // --- Events ---

    /// Registers a listener for Add and Remove events of components of type `T`.
    pub fn add_component_listener<T: Component>(
        &mut self,
        listener: impl FnMut(&ComponentEvent<'_, T>) + 'static,
    ) -> Result<ListenerId, EcsError> {
        Ok(self.registry.pool_mut::<T>()?.add_listener(listener))
    }

    /// Unregisters a component listener. Returns `false` if it was not registered.
    pub fn remove_component_listener<T: Component>(
        &mut self,
        listener: ListenerId,
    ) -> Result<bool, EcsError> {
        Ok(self.registry.pool_mut::<T>()?.remove_listener(listener))
    }

    /// Registers a listener for entity lifecycle events.
    pub fn add_entity_listener(
        &mut self,
        listener: impl FnMut(&EntityEvent) + 'static,
    ) -> ListenerId {
        self.entity_events.add(Box::new(listener))
    }

    /// Unregisters an entity listener. Returns `false` if it was not registered.
    pub fn remove_entity_listener(&mut self, listener: ListenerId) -> bool {
        self.entity_events.remove(listener)
    }

    // --- Handles ---

    /// Returns a handle to the entity. All handles to one entity share state.
    pub fn handle(&mut self, id: EntityId) -> Result<EntityHandle, EcsError> {
        let entity = self.pool.get_mut(id)?;
        let context = entity
            .handle
            .get_or_insert_with(|| Rc::new(HandleContext::new(id)));
        Ok(EntityHandle::new(Rc::clone(context)))
    }

    /// Resolves a handle to a view of its entity.
    pub fn resolve(&self, handle: &EntityHandle) -> Result<EntityRef<'_>, EcsError> {
        self.entity(handle.id()?)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        for entity in self.pool.records() {
            if let Some(handle) = &entity.handle {
                handle.invalidate();
            }
        }
        log::debug!("Dropped {} with {} live entities.", self.id, self.pool.len());
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("entities", &self.pool.len())
            .field("activated", &self.entity_count)
            .field(
                "component_types",
                &self.component_type_names().collect::<Vec<_>>(),
            )
            .finish()
    }
}
