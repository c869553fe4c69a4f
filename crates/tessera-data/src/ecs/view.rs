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

//! Read-only views of entities and their hierarchy.

use std::fmt;

use tessera_core::ecs::EntityId;

use crate::ecs::{
    component::Component,
    entity::{ActivationState, Entity},
    error::EcsError,
    scene::Scene,
};

/// A borrowed view of one live entity.
///
/// While the view exists the scene is borrowed, so the entity cannot be freed
/// underneath it. Search predicates receive these views.
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    scene: &'a Scene,
    entity: &'a Entity,
}

impl<'a> EntityRef<'a> {
    pub(crate) fn new(scene: &'a Scene, entity: &'a Entity) -> Self {
        Self { scene, entity }
    }

    /// The entity's id.
    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// The entity's name, if any.
    pub fn name(&self) -> Option<&'a str> {
        self.entity.name()
    }

    /// The underlying record.
    pub fn record(&self) -> &'a Entity {
        self.entity
    }

    /// The lifecycle state.
    pub fn state(&self) -> ActivationState {
        self.entity.state()
    }

    /// See [`Entity::is_activated`].
    pub fn is_activated(&self) -> bool {
        self.entity.is_activated()
    }

    /// See [`Entity::is_pending_activation`].
    pub fn is_pending_activation(&self) -> bool {
        self.entity.is_pending_activation()
    }

    /// See [`Entity::is_pending_destruction`].
    pub fn is_pending_destruction(&self) -> bool {
        self.entity.is_pending_destruction()
    }

    /// See [`Entity::is_transient`].
    pub fn is_transient(&self) -> bool {
        self.entity.is_transient()
    }

    /// The parent, if the entity is parented.
    pub fn parent(&self) -> Option<EntityRef<'a>> {
        let parent = self.entity.parent()?;
        self.scene.entity(parent).ok()
    }

    /// The topmost ancestor, or the entity itself if it has no parent.
    pub fn root(&self) -> EntityRef<'a> {
        self.ancestors().last().unwrap_or(*self)
    }

    /// Returns `true` if the entity has at least one child.
    pub fn has_children(&self) -> bool {
        self.entity.has_children()
    }

    /// The direct children, in child order.
    pub fn children(&self) -> Children<'a> {
        Children {
            scene: self.scene,
            ids: self.entity.children().iter(),
        }
    }

    /// The whole subtree below the entity, parents before their children.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            scene: self.scene,
            stack: self.entity.children().iter().rev().copied().collect(),
        }
    }

    /// The ancestors, nearest first, excluding the entity itself.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            scene: self.scene,
            next: self.entity.parent(),
        }
    }

    /// The entity's component of type `T`.
    pub fn component<T: Component>(&self) -> Result<&'a T, EcsError> {
        self.scene.component::<T>(self.id())
    }

    /// Returns `true` if the entity has a component of type `T`.
    pub fn has_component<T: Component>(&self) -> Result<bool, EcsError> {
        self.scene.has_component::<T>(self.id())
    }
}

impl PartialEq for EntityRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.scene, other.scene) && self.id() == other.id()
    }
}

impl Eq for EntityRef<'_> {}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}

/// Iterates the direct children of an entity.
pub struct Children<'a> {
    scene: &'a Scene,
    ids: std::slice::Iter<'a, EntityId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = EntityRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let scene = self.scene;
        self.ids.by_ref().find_map(|&id| scene.entity(id).ok())
    }
}

/// Iterates a subtree in pre-order.
pub struct Descendants<'a> {
    scene: &'a Scene,
    stack: Vec<EntityId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = EntityRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Ok(entity) = self.scene.entity(id) {
                self.stack
                    .extend(entity.record().children().iter().rev().copied());
                return Some(entity);
            }
        }
        None
    }
}

/// Walks from an entity's parent up to the root.
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<EntityId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = EntityRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.scene.entity(self.next?).ok()?;
        self.next = entity.record().parent();
        Some(entity)
    }
}
