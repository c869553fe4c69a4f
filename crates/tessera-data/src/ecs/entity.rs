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

use std::rc::Rc;

use tessera_core::ecs::EntityId;

use crate::ecs::handle::HandleContext;

/// Where an entity is on its lifecycle.
///
/// The lifecycle only moves forward: `Created` to `PendingActivation` to
/// `Activated` to `PendingDestruction`, after which the slot is freed. `Created`
/// and `PendingActivation` may also go straight to `PendingDestruction`, in which
/// case the entity is never activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    /// Freshly created, not queued for anything.
    #[default]
    Created,
    /// Queued for activation by the next refresh.
    PendingActivation,
    /// Visible to iteration and to component listeners.
    Activated,
    /// Queued for destruction by the next refresh.
    PendingDestruction {
        /// Whether the entity was activated when the destruction was requested.
        /// Such an entity stays visible until its slot is freed.
        was_activated: bool,
    },
}

/// The record of one entity, owned by its slot in the [`EntityPool`](super::EntityPool).
///
/// The record holds no component data. Parent and children are plain ids into
/// the same pool, kept consistent on both sides by the scene.
#[derive(Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) state: ActivationState,
    pub(crate) transient: bool,
    pub(crate) handle: Option<Rc<HandleContext>>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            name: None,
            parent: None,
            children: Vec::new(),
            state: ActivationState::Created,
            transient: false,
            handle: None,
        }
    }

    /// The entity's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The parent's id, if the entity is parented.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// The direct children, in child order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Returns `true` if the entity has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The lifecycle state.
    pub fn state(&self) -> ActivationState {
        self.state
    }

    /// Returns `true` if the entity is visible to iteration and listeners.
    ///
    /// An activated entity that is pending destruction is still activated until
    /// the refresh that frees it.
    pub fn is_activated(&self) -> bool {
        matches!(
            self.state,
            ActivationState::Activated
                | ActivationState::PendingDestruction {
                    was_activated: true
                }
        )
    }

    /// Returns `true` if the entity is queued for activation.
    pub fn is_pending_activation(&self) -> bool {
        self.state == ActivationState::PendingActivation
    }

    /// Returns `true` if the entity is queued for destruction.
    pub fn is_pending_destruction(&self) -> bool {
        matches!(self.state, ActivationState::PendingDestruction { .. })
    }

    /// Returns `true` if the entity is excluded from persistence.
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    // Activated or on its way there; a child must agree with its parent on this.
    pub(crate) fn is_live(&self) -> bool {
        self.is_activated() || self.is_pending_activation()
    }
}

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityEventKind {
    /// The entity was created. Delivered at the start of the next refresh.
    Create,
    /// The entity was activated, after its components' Add events.
    Activate,
    /// The entity is about to be freed, before its components' Remove events.
    Destroy,
}

/// A lifecycle notification for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityEvent {
    /// What happened.
    pub kind: EntityEventKind,
    /// The entity it happened to.
    pub entity: EntityId,
}
