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

//! Errors raised by scene operations.

use tessera_core::ecs::{ComponentId, EntityId};
use tessera_core::scene::DecodeError;
use thiserror::Error;

/// An invalid operation on a scene.
///
/// Every variant is a contract violation reported at the call site. Nothing is
/// retried and nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The id does not refer to an occupied slot of this scene.
    #[error("entity {0} is not in the scene")]
    InvalidEntity(EntityId),
    /// The handle's entity has been destroyed.
    #[error("entity handle is no longer valid")]
    InvalidHandle,
    /// The id does not refer to an occupied component slot.
    #[error("component {id} of type '{type_name}' does not exist")]
    InvalidComponent {
        /// The stale or unknown id.
        id: ComponentId,
        /// The registered name of the component type.
        type_name: String,
    },
    /// The entity is already activated.
    #[error("entity {0} is already activated")]
    AlreadyActivated(EntityId),
    /// The entity is already queued for activation.
    #[error("entity {0} is already pending activation")]
    AlreadyPendingActivation(EntityId),
    /// The entity is already queued for destruction.
    #[error("entity {0} is already pending destruction")]
    AlreadyPendingDestruction(EntityId),
    /// The entity is queued for destruction and cannot take part in the operation.
    #[error("entity {0} is pending destruction")]
    PendingDestruction(EntityId),
    /// The would-be child is already parented.
    #[error("entity {0} already has a parent")]
    ChildHasParent(EntityId),
    /// The entity was allocated by another scene.
    #[error("entity {0} belongs to another scene")]
    ForeignScene(EntityId),
    /// Parent and child disagree on whether they are activated.
    #[error("activation state of child {child} does not match parent {parent}")]
    ActivationMismatch {
        /// The parent.
        parent: EntityId,
        /// The rejected child.
        child: EntityId,
    },
    /// The child would become its own ancestor.
    #[error("entity {child} is an ancestor of {parent}")]
    HierarchyCycle {
        /// The parent.
        parent: EntityId,
        /// The rejected child.
        child: EntityId,
    },
    /// The entity is not a child of the given parent.
    #[error("entity {child} is not a child of {parent}")]
    NotAChild {
        /// The supposed parent.
        parent: EntityId,
        /// The entity that is not its child.
        child: EntityId,
    },
    /// The entity already has a component of this type.
    #[error("entity {entity} already has a component of type '{type_name}'")]
    DuplicateComponent {
        /// The entity.
        entity: EntityId,
        /// The registered name of the component type.
        type_name: String,
    },
    /// The entity has no component of this type.
    #[error("entity {entity} does not have a component of type '{type_name}'")]
    MissingComponent {
        /// The entity.
        entity: EntityId,
        /// The registered name of the component type.
        type_name: String,
    },
    /// The component type was never registered on the scene.
    #[error("component type '{0}' is not registered")]
    UnregisteredComponent(String),
    /// The component type or its name is already registered.
    #[error("component type '{0}' is already registered")]
    DuplicateRegistration(String),
}

impl From<EcsError> for DecodeError {
    fn from(error: EcsError) -> Self {
        DecodeError::Rejected(error.to_string())
    }
}
