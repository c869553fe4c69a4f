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

//! Implements the scene runtime: pooled entities, typed component pools and the
//! deferred activation/destruction protocol that ties them together.
//!
//! The primary entry point is the [`Scene`] struct. Entities are addressed by
//! [`EntityId`](tessera_core::ecs::EntityId); holding an id across a refresh is
//! safe because every dereference checks the generation. For a reference that can
//! report its own invalidation, take an [`EntityHandle`].
//!
//! Pools are not snapshots. Iterating while mutating is ruled out by the borrow
//! checker: iteration borrows the scene, so callers collect ids first and then
//! mutate, or enqueue activation/destruction which only takes effect on refresh.

mod component;
mod component_pool;
mod entity;
mod entity_pool;
mod error;
mod handle;
mod persistence;
mod registry;
mod scene;
mod view;

pub use component::Component;
pub use component_pool::{ComponentEvent, ComponentEventKind, ComponentRef, Components};
pub use entity::{ActivationState, Entity, EntityEvent, EntityEventKind};
pub use entity_pool::EntityPool;
pub use error::EcsError;
pub use handle::EntityHandle;
pub use scene::Scene;
pub use view::{Ancestors, Children, Descendants, EntityRef};

#[cfg(test)]
mod tests;
