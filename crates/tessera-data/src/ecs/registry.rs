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

use std::any::{self, Any, TypeId};
use std::collections::HashMap;

use tessera_core::ecs::EntityId;
use tessera_core::scene::{DecodeError, EncodeError, Payload, SceneFormat};

use crate::ecs::{
    component::Component,
    component_pool::{ComponentEventKind, ComponentPool},
    error::EcsError,
};

/// The type-erased face of a [`ComponentPool`].
///
/// The scene holds pools of different component types side by side and drives
/// them through this interface whenever it only knows an entity (refresh,
/// cloning, destruction) or a type name (decoding).
pub(crate) trait ErasedPool: Any {
    fn type_name(&self) -> &str;

    fn notify(&mut self, kind: ComponentEventKind, entity: EntityId, reported: EntityId);

    /// Drops the component of `entity`, if any, firing Remove when `activated`.
    fn discard(&mut self, entity: EntityId, reported: EntityId, activated: bool);

    /// Copies the component of `source`, if any, onto `dest`.
    fn clone_onto(
        &mut self,
        source: EntityId,
        dest: EntityId,
        activated: bool,
    ) -> Result<(), EcsError>;

    fn encode(&self, entity: EntityId, format: SceneFormat) -> Result<Option<Payload>, EncodeError>;

    fn decode(
        &mut self,
        entity: EntityId,
        payload: &Payload,
        activated: bool,
    ) -> Result<(), DecodeError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedPool for ComponentPool<T> {
    fn type_name(&self) -> &str {
        ComponentPool::type_name(self)
    }

    fn notify(&mut self, kind: ComponentEventKind, entity: EntityId, reported: EntityId) {
        ComponentPool::notify(self, kind, entity, reported);
    }

    fn discard(&mut self, entity: EntityId, reported: EntityId, activated: bool) {
        if self.id_of(entity).is_some() {
            // Presence was checked above, so removal cannot fail.
            let _ = self.remove(entity, reported, activated);
        }
    }

    fn clone_onto(
        &mut self,
        source: EntityId,
        dest: EntityId,
        activated: bool,
    ) -> Result<(), EcsError> {
        match self.get_for(source).cloned() {
            Some(value) => self.insert(dest, value, activated).map(|_| ()),
            None => Ok(()),
        }
    }

    fn encode(
        &self,
        entity: EntityId,
        format: SceneFormat,
    ) -> Result<Option<Payload>, EncodeError> {
        let Some(value) = self.get_for(entity) else {
            return Ok(None);
        };
        Payload::encode(format, value)
            .map(Some)
            .map_err(|error| EncodeError::Component {
                type_name: self.type_name().to_owned(),
                message: error.to_string(),
            })
    }

    fn decode(
        &mut self,
        entity: EntityId,
        payload: &Payload,
        activated: bool,
    ) -> Result<(), DecodeError> {
        let value: T = payload
            .decode()
            .map_err(|error| DecodeError::Component {
                type_name: ComponentPool::type_name(self).to_owned(),
                message: error.to_string(),
            })?;
        self.insert(entity, value, activated)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Holds one pool per registered component type.
///
/// Pools are kept in registration order, which is the order Add and Remove
/// events fire in for a given entity and the order components are encoded in.
/// They are reachable by Rust type for typed access and by registered name for
/// decoding.
#[derive(Default)]
pub(crate) struct ComponentRegistry {
    pools: Vec<Box<dyn ErasedPool>>,
    by_type: HashMap<TypeId, usize>,
    by_name: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Registers `T` under `name`. Both the type and the name must be new.
    pub(crate) fn register<T: Component>(&mut self, name: &str) -> Result<(), EcsError> {
        if self.by_type.contains_key(&TypeId::of::<T>()) {
            return Err(EcsError::DuplicateRegistration(
                any::type_name::<T>().to_owned(),
            ));
        }
        if self.by_name.contains_key(name) {
            return Err(EcsError::DuplicateRegistration(name.to_owned()));
        }

        let index = self.pools.len();
        self.pools.push(Box::new(ComponentPool::<T>::new(name)));
        self.by_type.insert(TypeId::of::<T>(), index);
        self.by_name.insert(name.to_owned(), index);
        Ok(())
    }

    pub(crate) fn pool<T: Component>(&self) -> Result<&ComponentPool<T>, EcsError> {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|&index| self.pools[index].as_any().downcast_ref::<ComponentPool<T>>())
            .ok_or_else(unregistered::<T>)
    }

    pub(crate) fn pool_mut<T: Component>(&mut self) -> Result<&mut ComponentPool<T>, EcsError> {
        match self.by_type.get(&TypeId::of::<T>()) {
            Some(&index) => self.pools[index]
                .as_any_mut()
                .downcast_mut::<ComponentPool<T>>()
                .ok_or_else(unregistered::<T>),
            None => Err(unregistered::<T>()),
        }
    }

    pub(crate) fn by_name_mut(&mut self, name: &str) -> Option<&mut dyn ErasedPool> {
        let index = *self.by_name.get(name)?;
        Some(self.pools[index].as_mut())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn ErasedPool> + '_ {
        self.pools.iter().map(|pool| pool.as_ref())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut dyn ErasedPool> + '_ {
        self.pools.iter_mut().map(|pool| pool.as_mut())
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.pools.iter().map(|pool| pool.type_name())
    }
}

fn unregistered<T: Component>() -> EcsError {
    EcsError::UnregisteredComponent(any::type_name::<T>().to_owned())
}
