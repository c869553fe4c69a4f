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

//! Encoding a scene to, and decoding it from, a [`SceneDocument`].

use tessera_core::ecs::EntityId;
use tessera_core::scene::{
    DecodeError, EncodeError, EntityDocument, Payload, SceneDocument, SceneFormat,
};

use crate::ecs::{entity::Entity, scene::Scene};

impl Scene {
    /// Encodes every activated, non-transient root entity and its subtree.
    ///
    /// Transient entities are skipped together with everything below them.
    /// Components are written under their registered names, in registration
    /// order.
    pub fn encode(&self, format: SceneFormat) -> Result<Vec<u8>, EncodeError> {
        let mut document = SceneDocument::new();
        for entity in self.pool.iter() {
            if entity.parent().is_none() && !entity.is_transient() {
                document.entities.push(self.encode_entity(entity, format)?);
            }
        }
        log::debug!(
            "Encoding {} entities of {} as {format:?}.",
            document.entity_count(),
            self.id()
        );
        document.to_bytes(format)
    }

    fn encode_entity(
        &self,
        entity: &Entity,
        format: SceneFormat,
    ) -> Result<EntityDocument<Payload>, EncodeError> {
        let mut document = EntityDocument::new();
        document.name = entity.name().map(str::to_owned);

        for pool in self.registry.iter() {
            if let Some(payload) = pool.encode(entity.id(), format)? {
                document.components.insert(pool.type_name(), payload);
            }
        }
        for &child in entity.children() {
            if let Ok(child) = self.pool.get(child) {
                if !child.is_transient() {
                    document.children.push(self.encode_entity(child, format)?);
                }
            }
        }
        Ok(document)
    }

    /// Decodes entities into this scene, then activates them.
    ///
    /// Every component type named in the input must be registered. Each root
    /// entity is created with its components and children, every root is
    /// activated, and the scene is refreshed. On error the decode stops where it
    /// is and the scene must be discarded.
    pub fn decode(&mut self, format: SceneFormat, bytes: &[u8]) -> Result<(), DecodeError> {
        let result = self.decode_document(format, bytes);
        if let Err(error) = &result {
            log::warn!("Decoding a {format:?} scene into {} failed: {error}", self.id());
        }
        result
    }

    fn decode_document(&mut self, format: SceneFormat, bytes: &[u8]) -> Result<(), DecodeError> {
        let document = SceneDocument::from_bytes(bytes, format)?;
        let mut roots = Vec::with_capacity(document.entities.len());
        for entity in document.entities {
            roots.push(self.decode_entity(entity)?);
        }
        for root in roots {
            self.activate(root)?;
        }
        self.refresh();
        Ok(())
    }

    fn decode_entity(
        &mut self,
        document: EntityDocument<Payload>,
    ) -> Result<EntityId, DecodeError> {
        let id = self.create_entity_with_name(document.name);

        for (type_name, payload) in document.components {
            let pool = self
                .registry
                .by_name_mut(&type_name)
                .ok_or_else(|| DecodeError::UnregisteredComponent(type_name.clone()))?;
            pool.decode(id, &payload, false)?;
        }
        for child in document.children {
            let child = self.decode_entity(child)?;
            self.add_child(id, child)?;
        }
        Ok(id)
    }
}
