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

//! Defines the intermediate tree a scene is encoded to and decoded from.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{DecodeError, EncodeError, Payload, SceneFormat};

/// A whole scene: its root entities, in encoding order.
///
/// `P` is the component body type. While walking a scene the body is a
/// [`Payload`]; on the wire it is the format's native body (`serde_json::Value`
/// or bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument<P> {
    /// The root entities. Children are nested inside their parent.
    pub entities: Vec<EntityDocument<P>>,
}

/// One entity and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de>"))]
pub struct EntityDocument<P> {
    /// The entity's name, if it has one.
    #[serde(default)]
    pub name: Option<String>,
    /// The attached components, keyed by registered type name.
    #[serde(default)]
    pub components: ComponentMap<P>,
    /// The direct children, in child order.
    #[serde(default)]
    pub children: Vec<EntityDocument<P>>,
}

/// Component bodies keyed by registered type name, in insertion order.
///
/// Serialized as a map. Duplicate names are rejected when reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMap<P> {
    entries: Vec<(String, P)>,
}

impl<P> SceneDocument<P> {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Counts every entity in the document, nested children included.
    pub fn entity_count(&self) -> usize {
        self.entities.iter().map(EntityDocument::subtree_len).sum()
    }

    /// Converts every component body, failing on the first error.
    pub fn try_map<Q, E>(
        self,
        mut f: impl FnMut(P) -> Result<Q, E>,
    ) -> Result<SceneDocument<Q>, E> {
        let entities = self
            .entities
            .into_iter()
            .map(|entity| entity.try_map(&mut f))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(SceneDocument { entities })
    }
}

impl<P> Default for SceneDocument<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneDocument<Payload> {
    /// Writes the document in `format`.
    ///
    /// Every payload must have been encoded for the same format.
    pub fn to_bytes(self, format: SceneFormat) -> Result<Vec<u8>, EncodeError> {
        match format {
            SceneFormat::Json => {
                let document = self.try_map(|payload| match payload {
                    Payload::Json(value) => Ok(value),
                    Payload::Binary(_) => Err(EncodeError::PayloadMismatch(format)),
                })?;
                Ok(serde_json::to_vec_pretty(&document)?)
            }
            SceneFormat::Binary => {
                let document = self.try_map(|payload| match payload {
                    Payload::Binary(bytes) => Ok(bytes),
                    Payload::Json(_) => Err(EncodeError::PayloadMismatch(format)),
                })?;
                Ok(bincode::serde::encode_to_vec(
                    &document,
                    bincode::config::standard(),
                )?)
            }
        }
    }

    /// Reads a document written by [`SceneDocument::to_bytes`] in `format`.
    pub fn from_bytes(bytes: &[u8], format: SceneFormat) -> Result<Self, DecodeError> {
        match format {
            SceneFormat::Json => {
                let document: SceneDocument<serde_json::Value> = serde_json::from_slice(bytes)?;
                document.try_map(|value| Ok(Payload::Json(value)))
            }
            SceneFormat::Binary => {
                let (document, read): (SceneDocument<Vec<u8>>, usize) =
                    bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
                if read != bytes.len() {
                    return Err(DecodeError::TrailingBytes(bytes.len() - read));
                }
                document.try_map(|body| Ok(Payload::Binary(body)))
            }
        }
    }
}

impl<P> EntityDocument<P> {
    /// Creates an unnamed entity with no components and no children.
    pub fn new() -> Self {
        Self {
            name: None,
            components: ComponentMap::new(),
            children: Vec::new(),
        }
    }

    fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(EntityDocument::subtree_len)
            .sum::<usize>()
    }

    fn try_map<Q, E, F>(self, f: &mut F) -> Result<EntityDocument<Q>, E>
    where
        F: FnMut(P) -> Result<Q, E>,
    {
        let components = self
            .components
            .entries
            .into_iter()
            .map(|(name, body)| Ok((name, f(body)?)))
            .collect::<Result<Vec<_>, E>>()?;
        let children = self
            .children
            .into_iter()
            .map(|child| child.try_map(f))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(EntityDocument {
            name: self.name,
            components: ComponentMap {
                entries: components,
            },
            children,
        })
    }
}

impl<P> Default for EntityDocument<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ComponentMap<P> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a body, replacing any body already stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, body: P) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = body,
            None => self.entries.push((name, body)),
        }
    }

    /// Returns the body stored under `name`.
    pub fn get(&self, name: &str) -> Option<&P> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, body)| body)
    }

    /// Returns `true` if a body is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates `(name, body)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &P)> + '_ {
        self.entries.iter().map(|(name, body)| (name.as_str(), body))
    }

    /// Returns the number of bodies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no body.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P> Default for ComponentMap<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> IntoIterator for ComponentMap<P> {
    type Item = (String, P);
    type IntoIter = std::vec::IntoIter<(String, P)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<P: Serialize> Serialize for ComponentMap<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, body) in &self.entries {
            map.serialize_entry(name, body)?;
        }
        map.end()
    }
}

impl<'de, P: Deserialize<'de>> Deserialize<'de> for ComponentMap<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComponentMapVisitor<P>(PhantomData<P>);

        impl<'de, P: Deserialize<'de>> Visitor<'de> for ComponentMapVisitor<P> {
            type Value = ComponentMap<P>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of component type names to component bodies")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut components = ComponentMap::new();
                while let Some((name, body)) = access.next_entry::<String, P>()? {
                    if components.contains(&name) {
                        return Err(de::Error::custom(format!(
                            "duplicate component '{name}'"
                        )));
                    }
                    components.entries.push((name, body));
                }
                Ok(components)
            }
        }

        deserializer.deserialize_map(ComponentMapVisitor(PhantomData))
    }
}
