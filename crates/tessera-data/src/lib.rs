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

//! # Tessera Data
//!
//! The data layer of the engine: the entity/component/scene runtime.
//!
//! A [`Scene`](ecs::Scene) owns a pool of entities and one pool per registered
//! component type. Entities are created inert, decorated with components and
//! children, then activated or destroyed through a deferred queue that
//! [`Scene::refresh`](ecs::Scene::refresh) applies in batch.

#![warn(missing_docs)]

pub mod ecs;
