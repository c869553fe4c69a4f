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

//! Provides foundational primitives for event-driven communication.
//!
//! The runtime is single-threaded and delivers events synchronously: a listener
//! runs inline, inside the call that triggered the event, and listeners run in
//! registration order. The primary component is the [`Dispatcher`], an ordered
//! list of boxed callbacks addressed by [`ListenerId`].
//!
//! The dispatcher is generic over the callback type rather than the event type,
//! so higher-level crates can register callbacks for events that borrow data
//! (for example a component event carrying a reference to the component).

mod dispatcher;

pub use self::dispatcher::{Dispatcher, ListenerId};
