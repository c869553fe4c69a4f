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

use std::fmt;

/// Identifies a listener registered on a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// An ordered collection of listeners of type `L`.
///
/// `L` is usually an unsized closure type such as `dyn FnMut(&MyEvent)`.
/// Delivery order is registration order; removed listeners leave no gap.
pub struct Dispatcher<L: ?Sized> {
    listeners: Vec<(ListenerId, Box<L>)>,
    next_id: u64,
}

impl<L: ?Sized> Dispatcher<L> {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a listener and returns the id used to remove it later.
    pub fn add(&mut self, listener: Box<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        log::trace!("Registered listener {id:?}.");
        id
    }

    /// Removes a listener. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        match self.listeners.iter().position(|(existing, _)| *existing == id) {
            Some(position) => {
                self.listeners.remove(position);
                true
            }
            None => false,
        }
    }

    /// Iterates the listeners mutably, in registration order.
    pub fn listeners_mut(&mut self) -> impl Iterator<Item = &mut L> + '_ {
        self.listeners.iter_mut().map(|(_, listener)| listener.as_mut())
    }

    /// Returns the number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Dispatcher<dyn FnMut(&E)> {
    /// Delivers `event` to every listener, in registration order.
    pub fn dispatch(&mut self, event: &E) {
        for listener in self.listeners_mut() {
            listener(event);
        }
    }
}

impl<L: ?Sized> Default for Dispatcher<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for Dispatcher<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
