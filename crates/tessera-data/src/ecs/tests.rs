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

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tessera_core::ecs::EntityId;

use super::component::Component;
use super::component_pool::ComponentEventKind;
use super::entity::{EntityEvent, EntityEventKind};
use super::error::EcsError;
use super::scene::Scene;
use super::view::EntityRef;

// --- DUMMY COMPONENTS FOR TESTING ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A component holding a single string value.
struct Label {
    value: String,
}
impl Component for Label {}

impl Label {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Health(u32);
impl Component for Health {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Unregistered;
impl Component for Unregistered {}

fn test_scene() -> Scene {
    let mut scene = Scene::new();
    scene
        .register_component::<Label>("String")
        .expect("Label should register");
    scene
        .register_component::<Health>("Health")
        .expect("Health should register");
    scene
}

type Recorded = (ComponentEventKind, EntityId, String);

fn has_even_health(entity: &EntityRef<'_>) -> bool {
    entity
        .component::<Health>()
        .is_ok_and(|health| health.0 % 2 == 0)
}

fn named(entity: &EntityRef<'_>) -> bool {
    entity.name() == Some("x")
}

fn record_label_events(scene: &mut Scene) -> Rc<RefCell<Vec<Recorded>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    scene
        .add_component_listener::<Label>(move |event| {
            sink.borrow_mut()
                .push((event.kind, event.entity, event.component.value.clone()));
        })
        .expect("Label is registered");
    events
}

// --- REGISTRATION ---

#[test]
fn test_register_component_twice_fails() {
    let mut scene = test_scene();

    assert!(matches!(
        scene.register_component::<Label>("Other"),
        Err(EcsError::DuplicateRegistration(_))
    ));
    assert_eq!(
        scene.register_component::<Unregistered>("Health"),
        Err(EcsError::DuplicateRegistration("Health".into()))
    );
    assert_eq!(
        scene.component_type_names().collect::<Vec<_>>(),
        vec!["String", "Health"]
    );
}

// --- ENTITY LIFECYCLE ---

#[test]
fn test_create_entities_assigns_sequential_ids() {
    let mut scene = Scene::new();

    let a = scene.create_entity();
    let b = scene.create_entity();

    assert_eq!(a.index, 0);
    assert_eq!(b.index, 1);
    assert_eq!(a.scene, scene.id());
    assert_eq!(scene.entity_count(), 0, "Created entities are not activated");
}

#[test]
fn test_dereference_invalid_entity_fails() {
    let scene = Scene::new();

    assert_eq!(
        scene.entity(EntityId::INVALID).err(),
        Some(EcsError::InvalidEntity(EntityId::INVALID))
    );
}

#[test]
fn test_dereference_destroyed_entity_fails() {
    // --- 1. SETUP ---
    let mut scene = Scene::new();
    let a = scene.create_entity();

    // --- 2. ACTION ---
    scene.destroy(a).expect("Destroy should be accepted");
    assert!(scene.contains(a), "Destruction is deferred until refresh");
    scene.refresh();
    let b = scene.create_entity();

    // --- 3. ASSERTIONS ---
    assert_eq!(b.index, a.index, "The freed slot should be recycled");
    assert!(!scene.contains(a));
    assert_eq!(scene.entity(a).err(), Some(EcsError::InvalidEntity(a)));
    assert!(scene.entity(b).is_ok());
}

#[test]
fn test_activation_is_deferred_until_refresh() {
    let mut scene = Scene::new();
    let a = scene.create_entity();

    assert_eq!(scene.entities().count(), 0);

    scene.activate(a).expect("Activation should be accepted");
    assert!(scene.is_pending_activation(a).unwrap());
    assert!(!scene.is_activated(a).unwrap());
    assert_eq!(scene.entities().count(), 0);

    assert!(scene.refresh(), "Refresh should report work done");
    assert!(scene.is_activated(a).unwrap());
    assert_eq!(
        scene.entities().map(|e| e.id()).collect::<Vec<_>>(),
        vec![a],
        "The entity should be visible exactly once"
    );
    assert_eq!(scene.entity_count(), 1);
    assert!(!scene.refresh(), "Nothing left to do");
}

#[test]
fn test_entity_iteration_some_activated() {
    let mut scene = Scene::new();
    let ids: Vec<_> = (0..4).map(|_| scene.create_entity()).collect();

    scene.activate(ids[3]).unwrap();
    scene.activate(ids[1]).unwrap();
    scene.refresh();

    let visible: Vec<_> = scene.entities().map(|e| e.id()).collect();
    assert_eq!(visible, vec![ids[1], ids[3]], "Ascending id order");
}

#[test]
fn test_create_many_entities() {
    let mut scene = Scene::new();

    let ids: Vec<_> = (0..64).map(|_| scene.create_entity()).collect();
    for &id in &ids {
        scene.activate(id).unwrap();
    }
    scene.refresh();

    assert_eq!(scene.entity_count(), 64);
    for (index, entity) in scene.entities().enumerate() {
        assert_eq!(entity.id(), ids[index]);
    }
}

#[test]
fn test_invalid_state_transitions() {
    let mut scene = Scene::new();
    let a = scene.create_entity();

    scene.activate(a).unwrap();
    assert_eq!(scene.activate(a), Err(EcsError::AlreadyPendingActivation(a)));
    scene.refresh();
    assert_eq!(scene.activate(a), Err(EcsError::AlreadyActivated(a)));

    scene.destroy(a).unwrap();
    assert_eq!(scene.destroy(a), Err(EcsError::AlreadyPendingDestruction(a)));
    assert_eq!(scene.activate(a), Err(EcsError::AlreadyActivated(a)));

    let b = scene.create_entity();
    scene.destroy(b).unwrap();
    assert_eq!(scene.activate(b), Err(EcsError::PendingDestruction(b)));
}

#[test]
fn test_destroy_before_activation_never_activates() {
    // --- 1. SETUP ---
    let mut scene = test_scene();
    let events = record_label_events(&mut scene);
    let a = scene.create_entity();
    scene.add_component(a, Label::new("A")).unwrap();

    // --- 2. ACTION ---
    scene.activate(a).unwrap();
    scene.destroy(a).unwrap();
    scene.refresh();

    // --- 3. ASSERTIONS ---
    assert!(!scene.contains(a));
    assert_eq!(scene.entity_count(), 0);
    assert!(
        events.borrow().is_empty(),
        "An entity that never activated fires no component events"
    );
}

#[test]
fn test_entity_events_follow_lifecycle() {
    let mut scene = Scene::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    scene.add_entity_listener(move |event: &EntityEvent| sink.borrow_mut().push(*event));

    let a = scene.create_entity();
    scene.activate(a).unwrap();
    scene.refresh();
    scene.destroy(a).unwrap();
    scene.refresh();

    let kinds: Vec<_> = events.borrow().iter().map(|e| (e.kind, e.entity)).collect();
    assert_eq!(
        kinds,
        vec![
            (EntityEventKind::Create, a),
            (EntityEventKind::Activate, a),
            (EntityEventKind::Destroy, a),
        ]
    );
}

// --- HIERARCHY ---

#[test]
fn test_add_remove_children() {
    let mut scene = Scene::new();
    let parent = scene.create_entity();
    let children: Vec<_> = (0..3).map(|_| scene.create_entity()).collect();

    for &child in &children {
        scene.add_child(parent, child).unwrap();
    }
    assert_eq!(scene.children(parent).unwrap(), children.as_slice());
    assert_eq!(scene.parent(children[1]).unwrap(), Some(parent));

    scene.remove_child(parent, children[1]).unwrap();

    assert_eq!(
        scene.children(parent).unwrap(),
        &[children[0], children[2]],
        "Remaining children keep their order"
    );
    assert_eq!(scene.parent(children[1]).unwrap(), None);
    assert_eq!(
        scene.remove_child(parent, children[1]),
        Err(EcsError::NotAChild {
            parent,
            child: children[1]
        })
    );
}

#[test]
fn test_add_child_that_has_parent_fails() {
    let mut scene = Scene::new();
    let a = scene.create_entity();
    let b = scene.create_entity();
    let c = scene.create_entity();

    scene.add_child(a, c).unwrap();

    assert_eq!(scene.add_child(b, c), Err(EcsError::ChildHasParent(c)));
    assert_eq!(scene.children(b).unwrap(), &[] as &[EntityId]);
}

#[test]
fn test_add_child_activation_restrictions() {
    let mut scene = Scene::new();
    let active = scene.create_entity();
    let inert = scene.create_entity();
    scene.activate(active).unwrap();

    assert_eq!(
        scene.add_child(active, inert),
        Err(EcsError::ActivationMismatch {
            parent: active,
            child: inert
        })
    );
    assert_eq!(
        scene.add_child(inert, active),
        Err(EcsError::ActivationMismatch {
            parent: inert,
            child: active
        })
    );

    let pending = scene.create_entity();
    scene.activate(pending).unwrap();
    scene.refresh();
    let queued = scene.create_entity();
    scene.activate(queued).unwrap();
    assert!(
        scene.add_child(pending, queued).is_ok(),
        "Activated and pending-activation entities may be linked"
    );
}

#[test]
fn test_add_child_to_pending_destruction_fails() {
    let mut scene = Scene::new();
    let a = scene.create_entity();
    let b = scene.create_entity();
    scene.destroy(a).unwrap();

    assert_eq!(scene.add_child(a, b), Err(EcsError::PendingDestruction(a)));
}

#[test]
fn test_add_child_from_another_scene_fails() {
    let mut scene_a = Scene::new();
    let mut scene_b = Scene::new();
    let a = scene_a.create_entity();
    let b = scene_b.create_entity();

    assert_eq!(scene_a.add_child(a, b), Err(EcsError::ForeignScene(b)));
    assert_eq!(scene_a.remove_child(a, b), Err(EcsError::ForeignScene(b)));
}

#[test]
fn test_add_child_cycle_fails() {
    let mut scene = Scene::new();
    let a = scene.create_entity();
    let b = scene.create_entity();
    let c = scene.create_entity();
    scene.add_child(a, b).unwrap();
    scene.add_child(b, c).unwrap();

    assert_eq!(
        scene.add_child(c, a),
        Err(EcsError::HierarchyCycle {
            parent: c,
            child: a
        })
    );
    assert_eq!(
        scene.add_child(a, a),
        Err(EcsError::HierarchyCycle {
            parent: a,
            child: a
        })
    );
}

#[test]
fn test_child_activation_cascades() {
    // --- 1. SETUP ---
    let mut scene = Scene::new();
    let root = scene.create_entity();
    let child = scene.create_entity();
    let grandchild = scene.create_entity();
    scene.add_child(root, child).unwrap();
    scene.add_child(child, grandchild).unwrap();

    // --- 2. ACTION ---
    scene.activate(root).unwrap();
    scene.refresh();

    // --- 3. ASSERTIONS ---
    for id in [root, child, grandchild] {
        assert!(scene.is_activated(id).unwrap(), "{id} should be activated");
    }
    assert_eq!(scene.entity_count(), 3);
    assert_eq!(scene.root(grandchild).unwrap(), root);
}

#[test]
fn test_destroy_entity_with_children() {
    // --- 1. SETUP ---
    let mut scene = Scene::new();
    let keep = scene.create_entity();
    let parent = scene.create_entity();
    let child = scene.create_entity();
    let grandchild = scene.create_entity();
    scene.add_child(parent, child).unwrap();
    scene.add_child(child, grandchild).unwrap();
    scene.activate(keep).unwrap();
    scene.activate(parent).unwrap();
    scene.refresh();
    let handle = scene.handle(grandchild).unwrap();
    assert_eq!(scene.entity_count(), 4);

    // --- 2. ACTION ---
    scene.destroy(parent).unwrap();
    assert!(scene.is_pending_destruction(grandchild).unwrap());
    assert_eq!(scene.entity_count(), 4, "Nothing is freed before refresh");
    scene.refresh();

    // --- 3. ASSERTIONS ---
    assert_eq!(scene.entity_count(), 1, "The whole subtree is gone");
    for id in [parent, child, grandchild] {
        assert!(scene.entity(id).is_err(), "{id} should be freed");
    }
    assert!(!handle.is_valid());
    assert!(scene.contains(keep));
}

#[test]
fn test_destroy_child_detaches_from_parent() {
    let mut scene = Scene::new();
    let parent = scene.create_entity();
    let a = scene.create_entity();
    let b = scene.create_entity();
    scene.add_child(parent, a).unwrap();
    scene.add_child(parent, b).unwrap();

    scene.destroy(a).unwrap();
    scene.refresh();

    assert_eq!(scene.children(parent).unwrap(), &[b]);

    scene.destroy_all_children(parent).unwrap();
    scene.refresh();
    assert!(!scene.has_children(parent).unwrap());
    assert!(!scene.contains(b));
}

#[test]
fn test_clone_entity() {
    // --- 1. SETUP ---
    let mut scene = test_scene();
    let a = scene.create_named_entity("original");
    let original = scene.add_component(a, Label::new("Test")).unwrap();
    scene.activate(a).unwrap();
    scene.refresh();

    // --- 2. ACTION ---
    let b = scene.clone_entity(a).unwrap();
    scene.component_mut::<Label>(b).unwrap().value = "Changed".into();

    // --- 3. ASSERTIONS ---
    assert!(scene.is_activated(a).unwrap());
    assert!(!scene.is_activated(b).unwrap(), "Clones start inert");
    assert_eq!(scene.entity(b).unwrap().name(), Some("original"));
    assert_ne!(scene.component_id::<Label>(b).unwrap(), original);
    assert_eq!(scene.component::<Label>(a).unwrap().value, "Test");
    assert_eq!(scene.component::<Label>(b).unwrap().value, "Changed");
}

#[test]
fn test_clone_entity_with_children() {
    let mut scene = test_scene();
    let a = scene.create_entity();
    let b = scene.create_entity();
    let c = scene.create_entity();
    scene.add_component(c, Health(3)).unwrap();
    scene.add_child(a, b).unwrap();
    scene.add_child(a, c).unwrap();

    let clone = scene.clone_entity(a).unwrap();

    let children = scene.children(clone).unwrap().to_vec();
    assert_eq!(children.len(), 2);
    assert!(!children.contains(&b) && !children.contains(&c));
    for &child in &children {
        assert_eq!(scene.parent(child).unwrap(), Some(clone));
    }
    assert_eq!(*scene.component::<Health>(children[1]).unwrap(), Health(3));
    assert_eq!(scene.children(a).unwrap(), &[b, c], "The source is untouched");
}

#[test]
fn test_clone_entity_keeps_transient_flag() {
    let mut scene = test_scene();
    let a = scene.create_entity();
    let b = scene.create_entity();
    scene.add_child(a, b).unwrap();
    scene.set_transient(b, true).unwrap();

    let clone = scene.clone_entity(a).unwrap();
    let clone_child = scene.children(clone).unwrap()[0];

    assert!(!scene.is_transient(clone).unwrap());
    assert!(
        scene.is_transient(clone_child).unwrap(),
        "A transient subtree stays transient when copied"
    );
}

// --- COMPONENTS ---

#[test]
fn test_add_and_remove_component() {
    let mut scene = test_scene();
    let a = scene.create_entity();

    let id = scene.add_component(a, Label::new("Test")).unwrap();
    assert_eq!(scene.component_id::<Label>(a).unwrap(), id);
    assert_eq!(scene.component::<Label>(a).unwrap().value, "Test");
    assert_eq!(scene.components::<Label>().unwrap().get(id).unwrap().entity(), a);

    let removed = scene.remove_component::<Label>(a).unwrap();

    assert_eq!(removed, Label::new("Test"));
    assert!(!scene.has_component::<Label>(a).unwrap());
    assert!(matches!(
        scene.components::<Label>().unwrap().get(id),
        Err(EcsError::InvalidComponent { .. })
    ));
}

#[test]
fn test_replace_component_keeps_id() {
    let mut scene = test_scene();
    let a = scene.create_entity();

    let original = scene.add_component(a, Label::new("Test")).unwrap();
    let replaced = scene.replace_component(a, Label::new("Replaced")).unwrap();

    assert_eq!(original, replaced);
    assert_eq!(
        scene.components::<Label>().unwrap().get(original).unwrap().value,
        "Replaced"
    );
}

#[test]
fn test_component_contract_violations() {
    let mut scene = test_scene();
    let a = scene.create_entity();
    scene.add_component(a, Label::new("Test")).unwrap();

    assert!(matches!(
        scene.add_component(a, Label::new("Again")),
        Err(EcsError::DuplicateComponent { .. })
    ));
    assert_eq!(
        scene.component::<Label>(a).unwrap().value,
        "Test",
        "The original component is untouched"
    );
    assert!(matches!(
        scene.remove_component::<Health>(a),
        Err(EcsError::MissingComponent { .. })
    ));
    assert!(matches!(
        scene.component::<Health>(a),
        Err(EcsError::MissingComponent { .. })
    ));
    assert!(matches!(
        scene.remove_component::<Unregistered>(a),
        Err(EcsError::UnregisteredComponent(_))
    ));
}

#[test]
fn test_component_iteration_some_activated() {
    let mut scene = test_scene();
    let ids: Vec<_> = (0..4).map(|_| scene.create_entity()).collect();
    for (i, &id) in ids.iter().enumerate() {
        scene.add_component(id, Health(i as u32)).unwrap();
    }
    scene.activate(ids[0]).unwrap();
    scene.activate(ids[2]).unwrap();

    assert!(scene.components::<Health>().unwrap().is_empty());
    scene.refresh();

    let components = scene.components::<Health>().unwrap();
    let visible: Vec<_> = components.iter().map(|c| (c.entity(), *c.value())).collect();
    assert_eq!(visible, vec![(ids[0], Health(0)), (ids[2], Health(2))]);
    assert_eq!(components.len(), 2);
}

#[test]
fn test_component_find() {
    let mut scene = test_scene();
    for value in [5, 20, 7, 30] {
        let id = scene.create_entity();
        scene.add_component(id, Health(value)).unwrap();
        scene.activate(id).unwrap();
    }
    let hidden = scene.create_entity();
    scene.add_component(hidden, Health(99)).unwrap();
    scene.refresh();

    let components = scene.components::<Health>().unwrap();

    let first = components.find_first(|c| c.0 > 10).expect("There is a match");
    assert_eq!(first.0, 20);
    let all: Vec<_> = components.find(|c| c.0 > 6).iter().map(|c| c.0).collect();
    assert_eq!(all, vec![20, 7, 30], "Hidden components are never matched");
    assert!(components.find_first(|c| c.0 > 100).is_none());
    assert!(components.find(|c| c.0 > 100).is_empty());
}

#[test]
fn test_component_listener_events() {
    // --- 1. SETUP ---
    let mut scene = test_scene();
    let events = record_label_events(&mut scene);

    // --- 2. ACTION & ASSERTIONS ---
    let a = scene.create_entity();
    scene.add_component(a, Label::new("A")).unwrap();
    assert!(events.borrow().is_empty(), "Inert entities fire nothing");
    scene.activate(a).unwrap();
    scene.refresh();
    assert_eq!(events.borrow().len(), 1);

    let b = scene.create_entity();
    scene.activate(b).unwrap();
    scene.refresh();
    scene.add_component(b, Label::new("B")).unwrap();
    assert_eq!(
        *events.borrow(),
        vec![
            (ComponentEventKind::Add, a, "A".to_owned()),
            (ComponentEventKind::Add, b, "B".to_owned()),
        ],
        "Adding to an activated entity fires right away"
    );
    events.borrow_mut().clear();

    scene.destroy(a).unwrap();
    scene.refresh();
    assert_eq!(
        *events.borrow(),
        vec![(ComponentEventKind::Remove, EntityId::INVALID, "A".to_owned())],
        "Removals caused by destruction report no owner"
    );
    events.borrow_mut().clear();

    scene.remove_component::<Label>(b).unwrap();
    assert_eq!(
        *events.borrow(),
        vec![(ComponentEventKind::Remove, b, "B".to_owned())]
    );
}

#[test]
fn test_add_events_follow_registration_order() {
    let mut scene = test_scene();
    let order = Rc::new(RefCell::new(Vec::new()));
    let labels = Rc::clone(&order);
    scene
        .add_component_listener::<Label>(move |event| {
            labels.borrow_mut().push(("String", event.kind, event.entity));
        })
        .unwrap();
    let health = Rc::clone(&order);
    scene
        .add_component_listener::<Health>(move |event| {
            health.borrow_mut().push(("Health", event.kind, event.entity));
        })
        .unwrap();

    let e = scene.create_entity();
    scene.add_component(e, Health(1)).unwrap();
    scene.add_component(e, Label::new("x")).unwrap();
    scene.activate(e).unwrap();
    scene.refresh();

    assert_eq!(
        *order.borrow(),
        vec![
            ("String", ComponentEventKind::Add, e),
            ("Health", ComponentEventKind::Add, e),
        ]
    );
}

#[test]
fn test_replace_fires_remove_then_add() {
    let mut scene = test_scene();
    let events = record_label_events(&mut scene);
    let a = scene.create_entity();
    scene.add_component(a, Label::new("old")).unwrap();
    scene.activate(a).unwrap();
    scene.refresh();
    events.borrow_mut().clear();

    scene.replace_component(a, Label::new("new")).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            (ComponentEventKind::Remove, a, "old".to_owned()),
            (ComponentEventKind::Add, a, "new".to_owned()),
        ]
    );
}

#[test]
fn test_removed_listener_stops_receiving() {
    let mut scene = test_scene();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let listener = scene
        .add_component_listener::<Health>(move |_| {
            *counter.borrow_mut() += 1;
        })
        .unwrap();

    assert!(scene.remove_component_listener::<Health>(listener).unwrap());
    let a = scene.create_entity();
    scene.add_component(a, Health(1)).unwrap();
    scene.activate(a).unwrap();
    scene.refresh();

    assert_eq!(*count.borrow(), 0);
}

// --- SEARCH ---

#[test]
fn test_entity_find() {
    let mut scene = test_scene();
    let mut ids = Vec::new();
    for value in [1, 2, 3, 4] {
        let id = scene.create_entity();
        scene.add_component(id, Health(value)).unwrap();
        scene.activate(id).unwrap();
        ids.push(id);
    }
    scene.refresh();

    assert_eq!(scene.find_first(has_even_health), Some(ids[1]));
    assert_eq!(scene.find(has_even_health), vec![ids[1], ids[3]]);
    assert!(scene.find(|_| false).is_empty());
    assert_eq!(scene.find_first(|_| false), None);
}

#[test]
fn test_hierarchy_search() {
    // root
    // ├── a ("x")
    // │   └── a1 ("x")
    // └── b
    //     └── b1 ("x")
    let mut scene = Scene::new();
    let root = scene.create_entity();
    let a = scene.create_named_entity("x");
    let a1 = scene.create_named_entity("x");
    let b = scene.create_entity();
    let b1 = scene.create_named_entity("x");
    scene.add_child(root, a).unwrap();
    scene.add_child(a, a1).unwrap();
    scene.add_child(root, b).unwrap();
    scene.add_child(b, b1).unwrap();

    assert_eq!(scene.find_first_child(root, named).unwrap(), Some(a));
    assert_eq!(scene.find_children(root, named).unwrap(), vec![a]);
    assert_eq!(scene.find_first_child(b, named).unwrap(), Some(b1));
    assert_eq!(
        scene.find_descendants(root, named).unwrap(),
        vec![a, a1, b1],
        "Descendants are searched parents first"
    );
    assert_eq!(scene.find_first_descendant(b, named).unwrap(), Some(b1));
    assert_eq!(scene.find_first_descendant(a1, named).unwrap(), None);
    assert_eq!(scene.find_first_ancestor(a1, named).unwrap(), Some(a));
    assert_eq!(scene.find_ancestors(a1, |_| true).unwrap(), vec![a, root]);
    assert!(scene.find_ancestors(root, |_| true).unwrap().is_empty());
}

// --- HANDLES ---

#[test]
fn test_entity_handle_invalidates_on_destroy() {
    // --- 1. SETUP ---
    let mut scene = Scene::new();
    let a = scene.create_entity();
    let handle = scene.handle(a).unwrap();
    let copy = handle.clone();

    // --- 2. ACTION ---
    assert_eq!(handle, copy);
    assert_eq!(scene.handle(a).unwrap(), handle, "One shared context per entity");
    assert_eq!(scene.resolve(&handle).unwrap().id(), a);
    scene.destroy(a).unwrap();
    assert!(handle.is_valid(), "Still valid until refresh frees the slot");
    scene.refresh();
    let b = scene.create_entity();

    // --- 3. ASSERTIONS ---
    assert_eq!(b.index, a.index);
    for h in [&handle, &copy] {
        assert!(!h.is_valid());
        assert_eq!(h.id(), Err(EcsError::InvalidHandle));
        assert!(scene.resolve(h).is_err(), "A recycled slot is never resolved");
    }
}

#[test]
fn test_dropping_scene_invalidates_handles() {
    // --- 1. SETUP ---
    let mut scene = Scene::new();
    let active = scene.create_entity();
    scene.activate(active).unwrap();
    scene.refresh();
    let inert = scene.create_entity();
    let active_handle = scene.handle(active).unwrap();
    let inert_handle = scene.handle(inert).unwrap();

    // --- 2. ACTION ---
    drop(scene);

    // --- 3. ASSERTIONS ---
    for handle in [&active_handle, &inert_handle] {
        assert!(!handle.is_valid(), "Every entity is released with its scene");
        assert_eq!(handle.id(), Err(EcsError::InvalidHandle));
    }
}
