//! Scene collections and pointer dispatch.

use crate::comment::Comment;
use crate::frame::Frame;
use crate::history::{ActionLog, HistoryResult};
use crate::input::{PointerEvent, PointerKind};
use crate::item::{GestureContext, ItemId, ItemRef, SpatialItem};
use crate::navigation::Navigation;
use crate::node::Node;
use crate::selection::Selection;
use kurbo::Point;

/// The four ordered item collections of a scene.
#[derive(Debug, Clone, Default)]
pub struct SceneItems {
    pub nodes: Vec<Node>,
    pub comments: Vec<Comment>,
    pub frames: Vec<Frame>,
    pub navigations: Vec<Navigation>,
}

impl SceneItems {
    /// Create empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> ItemRef {
        let item = node.item_ref();
        self.nodes.push(node);
        item
    }

    pub fn add_comment(&mut self, comment: Comment) -> ItemRef {
        let item = comment.item_ref();
        self.comments.push(comment);
        item
    }

    pub fn add_frame(&mut self, frame: Frame) -> ItemRef {
        let item = frame.item_ref();
        self.frames.push(frame);
        item
    }

    pub fn add_navigation(&mut self, navigation: Navigation) -> ItemRef {
        let item = navigation.item_ref();
        self.navigations.push(navigation);
        item
    }

    /// Remove an item. Returns false if it was not present.
    pub fn remove(&mut self, item: ItemRef) -> bool {
        fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
            let len = items.len();
            items.retain(|item| !matches(item));
            items.len() != len
        }

        match item {
            ItemRef::Node(id) => remove_by(&mut self.nodes, |node| node.id == id),
            ItemRef::Comment(id) => remove_by(&mut self.comments, |comment| comment.id == id),
            ItemRef::Frame(id) => remove_by(&mut self.frames, |frame| frame.id == id),
            ItemRef::Navigation(id) => remove_by(&mut self.navigations, |nav| nav.id == id),
        }
    }

    pub fn node(&self, id: ItemId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: ItemId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn frame(&self, id: ItemId) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    pub fn frame_mut(&mut self, id: ItemId) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|frame| frame.id == id)
    }

    pub fn comment(&self, id: ItemId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    pub fn navigation(&self, id: ItemId) -> Option<&Navigation> {
        self.navigations.iter().find(|nav| nav.id == id)
    }

    /// Resolve a handle to the item it names.
    pub fn item(&self, item: ItemRef) -> Option<&dyn SpatialItem> {
        match item {
            ItemRef::Node(id) => self.node(id).map(|node| node as &dyn SpatialItem),
            ItemRef::Comment(id) => self.comment(id).map(|comment| comment as &dyn SpatialItem),
            ItemRef::Frame(id) => self.frame(id).map(|frame| frame as &dyn SpatialItem),
            ItemRef::Navigation(id) => self.navigation(id).map(|nav| nav as &dyn SpatialItem),
        }
    }

    /// Resolve a handle to the item it names, mutably.
    pub fn item_mut(&mut self, item: ItemRef) -> Option<&mut dyn SpatialItem> {
        match item {
            ItemRef::Node(id) => self.node_mut(id).map(|node| node as &mut dyn SpatialItem),
            ItemRef::Comment(id) => self
                .comments
                .iter_mut()
                .find(|comment| comment.id == id)
                .map(|comment| comment as &mut dyn SpatialItem),
            ItemRef::Frame(id) => self.frame_mut(id).map(|frame| frame as &mut dyn SpatialItem),
            ItemRef::Navigation(id) => self
                .navigations
                .iter_mut()
                .find(|nav| nav.id == id)
                .map(|nav| nav as &mut dyn SpatialItem),
        }
    }

    pub fn contains(&self, item: ItemRef) -> bool {
        self.item(item).is_some()
    }

    /// Every item in collection order: nodes, comments, frames, navigations.
    pub fn iter(&self) -> impl Iterator<Item = (ItemRef, &dyn SpatialItem)> {
        let nodes = self.nodes.iter().map(|n| (n.item_ref(), n as &dyn SpatialItem));
        let comments = self.comments.iter().map(|c| (c.item_ref(), c as &dyn SpatialItem));
        let frames = self.frames.iter().map(|f| (f.item_ref(), f as &dyn SpatialItem));
        let navigations = self.navigations.iter().map(|n| (n.item_ref(), n as &dyn SpatialItem));
        nodes.chain(comments).chain(frames).chain(navigations)
    }

    /// Every item back to front: frames, comments, nodes, navigations.
    pub fn draw_order(&self) -> impl Iterator<Item = (ItemRef, &dyn SpatialItem)> {
        let frames = self.frames.iter().map(|f| (f.item_ref(), f as &dyn SpatialItem));
        let comments = self.comments.iter().map(|c| (c.item_ref(), c as &dyn SpatialItem));
        let nodes = self.nodes.iter().map(|n| (n.item_ref(), n as &dyn SpatialItem));
        let navigations = self.navigations.iter().map(|n| (n.item_ref(), n as &dyn SpatialItem));
        frames.chain(comments).chain(nodes).chain(navigations)
    }

    /// Topmost item whose hit test accepts `point`.
    pub fn item_at(&self, point: Point) -> Option<ItemRef> {
        let mut hit = None;
        for (item, spatial) in self.draw_order() {
            if spatial.hit_test(point) {
                hit = Some(item);
            }
        }
        hit
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.comments.len() + self.frames.len() + self.navigations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiver of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    Item(ItemRef),
    Selection,
}

/// Scene items plus the selection and history of one editing session.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub items: SceneItems,
    pub selection: Selection,
    pub history: ActionLog,
    active: Option<GestureTarget>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver of the gesture in progress.
    pub fn active_target(&self) -> Option<GestureTarget> {
        self.active
    }

    /// Route a pointer event. Down picks the target; Move and Up go to the
    /// target of the preceding Down.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match event.kind {
            PointerKind::Down => {
                if self.active.is_some() {
                    log::trace!("pointer down during an active gesture; ending it first");
                    self.cancel_gesture(event.position);
                }
                let target = self.pick_target(event.position);
                self.active = Some(target);
                self.deliver(target, event);
            }
            PointerKind::Move => match self.active {
                Some(target) => self.deliver(target, event),
                None => log::trace!("pointer move without an active gesture"),
            },
            PointerKind::Up => match self.active.take() {
                Some(target) => self.deliver(target, event),
                None => log::trace!("pointer up without an active gesture"),
            },
        }
    }

    /// End the active gesture with a synthesized Up at `position`.
    pub fn cancel_gesture(&mut self, position: Point) {
        if let Some(target) = self.active.take() {
            self.deliver(target, &PointerEvent::up(position));
        }
    }

    /// Revert the last recorded move.
    pub fn undo(&mut self) -> HistoryResult<bool> {
        self.history.undo(&mut self.items)
    }

    /// Re-apply the last reverted move.
    pub fn redo(&mut self) -> HistoryResult<bool> {
        self.history.redo(&mut self.items)
    }

    /// Topmost item under `point`, for hover feedback.
    pub fn item_at(&self, point: Point) -> Option<ItemRef> {
        self.items.item_at(point)
    }

    fn pick_target(&mut self, point: Point) -> GestureTarget {
        if self.selection.is_group_mode() && self.selection.contains_point(&self.items, point) {
            return GestureTarget::Selection;
        }
        match self.items.item_at(point) {
            Some(item) => {
                if !self.selection.contains(item) {
                    self.selection.clear();
                }
                GestureTarget::Item(item)
            }
            None => {
                self.selection.clear();
                GestureTarget::Selection
            }
        }
    }

    fn deliver(&mut self, target: GestureTarget, event: &PointerEvent) {
        match target {
            GestureTarget::Selection => {
                let mut ctx = GestureContext::new(&mut self.history).with_scene(&mut self.items);
                dispatch(&mut self.selection, event, &mut ctx);
            }
            GestureTarget::Item(item) => {
                let Some(spatial) = self.items.item_mut(item) else {
                    log::warn!("gesture target {item:?} left the scene");
                    return;
                };
                let mut ctx = GestureContext::new(&mut self.history);
                dispatch(spatial, event, &mut ctx);
            }
        }
    }
}

fn dispatch(item: &mut dyn SpatialItem, event: &PointerEvent, ctx: &mut GestureContext<'_>) {
    match event.kind {
        PointerKind::Down => item.pointer_down(event, ctx),
        PointerKind::Move => item.pointer_move(event, ctx),
        PointerKind::Up => item.pointer_up(event, ctx),
    }
}
