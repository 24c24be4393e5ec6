//! In-memory stand-ins for the browser used by unit tests.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use crate::form::{ButtonState, FormSurface};
use crate::notify::{Notification, NotificationId, NotificationKind, NotificationSurface, Phase};
use crate::page::{Page, Rect, Viewport, VisibilityCallback, VisibilityOptions};
use crate::scheduler::{Scheduler, Task, TaskId};

struct Pending {
    id: TaskId,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

/// Virtual clock. Nothing runs until [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    clock: RefCell<Clock>,
}

impl ManualScheduler {
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due_index = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.id.0))
                    .map(|(index, _)| index);

                due_index.map(|index| {
                    let pending = clock.pending.remove(index);
                    clock.now = pending.due;
                    pending.task
                })
            };

            match next {
                Some(task) => task(),
                None => break,
            }
        }

        self.clock.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = TaskId(clock.next_id);
        let due = clock.now + delay;
        clock.pending.push(Pending { id, due, task });
        id
    }

    fn cancel(&self, id: TaskId) {
        self.clock
            .borrow_mut()
            .pending
            .retain(|pending| pending.id != id);
    }
}

#[derive(Default)]
struct FakeNode {
    selectors: Vec<String>,
    attributes: HashMap<String, String>,
    classes: BTreeSet<String>,
    styles: HashMap<String, String>,
    text: String,
    offset_top: f64,
    offset_height: f64,
    rect: Rect,
    children: Vec<usize>,
}

#[derive(Default)]
struct FakeDocument {
    nodes: Vec<FakeNode>,
    scroll_y: f64,
    viewport: Viewport,
    observed: Vec<(usize, VisibilityCallback<usize>)>,
}

/// A page whose nodes are matched by the exact selector strings they were
/// registered under.
#[derive(Default)]
pub struct FakePage {
    document: RefCell<FakeDocument>,
}

impl FakePage {
    pub fn new() -> Self {
        let page = Self::default();
        page.set_viewport(1280.0, 720.0);
        page
    }

    pub fn add(&self, selector: &str) -> usize {
        self.add_matching(&[selector])
    }

    pub fn add_matching(&self, selectors: &[&str]) -> usize {
        let mut document = self.document.borrow_mut();
        document.nodes.push(FakeNode {
            selectors: selectors.iter().map(|value| value.to_string()).collect(),
            ..FakeNode::default()
        });
        document.nodes.len() - 1
    }

    pub fn add_child(&self, parent: usize, child: usize) {
        self.document.borrow_mut().nodes[parent].children.push(child);
    }

    pub fn set_scroll(&self, scroll_y: f64) {
        self.document.borrow_mut().scroll_y = scroll_y;
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.document.borrow_mut().viewport = Viewport { width, height };
    }

    pub fn set_offset(&self, node: usize, top: f64, height: f64) {
        let mut document = self.document.borrow_mut();
        document.nodes[node].offset_top = top;
        document.nodes[node].offset_height = height;
    }

    pub fn set_rect(&self, node: usize, top: f64, height: f64) {
        self.document.borrow_mut().nodes[node].rect = Rect::new(top, height);
    }

    pub fn text(&self, node: usize) -> String {
        self.document.borrow().nodes[node].text.clone()
    }

    pub fn observed_count(&self) -> usize {
        self.document.borrow().observed.len()
    }

    /// Simulates the node scrolling into view.
    pub fn reveal(&self, node: usize) {
        let callback = {
            let mut document = self.document.borrow_mut();
            let position = document
                .observed
                .iter()
                .position(|(observed, _)| *observed == node);
            position.map(|index| document.observed.remove(index).1)
        };

        if let Some(callback) = callback {
            callback(&node);
        }
    }
}

impl Page for FakePage {
    type Node = usize;

    fn find(&self, selector: &str) -> Option<usize> {
        self.find_all(selector).into_iter().next()
    }

    fn find_all(&self, selector: &str) -> Vec<usize> {
        self.document
            .borrow()
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.selectors.iter().any(|value| value == selector))
            .map(|(index, _)| index)
            .collect()
    }

    fn root(&self) -> Option<usize> {
        self.find(":root")
    }

    fn body(&self) -> Option<usize> {
        self.find("body")
    }

    fn scroll_y(&self) -> f64 {
        self.document.borrow().scroll_y
    }

    fn viewport(&self) -> Viewport {
        self.document.borrow().viewport
    }

    fn offset_top(&self, node: &usize) -> f64 {
        self.document.borrow().nodes[*node].offset_top
    }

    fn offset_height(&self, node: &usize) -> f64 {
        self.document.borrow().nodes[*node].offset_height
    }

    fn bounding_rect(&self, node: &usize) -> Rect {
        self.document.borrow().nodes[*node].rect
    }

    fn contains(&self, ancestor: &usize, node: &usize) -> bool {
        if ancestor == node {
            return true;
        }
        let children = self.document.borrow().nodes[*ancestor].children.clone();
        children.iter().any(|child| self.contains(child, node))
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.document.borrow().nodes[*node].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &usize, name: &str, value: &str) {
        self.document.borrow_mut().nodes[*node]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, node: &usize, name: &str) {
        self.document.borrow_mut().nodes[*node].attributes.remove(name);
    }

    fn has_class(&self, node: &usize, class: &str) -> bool {
        self.document.borrow().nodes[*node].classes.contains(class)
    }

    fn set_class(&self, node: &usize, class: &str, on: bool) {
        let mut document = self.document.borrow_mut();
        let classes = &mut document.nodes[*node].classes;
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn style(&self, node: &usize, property: &str) -> Option<String> {
        self.document.borrow().nodes[*node].styles.get(property).cloned()
    }

    fn set_style(&self, node: &usize, property: &str, value: &str) {
        self.document.borrow_mut().nodes[*node]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn set_text(&self, node: &usize, text: &str) {
        self.document.borrow_mut().nodes[*node].text = text.to_string();
    }

    fn observe_visibility(
        &self,
        nodes: Vec<usize>,
        _options: VisibilityOptions,
        on_visible: VisibilityCallback<usize>,
    ) {
        let mut document = self.document.borrow_mut();
        for node in nodes {
            document.observed.push((node, on_visible.clone()));
        }
    }
}

#[derive(Default)]
struct Toasts {
    mounted: Vec<(Notification, Phase)>,
    last_kind: Option<NotificationKind>,
}

#[derive(Default)]
pub struct RecordingSurface {
    toasts: RefCell<Toasts>,
}

impl RecordingSurface {
    pub fn mounted_count(&self) -> usize {
        self.toasts.borrow().mounted.len()
    }

    pub fn phase_of(&self, id: NotificationId) -> Option<Phase> {
        self.toasts
            .borrow()
            .mounted
            .iter()
            .find(|(notification, _)| notification.id == id)
            .map(|(_, phase)| *phase)
    }

    pub fn visible_messages(&self) -> Vec<String> {
        self.toasts
            .borrow()
            .mounted
            .iter()
            .filter(|(_, phase)| *phase == Phase::Visible)
            .map(|(notification, _)| notification.message.clone())
            .collect()
    }

    pub fn last_kind(&self) -> Option<NotificationKind> {
        self.toasts.borrow().last_kind
    }
}

impl NotificationSurface for RecordingSurface {
    fn clear_channel(&self) {
        self.toasts.borrow_mut().mounted.clear();
    }

    fn mount(&self, notification: &Notification) {
        let mut toasts = self.toasts.borrow_mut();
        toasts.last_kind = Some(notification.kind);
        toasts.mounted.push((notification.clone(), Phase::Entering));
    }

    fn set_phase(&self, id: NotificationId, phase: Phase) {
        for (notification, current) in self.toasts.borrow_mut().mounted.iter_mut() {
            if notification.id == id {
                *current = phase;
            }
        }
    }

    fn detach(&self, id: NotificationId) {
        self.toasts
            .borrow_mut()
            .mounted
            .retain(|(notification, _)| notification.id != id);
    }
}

#[derive(Default)]
struct FormRecord {
    buttons: Vec<ButtonState>,
    shaking: bool,
    resets: usize,
    end_date_min: Option<String>,
    success_panel: bool,
    celebrations: usize,
}

#[derive(Default)]
pub struct RecordingForm {
    record: RefCell<FormRecord>,
}

impl RecordingForm {
    pub fn last_button(&self) -> Option<ButtonState> {
        self.record.borrow().buttons.last().cloned()
    }

    pub fn shaking(&self) -> bool {
        self.record.borrow().shaking
    }

    pub fn resets(&self) -> usize {
        self.record.borrow().resets
    }

    pub fn end_date_min(&self) -> Option<String> {
        self.record.borrow().end_date_min.clone()
    }

    pub fn success_panel_shown(&self) -> bool {
        self.record.borrow().success_panel
    }

    pub fn celebrations(&self) -> usize {
        self.record.borrow().celebrations
    }
}

impl FormSurface for RecordingForm {
    fn set_button(&self, state: &ButtonState) {
        self.record.borrow_mut().buttons.push(state.clone());
    }

    fn set_shaking(&self, on: bool) {
        self.record.borrow_mut().shaking = on;
    }

    fn reset_fields(&self) {
        self.record.borrow_mut().resets += 1;
    }

    fn set_end_date_min(&self, value: &str) {
        self.record.borrow_mut().end_date_min = Some(value.to_string());
    }

    fn show_success_panel(&self, on: bool) {
        self.record.borrow_mut().success_panel = on;
    }

    fn celebrate(&self) {
        self.record.borrow_mut().celebrations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::millis;
    use std::rc::Rc;

    #[test]
    fn manual_scheduler_runs_in_due_order_with_ties_by_registration() {
        let scheduler = Rc::new(ManualScheduler::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("late", 30), ("first", 10), ("second", 10)] {
            let log = log.clone();
            scheduler.schedule(millis(delay), Box::new(move || log.borrow_mut().push(label)));
        }

        scheduler.advance(millis(30));
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(scheduler.now(), millis(30));
    }

    #[test]
    fn manual_scheduler_runs_tasks_scheduled_during_advance() {
        let scheduler = Rc::new(ManualScheduler::default());
        let fired = Rc::new(RefCell::new(false));

        let inner_scheduler = scheduler.clone();
        let flag = fired.clone();
        scheduler.schedule(
            millis(10),
            Box::new(move || {
                inner_scheduler.schedule(millis(5), Box::new(move || *flag.borrow_mut() = true));
            }),
        );

        scheduler.advance(millis(15));
        assert!(*fired.borrow());
    }

    #[test]
    fn canceled_task_never_runs() {
        let scheduler = ManualScheduler::default();
        let fired = Rc::new(RefCell::new(false));

        let flag = fired.clone();
        let id = scheduler.schedule(millis(10), Box::new(move || *flag.borrow_mut() = true));
        scheduler.cancel(id);
        scheduler.advance(millis(100));

        assert!(!*fired.borrow());
        assert_eq!(scheduler.pending(), 0);
    }
}
