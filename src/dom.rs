use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;
use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use js_sys::{Array, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ServiceWorkerRegistration, Window,
};

use crate::notify::{Notification, NotificationId, NotificationSurface, Phase};
use crate::page::{Page, Rect, Viewport, VisibilityCallback, VisibilityOptions};
use crate::scheduler::{Scheduler, Task, TaskId};
use crate::smooth_scroll::{scroll_destination, ScrollAnimation};
use crate::telemetry::{log_event, LogLevel};

pub const SERVICE_WORKER_PATH: &str = "/service-worker.js";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn is_touch_device() -> bool {
    let Some(win) = window() else {
        return false;
    };

    let has_touch_handler = Reflect::has(&win, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    has_touch_handler || win.navigator().max_touch_points() > 0
}

pub fn local_today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

pub fn push_hash(id: &str) {
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&format!("#{id}")));
    }
}

pub fn register_service_worker() {
    let Some(win) = window() else {
        return;
    };

    let navigator = win.navigator();
    if !Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        log_event(LogLevel::Debug, "service_worker_unsupported", serde_json::json!({}));
        return;
    }

    let registration = navigator.service_worker().register(SERVICE_WORKER_PATH);
    spawn_local(async move {
        match JsFuture::from(registration).await {
            Ok(value) => {
                let scope = value
                    .dyn_into::<ServiceWorkerRegistration>()
                    .map(|registration| registration.scope())
                    .unwrap_or_default();
                log_event(
                    LogLevel::Info,
                    "service_worker_registered",
                    serde_json::json!({ "scope": scope }),
                );
            }
            Err(error) => log_event(
                LogLevel::Warn,
                "service_worker_failed",
                serde_json::json!({ "message": format!("{error:?}") }),
            ),
        }
    });
}

pub struct DomPage {
    window: Window,
    document: Document,
    observers: RefCell<Vec<(IntersectionObserver, ObserverCallback)>>,
}

impl DomPage {
    pub fn new() -> Option<Self> {
        let window = window()?;
        let document = window.document()?;

        Some(Self {
            window,
            document,
            observers: RefCell::new(Vec::new()),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }
}

impl Drop for DomPage {
    fn drop(&mut self) {
        for (observer, _) in self.observers.borrow().iter() {
            observer.disconnect();
        }
    }
}

impl Page for DomPage {
    type Node = Element;

    fn find(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn find_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(1280.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(720.0);

        Viewport { width, height }
    }

    fn offset_top(&self, node: &Element) -> f64 {
        Self::html(node)
            .map(|element| f64::from(element.offset_top()))
            .unwrap_or(0.0)
    }

    fn offset_height(&self, node: &Element) -> f64 {
        Self::html(node)
            .map(|element| f64::from(element.offset_height()))
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect {
            top: rect.top(),
            bottom: rect.bottom(),
        }
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) {
        let _ = node.class_list().toggle_with_force(class, on);
    }

    fn style(&self, node: &Element, property: &str) -> Option<String> {
        Self::html(node)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(element) = Self::html(node) {
            let _ = element.style().set_property(property, value);
        }
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn observe_visibility(
        &self,
        nodes: Vec<Element>,
        options: VisibilityOptions,
        on_visible: VisibilityCallback<Element>,
    ) {
        if nodes.is_empty() {
            return;
        }

        let callback = ObserverCallback::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }

                let target = entry.target();
                observer.unobserve(&target);
                on_visible(&target);
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(options.root_margin);

        let Ok(observer) =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        else {
            return;
        };

        for node in &nodes {
            observer.observe(node);
        }

        self.observers.borrow_mut().push((observer, callback));
    }
}

/// `setTimeout`-backed scheduler. Dropping it cancels everything pending.
#[derive(Default)]
pub struct BrowserScheduler {
    next_id: Cell<u64>,
    pending: Rc<RefCell<HashMap<u64, Timeout>>>,
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let pending = Rc::clone(&self.pending);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            pending.borrow_mut().remove(&id);
            task();
        });

        self.pending.borrow_mut().insert(id, timeout);
        TaskId(id)
    }

    fn cancel(&self, id: TaskId) {
        let canceled = self.pending.borrow_mut().remove(&id.0);
        drop(canceled);
    }
}

/// Toasts live directly under `<body>`, outside the Yew root.
pub struct DomNotificationSurface {
    document: Document,
    on_close: RefCell<Option<Rc<dyn Fn()>>>,
    close_listeners: RefCell<HashMap<NotificationId, EventListener>>,
}

impl DomNotificationSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            on_close: RefCell::new(None),
            close_listeners: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_on_close(&self, on_close: Rc<dyn Fn()>) {
        *self.on_close.borrow_mut() = Some(on_close);
    }

    fn node(&self, id: NotificationId) -> Option<Element> {
        self.document
            .query_selector(&format!(".notification[data-notification-id=\"{}\"]", id.0))
            .ok()
            .flatten()
    }

    fn build(&self, notification: &Notification) -> Option<Element> {
        let container = self.document.create_element("div").ok()?;
        container.set_class_name(&format!(
            "notification notification-{}",
            notification.kind.as_str()
        ));
        let _ = container.set_attribute("role", "status");
        let _ = container.set_attribute("aria-live", "polite");
        let _ = container.set_attribute("data-notification-id", &notification.id.0.to_string());

        let headline = self.document.create_element("strong").ok()?;
        headline.set_text_content(Some(notification.kind.headline()));
        let message = self.document.create_element("span").ok()?;
        message.set_class_name("notification-message");
        message.set_text_content(Some(&notification.message));
        let close = self.document.create_element("button").ok()?;
        close.set_class_name("notification-close");
        let _ = close.set_attribute("type", "button");
        let _ = close.set_attribute("aria-label", "Dismiss notification");
        close.set_text_content(Some("×"));

        let _ = container.append_child(&headline);
        let _ = container.append_child(&message);
        let _ = container.append_child(&close);

        if let Some(on_close) = self.on_close.borrow().clone() {
            let listener = EventListener::new(&close, "click", move |_| on_close());
            self.close_listeners
                .borrow_mut()
                .insert(notification.id, listener);
        }

        Some(container)
    }
}

impl NotificationSurface for DomNotificationSurface {
    fn clear_channel(&self) {
        if let Ok(list) = self.document.query_selector_all(".notification") {
            for index in 0..list.length() {
                if let Some(element) = list.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
                    element.remove();
                }
            }
        }
        self.close_listeners.borrow_mut().clear();
    }

    fn mount(&self, notification: &Notification) {
        let Some(body) = self.document.body() else {
            return;
        };
        if let Some(element) = self.build(notification) {
            let _ = body.append_child(&element);
        }
    }

    fn set_phase(&self, id: NotificationId, phase: Phase) {
        let Some(element) = self.node(id) else {
            return;
        };
        let classes = element.class_list();
        let _ = classes.toggle_with_force("is-visible", phase == Phase::Visible);
        let _ = classes.toggle_with_force("is-exiting", phase == Phase::Exiting);
    }

    fn detach(&self, id: NotificationId) {
        if let Some(element) = self.node(id) {
            element.remove();
        }
        self.close_listeners.borrow_mut().remove(&id);
    }
}

/// Eased scrolling driven by animation frames. A new request replaces the
/// one in flight.
pub struct SmoothScroller {
    window: Window,
    frame: RefCell<Option<AnimationFrame>>,
}

impl SmoothScroller {
    pub fn new() -> Option<Rc<Self>> {
        Some(Rc::new(Self {
            window: window()?,
            frame: RefCell::new(None),
        }))
    }

    pub fn scroll_to_section(self: &Rc<Self>, page: &DomPage, id: &str, header_offset: f64, duration_ms: f64) -> bool {
        let Some(section) = page.find(&format!("#{id}")) else {
            return false;
        };

        let destination = scroll_destination(page.offset_top(&section), header_offset);
        self.scroll_to(destination, duration_ms);
        push_hash(id);
        true
    }

    pub fn scroll_to(self: &Rc<Self>, destination: f64, duration_ms: f64) {
        if prefers_reduced_motion() || duration_ms <= 0.0 {
            self.frame.borrow_mut().take();
            self.window.scroll_to_with_x_and_y(0.0, destination);
            return;
        }

        let from = self.window.scroll_y().unwrap_or(0.0);
        self.step(ScrollAnimation::new(from, destination, duration_ms), None);
    }

    fn step(self: &Rc<Self>, animation: ScrollAnimation, started_at: Option<f64>) {
        let scroller = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| {
            let started_at = started_at.unwrap_or(timestamp);
            let elapsed = timestamp - started_at;
            scroller
                .window
                .scroll_to_with_x_and_y(0.0, animation.position_at(elapsed));

            if animation.is_done(elapsed) {
                scroller.frame.borrow_mut().take();
            } else {
                scroller.step(animation, Some(started_at));
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }
}
