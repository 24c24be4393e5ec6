use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::scheduler::{millis, Scheduler, TaskId};
use crate::telemetry::{log_event, LogLevel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    /// Neutral styling, used when a caller names a kind we do not know.
    Info,
}

impl NotificationKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Success => "Success!",
            Self::Warning => "Warning!",
            Self::Error => "Error!",
            Self::Info => "Notice",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotifyTimings {
    /// Gap between insertion and the visible state, so the transition
    /// starts on a later frame.
    pub enter: Duration,
    /// Lifetime measured from creation.
    pub visible: Duration,
    pub exit: Duration,
}

impl Default for NotifyTimings {
    fn default() -> Self {
        Self {
            enter: millis(10),
            visible: millis(5_000),
            exit: millis(500),
        }
    }
}

pub trait NotificationSurface {
    /// Detaches every notification node in the channel, without animation.
    fn clear_channel(&self);
    fn mount(&self, notification: &Notification);
    fn set_phase(&self, id: NotificationId, phase: Phase);
    fn detach(&self, id: NotificationId);
}

struct Active {
    id: NotificationId,
    phase: Phase,
    timers: Vec<TaskId>,
}

struct NotifierInner {
    surface: Rc<dyn NotificationSurface>,
    scheduler: Rc<dyn Scheduler>,
    timings: NotifyTimings,
    next_id: RefCell<u64>,
    active: RefCell<Option<Active>>,
}

#[derive(Clone)]
pub struct Notifier {
    inner: Rc<NotifierInner>,
}

impl Notifier {
    pub fn new(
        surface: Rc<dyn NotificationSurface>,
        scheduler: Rc<dyn Scheduler>,
        timings: NotifyTimings,
    ) -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                surface,
                scheduler,
                timings,
                next_id: RefCell::new(0),
                active: RefCell::new(None),
            }),
        }
    }

    pub fn notify(&self, message: &str, kind: NotificationKind) -> NotificationId {
        let inner = &self.inner;

        if let Some(previous) = inner.active.borrow_mut().take() {
            for timer in previous.timers {
                inner.scheduler.cancel(timer);
            }
        }
        inner.surface.clear_channel();

        let id = {
            let mut next_id = inner.next_id.borrow_mut();
            *next_id += 1;
            NotificationId(*next_id)
        };

        let notification = Notification {
            id,
            message: message.to_string(),
            kind,
        };
        inner.surface.mount(&notification);
        *inner.active.borrow_mut() = Some(Active {
            id,
            phase: Phase::Entering,
            timers: Vec::new(),
        });

        let weak = Rc::downgrade(inner);
        let enter_timer = inner.scheduler.schedule(
            inner.timings.enter,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.show(id);
                }
            }),
        );

        let weak = Rc::downgrade(inner);
        let expire_timer = inner.scheduler.schedule(
            inner.timings.visible,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.begin_exit(id);
                }
            }),
        );

        if let Some(active) = inner.active.borrow_mut().as_mut() {
            active.timers = vec![enter_timer, expire_timer];
        }

        log_event(
            LogLevel::Debug,
            "notification_shown",
            serde_json::json!({ "id": id.0, "kind": kind.as_str() }),
        );

        id
    }

    /// Like [`Notifier::notify`] for kinds named by string. Unknown kinds
    /// get the neutral style and are logged.
    pub fn notify_raw(&self, message: &str, kind: &str) -> NotificationId {
        let resolved = NotificationKind::parse(kind).unwrap_or_else(|| {
            log_event(
                LogLevel::Warn,
                "notification_kind_unrecognized",
                serde_json::json!({ "kind": kind }),
            );
            NotificationKind::Info
        });

        self.notify(message, resolved)
    }

    /// Starts the exit transition of the current notification now. Returns
    /// false when nothing is showing or it is already leaving.
    pub fn dismiss(&self) -> bool {
        let inner = &self.inner;
        let (id, timers) = {
            let mut active = inner.active.borrow_mut();
            let Some(current) = active.as_mut() else {
                return false;
            };
            if current.phase == Phase::Exiting {
                return false;
            }
            (current.id, std::mem::take(&mut current.timers))
        };

        for timer in timers {
            inner.scheduler.cancel(timer);
        }
        inner.begin_exit(id);
        true
    }

    pub fn current(&self) -> Option<(NotificationId, Phase)> {
        self.inner
            .active
            .borrow()
            .as_ref()
            .map(|active| (active.id, active.phase))
    }
}

impl NotifierInner {
    fn show(&self, id: NotificationId) {
        let moved = {
            let mut active = self.active.borrow_mut();
            match active.as_mut() {
                Some(current) if current.id == id && current.phase == Phase::Entering => {
                    current.phase = Phase::Visible;
                    true
                }
                _ => false,
            }
        };

        if moved {
            self.surface.set_phase(id, Phase::Visible);
        }
    }

    fn begin_exit(self: &Rc<Self>, id: NotificationId) {
        {
            let mut active = self.active.borrow_mut();
            match active.as_mut() {
                Some(current) if current.id == id && current.phase != Phase::Exiting => {
                    current.phase = Phase::Exiting;
                }
                _ => return,
            }
        }

        self.surface.set_phase(id, Phase::Exiting);

        let weak: Weak<Self> = Rc::downgrade(self);
        let detach_timer = self.scheduler.schedule(
            self.timings.exit,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.finish(id);
                }
            }),
        );

        if let Some(active) = self.active.borrow_mut().as_mut() {
            active.timers = vec![detach_timer];
        }
    }

    fn finish(&self, id: NotificationId) {
        let finished = {
            let mut active = self.active.borrow_mut();
            match active.as_ref() {
                Some(current) if current.id == id => {
                    *active = None;
                    true
                }
                _ => false,
            }
        };

        if finished {
            self.surface.detach(id);
        }
    }
}
