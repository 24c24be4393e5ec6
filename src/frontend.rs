use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use web_sys::{
    window, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    KeyboardEvent,
};
use yew::prelude::*;

use crate::confetti::{burst, burst_lifetime_ms, PIECE_COUNT};
use crate::dom::{
    is_touch_device, local_today, register_service_worker, BrowserScheduler, DomNotificationSurface,
    DomPage, SmoothScroller,
};
use crate::form::{ButtonState, FormError, FormMessages, FormSurface, FormTimings, SubmitFlow};
use crate::menu::{MenuEvent, MenuKey, MobileMenu};
use crate::notify::{NotificationKind, Notifier, NotifyTimings};
use crate::page::Page;
use crate::reveal::{
    install_card_reveal, install_highlights, install_lazy_images, mark_touch_device,
    number_section_titles, pulse,
};
use crate::scheduler::{millis, Scheduler, TaskId};
use crate::scroll_sync::{ScrollSync, SyncConfig};
use crate::smooth_scroll::{
    anchor_target, BACK_TO_TOP_MS, DEFAULT_DURATION_MS, HEADER_OFFSET_PX, TOP_SECTION,
};
use crate::submission::{HttpBackend, SimulatedBackend, SubmissionBackend};
use crate::telemetry::{log_event, LogLevel};
use crate::validation::{format_date, RentalRequest};

const LOADING_SCREEN_MS: u64 = 1_500;
const RENT_SCROLL_MS: f64 = 1_200.0;
const FOCUS_NAME_DELAY_MS: u64 = 1_300;
const CONFETTI_OVERSHOOT_PX: f64 = 20.0;
const SUBMIT_ENDPOINT_ATTRIBUTE: &str = "data-submit-endpoint";
const OFFLINE_MESSAGE: &str = "You are currently offline. Some features may not work.";
const ONLINE_MESSAGE: &str = "You are back online!";

const NAV_SECTIONS: [(&str, &str); 6] = [
    ("#home", "Home"),
    ("#about", "About"),
    ("#products", "Products"),
    ("#features", "Features"),
    ("#testimonials", "Testimonials"),
    ("#rent", "Rent"),
];

struct Product {
    name: &'static str,
    blurb: &'static str,
    price: &'static str,
    image: &'static str,
}

const PRODUCTS: [Product; 3] = [
    Product {
        name: "Camera",
        blurb: "Full-frame mirrorless body with a 24-70mm lens.",
        price: "$45 / day",
        image: "/img/camera.webp",
    },
    Product {
        name: "Drone",
        blurb: "4K aerial drone with three batteries and a carry case.",
        price: "$60 / day",
        image: "/img/drone.webp",
    },
    Product {
        name: "Projector",
        blurb: "1080p projector with a 100-inch portable screen.",
        price: "$30 / day",
        image: "/img/projector.webp",
    },
];

const SKILLS: [(&str, &str); 3] = [
    ("Customer satisfaction", "98"),
    ("On-time delivery", "95"),
    ("Equipment condition", "92"),
];

const FEATURES: [(&str, &str); 3] = [
    ("Same-day delivery", "Order before noon and the kit arrives the same afternoon."),
    ("Insured rentals", "Every booking includes accidental damage cover."),
    ("Expert support", "Our crew answers setup questions around the clock."),
];

const TESTIMONIALS: [(&str, &str); 2] = [
    ("Rina", "The drone arrived charged and ready. Booking took two minutes."),
    ("Marco", "Projector rental saved our outdoor screening night."),
];

#[derive(Clone, Copy)]
enum Field {
    Name,
    Email,
    Phone,
    Product,
    StartDate,
    EndDate,
    Message,
}

enum FieldAction {
    Edit(Field, String),
    Clear,
}

#[derive(Default, PartialEq)]
struct RentalFields {
    request: RentalRequest,
}

impl Reducible for RentalFields {
    type Action = FieldAction;

    fn reduce(self: Rc<Self>, action: FieldAction) -> Rc<Self> {
        let (field, value) = match action {
            FieldAction::Clear => return Rc::new(Self::default()),
            FieldAction::Edit(field, value) => (field, value),
        };

        let mut request = self.request.clone();
        let slot = match field {
            Field::Name => &mut request.name,
            Field::Email => &mut request.email,
            Field::Phone => &mut request.phone,
            Field::Product => &mut request.product,
            Field::StartDate => &mut request.start_date,
            Field::EndDate => &mut request.end_date,
            Field::Message => &mut request.message,
        };
        *slot = value;

        Rc::new(Self { request })
    }
}

impl Reducible for MobileMenu {
    type Action = MenuEvent;

    fn reduce(self: Rc<Self>, action: MenuEvent) -> Rc<Self> {
        let next = self.apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

/// The pieces of component state the form flow drives from outside Yew.
struct FormHandles {
    fields: UseReducerDispatcher<RentalFields>,
    button: UseStateHandle<ButtonState>,
    shaking: UseStateHandle<bool>,
    end_min: UseStateHandle<String>,
    success_panel: UseStateHandle<bool>,
    confetti: UseStateHandle<Vec<String>>,
}

struct YewFormSurface {
    handles: FormHandles,
    page: Rc<DomPage>,
    scheduler: Rc<dyn Scheduler>,
    confetti_timer: Cell<Option<TaskId>>,
}

impl FormSurface for YewFormSurface {
    fn set_button(&self, state: &ButtonState) {
        self.handles.button.set(state.clone());
    }

    fn set_shaking(&self, on: bool) {
        self.handles.shaking.set(on);
    }

    fn reset_fields(&self) {
        self.handles.fields.dispatch(FieldAction::Clear);
    }

    fn set_end_date_min(&self, value: &str) {
        self.handles.end_min.set(value.to_string());
    }

    fn show_success_panel(&self, on: bool) {
        self.handles.success_panel.set(on);
    }

    fn celebrate(&self) {
        let fall_distance = self
            .page
            .find(".rental-form-container")
            .map(|container| self.page.offset_height(&container))
            .unwrap_or(0.0)
            + CONFETTI_OVERSHOOT_PX;

        let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
        let pieces = burst(&mut rng, PIECE_COUNT);
        let lifetime = burst_lifetime_ms(&pieces);
        self.handles
            .confetti
            .set(pieces.iter().map(|piece| piece.style(fall_distance)).collect());

        if let Some(previous) = self.confetti_timer.take() {
            self.scheduler.cancel(previous);
        }
        let confetti = self.handles.confetti.clone();
        let timer = self
            .scheduler
            .schedule(millis(lifetime), Box::new(move || confetti.set(Vec::new())));
        self.confetti_timer.set(Some(timer));
    }
}

struct Runtime {
    page: Rc<DomPage>,
    scheduler: Rc<dyn Scheduler>,
    notifier: Notifier,
    flow: SubmitFlow,
    sync: Rc<ScrollSync<DomPage>>,
    scroller: Rc<SmoothScroller>,
}

impl Runtime {
    fn new(handles: FormHandles) -> Option<Rc<Self>> {
        let page = Rc::new(DomPage::new()?);
        let scroller = SmoothScroller::new()?;
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::default());

        let toasts = Rc::new(DomNotificationSurface::new(page.document().clone()));
        let notifier = Notifier::new(toasts.clone(), scheduler.clone(), NotifyTimings::default());
        {
            let notifier = notifier.clone();
            toasts.set_on_close(Rc::new(move || {
                notifier.dismiss();
            }));
        }

        let surface = Rc::new(YewFormSurface {
            handles,
            page: page.clone(),
            scheduler: scheduler.clone(),
            confetti_timer: Cell::new(None),
        });
        let flow = SubmitFlow::new(
            surface,
            submission_backend(&page, scheduler.clone()),
            notifier.clone(),
            scheduler.clone(),
            FormTimings::default(),
            FormMessages::default(),
        );
        let sync = Rc::new(ScrollSync::new(page.clone(), SyncConfig::default()));

        Some(Rc::new(Self {
            page,
            scheduler,
            notifier,
            flow,
            sync,
            scroller,
        }))
    }

    /// One-time page enhancements plus the window and document listeners.
    /// Dropping the returned listeners detaches them.
    fn install(
        &self,
        loading: UseStateHandle<bool>,
        menu: UseReducerDispatcher<MobileMenu>,
    ) -> Vec<EventListener> {
        number_section_titles(&*self.page);
        mark_touch_device(&*self.page, is_touch_device());
        let cards = install_card_reveal(&self.page);
        let highlights = install_highlights(&self.page);
        let images = install_lazy_images(&self.page);
        log_event(
            LogLevel::Debug,
            "page_enhanced",
            serde_json::json!({
                "cards": cards,
                "highlights": highlights,
                "lazy_images": images,
            }),
        );

        self.sync.on_resize();
        self.scheduler
            .schedule(millis(LOADING_SCREEN_MS), Box::new(move || loading.set(false)));
        register_service_worker();

        let Some(win) = window() else {
            return Vec::new();
        };
        let document = self.page.document().clone();
        let mut listeners = Vec::new();

        let pending_frame: Rc<RefCell<Option<AnimationFrame>>> = Rc::default();
        {
            let sync = self.sync.clone();
            listeners.push(EventListener::new(&win, "scroll", move |_| {
                if pending_frame.borrow().is_some() {
                    return;
                }

                let sync = sync.clone();
                let slot = pending_frame.clone();
                let frame = request_animation_frame(move |_| {
                    slot.borrow_mut().take();
                    sync.on_scroll_tick();
                });
                *pending_frame.borrow_mut() = Some(frame);
            }));
        }

        for event in ["resize", "orientationchange"] {
            let sync = self.sync.clone();
            listeners.push(EventListener::new(&win, event, move |_| {
                sync.on_resize();
            }));
        }

        {
            let notifier = self.notifier.clone();
            listeners.push(EventListener::new(&win, "offline", move |_| {
                notifier.notify(OFFLINE_MESSAGE, NotificationKind::Warning);
            }));
        }
        {
            let notifier = self.notifier.clone();
            listeners.push(EventListener::new(&win, "online", move |_| {
                notifier.notify(ONLINE_MESSAGE, NotificationKind::Success);
            }));
        }

        {
            let menu = menu.clone();
            listeners.push(EventListener::new(&document, "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    menu.dispatch(MenuEvent::DocumentKey(MenuKey::from_key(&event.key())));
                }
            }));
        }

        {
            let page = self.page.clone();
            listeners.push(EventListener::new(&document, "click", move |event| {
                let target = event.target().and_then(|target| target.dyn_into::<Element>().ok());
                menu.dispatch(MenuEvent::DocumentClick {
                    inside_menu: is_inside(&page, ".nav-links", target.as_ref()),
                    inside_toggle: is_inside(&page, ".menu-toggle", target.as_ref()),
                });
            }));
        }

        listeners
    }

    fn scroll_to_section(&self, id: &str, duration_ms: f64) -> bool {
        self.scroller
            .scroll_to_section(&self.page, id, HEADER_OFFSET_PX, duration_ms)
    }

    fn pulse(&self, node: &Element) {
        pulse(&self.page, &*self.scheduler, node);
    }

    fn focus_name(&self) {
        if let Some(name) = self.page.find("#name") {
            if let Some(input) = name.dyn_ref::<HtmlElement>() {
                let _ = input.focus();
            }
            self.pulse(&name);
        }
    }

    fn focus_name_later(self: &Rc<Self>) {
        let runtime = Rc::clone(self);
        self.scheduler.schedule(
            millis(FOCUS_NAME_DELAY_MS),
            Box::new(move || runtime.focus_name()),
        );
    }
}

/// A real endpoint is used only when the mount point declares one.
fn submission_backend(page: &DomPage, scheduler: Rc<dyn Scheduler>) -> Rc<dyn SubmissionBackend> {
    let endpoint = page
        .document()
        .get_element_by_id("app")
        .and_then(|app| app.get_attribute(SUBMIT_ENDPOINT_ATTRIBUTE))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    log_event(
        LogLevel::Debug,
        "submission_backend_selected",
        serde_json::json!({
            "kind": if endpoint.is_some() { "http" } else { "simulated" },
            "endpoint": endpoint,
        }),
    );

    match endpoint {
        Some(endpoint) => Rc::new(HttpBackend::new(&endpoint)),
        None => Rc::new(SimulatedBackend::new(scheduler)),
    }
}

fn is_inside(page: &DomPage, selector: &str, target: Option<&Element>) -> bool {
    let Some(target) = target else {
        return false;
    };

    page.find(selector)
        .map(|container| page.contains(&container, target))
        .unwrap_or(false)
}

fn control_value(event: &Event) -> String {
    let Some(target) = event.target() else {
        return String::new();
    };

    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    target
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
        .unwrap_or_default()
}

fn on_field_input(fields: &UseReducerDispatcher<RentalFields>, field: Field) -> Callback<InputEvent> {
    let fields = fields.clone();
    Callback::from(move |event: InputEvent| {
        fields.dispatch(FieldAction::Edit(field, control_value(&event)));
    })
}

fn section_link(
    runtime: &Option<Rc<Runtime>>,
    menu: &UseReducerDispatcher<MobileMenu>,
    href: &'static str,
) -> Callback<MouseEvent> {
    let runtime = runtime.clone();
    let menu = menu.clone();
    Callback::from(move |event: MouseEvent| {
        let Some(id) = anchor_target(href) else {
            return;
        };

        event.prevent_default();
        menu.dispatch(MenuEvent::LinkClicked);
        if let Some(runtime) = runtime.as_ref() {
            runtime.scroll_to_section(id, DEFAULT_DURATION_MS);
        }
    })
}

fn rent_button(
    runtime: &Option<Rc<Runtime>>,
    fields: &UseReducerDispatcher<RentalFields>,
    product: &'static str,
) -> Callback<MouseEvent> {
    let runtime = runtime.clone();
    let fields = fields.clone();
    Callback::from(move |event: MouseEvent| {
        fields.dispatch(FieldAction::Edit(Field::Product, product.to_string()));

        let Some(runtime) = runtime.as_ref() else {
            return;
        };
        if let Some(button) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|target| target.closest(".rent-btn").ok().flatten())
        {
            runtime.pulse(&button);
        }
        runtime.scroll_to_section("rent", RENT_SCROLL_MS);
        runtime.focus_name_later();
    })
}

#[function_component(App)]
fn app() -> Html {
    let fields = use_reducer(RentalFields::default);
    let button = use_state(|| ButtonState::idle(FormMessages::default().submit_label));
    let shaking = use_state(|| false);
    let today = use_memo((), |_| format_date(local_today()));
    let end_min = use_state(|| format_date(local_today()));
    let success_panel = use_state(|| false);
    let confetti = use_state(Vec::<String>::new);
    let loading = use_state(|| true);
    let menu = use_reducer(MobileMenu::default);

    let runtime: Option<Rc<Runtime>> = {
        let handles = FormHandles {
            fields: fields.dispatcher(),
            button: button.clone(),
            shaking: shaking.clone(),
            end_min: end_min.clone(),
            success_panel: success_panel.clone(),
            confetti: confetti.clone(),
        };
        (*use_memo((), move |_| Runtime::new(handles))).clone()
    };

    {
        let runtime = runtime.clone();
        let loading = loading.clone();
        let menu = menu.dispatcher();
        use_effect_with((), move |_| {
            let listeners = match runtime.as_ref() {
                Some(runtime) => runtime.install(loading, menu),
                None => {
                    log_event(LogLevel::Warn, "runtime_unavailable", serde_json::json!({}));
                    Vec::new()
                }
            };
            move || drop(listeners)
        });
    }

    let on_menu_click = {
        let menu = menu.dispatcher();
        Callback::from(move |_: MouseEvent| menu.dispatch(MenuEvent::ToggleClicked))
    };

    let on_menu_key = {
        let menu = menu.dispatcher();
        Callback::from(move |event: KeyboardEvent| {
            let key = MenuKey::from_key(&event.key());
            if matches!(key, MenuKey::Enter | MenuKey::Space) {
                event.prevent_default();
            }
            menu.dispatch(MenuEvent::ToggleKey(key));
        })
    };

    let on_back_to_top = {
        let runtime = runtime.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(runtime) = runtime.as_ref() {
                runtime.scroll_to_section(TOP_SECTION, BACK_TO_TOP_MS);
            }
        })
    };

    let on_submit = {
        let runtime = runtime.clone();
        let fields = fields.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(runtime) = runtime.as_ref() else {
                return;
            };

            if let Err(FormError::Busy) = runtime.flow.submit(&fields.request, local_today()) {
                log_event(LogLevel::Debug, "submission_ignored_busy", serde_json::json!({}));
            }
        })
    };

    let on_reset = {
        let runtime = runtime.clone();
        Callback::from(move |event: MouseEvent| {
            let Some(runtime) = runtime.as_ref() else {
                return;
            };

            if runtime.flow.reset(local_today()) {
                if let Some(button) = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                {
                    runtime.pulse(&button);
                }
            }
        })
    };

    let on_new_request = {
        let runtime = runtime.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(runtime) = runtime.as_ref() {
                runtime.flow.new_request(local_today());
                runtime.focus_name_later();
            }
        })
    };

    let on_start_date = {
        let runtime = runtime.clone();
        let fields = fields.dispatcher();
        Callback::from(move |event: InputEvent| {
            let value = control_value(&event);
            if let Some(runtime) = runtime.as_ref() {
                runtime.flow.on_start_date_changed(&value, local_today());
            }
            fields.dispatch(FieldAction::Edit(Field::StartDate, value));
        })
    };

    let on_product = {
        let fields = fields.dispatcher();
        Callback::from(move |event: Event| {
            fields.dispatch(FieldAction::Edit(Field::Product, control_value(&event)));
        })
    };

    let dispatcher = fields.dispatcher();
    let request = &fields.request;

    html! {
        <>
            <div id="loadingScreen" class={classes!("loading-screen", (!*loading).then_some("hidden"))} aria-hidden="true">
                <div class="loader"></div>
            </div>

            <header class="site-header">
                <nav class="navbar" aria-label="Primary">
                    <a class="brand" href="#home" onclick={section_link(&runtime, &menu.dispatcher(), "#home")}>{"RentKit"}</a>
                    <div
                        class="menu-toggle"
                        role="button"
                        tabindex="0"
                        aria-label="Toggle navigation"
                        aria-controls="primaryNav"
                        aria-expanded={menu.aria_expanded()}
                        onclick={on_menu_click}
                        onkeydown={on_menu_key}
                    >
                        <span></span><span></span><span></span>
                    </div>
                    <ul id="primaryNav" class={classes!("nav-links", menu.is_open().then_some("open"))}>
                        { for NAV_SECTIONS.iter().map(|(href, label)| html! {
                            <li>
                                <a class="nav-link" href={*href} onclick={section_link(&runtime, &menu.dispatcher(), *href)}>{*label}</a>
                            </li>
                        }) }
                    </ul>
                </nav>
            </header>

            <main>
                <section id="home" class="hero">
                    <div class="hero-copy">
                        <h1>{"Gear for every shoot, ready when you are"}</h1>
                        <p>{"Rent cameras, drones and projectors by the day."}</p>
                        <a class="btn-custom" href="#rent" onclick={section_link(&runtime, &menu.dispatcher(), "#rent")}>{"Book now"}</a>
                    </div>
                    <div class="hero-shapes" aria-hidden="true">
                        <span class="float-shape float-1"></span>
                        <span class="float-shape float-2"></span>
                        <span class="float-shape float-3"></span>
                    </div>
                </section>

                <section id="about" class="section-block">
                    <h2 class="section-title"><span class="title-number"></span>{"About us"}</h2>
                    <p>{"A small crew of photographers renting out the kit we trust on our own jobs."}</p>
                    <ul class="skills">
                        { for SKILLS.iter().map(|(label, width)| html! {
                            <li class="skill">
                                <span class="skill-label">{*label}<span class="skill-value">{format!("{width}%")}</span></span>
                                <div class="skill-bar"><div class="skill-progress" data-width={*width}></div></div>
                            </li>
                        }) }
                    </ul>
                </section>

                <section id="products" class="section-block">
                    <h2 class="section-title"><span class="title-number"></span>{"Products"}</h2>
                    <div class="card-grid">
                        { for PRODUCTS.iter().map(|product| html! {
                            <article class="product-card">
                                <img data-src={product.image} alt={product.name} width="320" height="200" />
                                <h3>{product.name}</h3>
                                <p>{product.blurb}</p>
                                <p class="price">{product.price}</p>
                                <button
                                    class="rent-btn"
                                    type="button"
                                    data-product={product.name}
                                    onclick={rent_button(&runtime, &dispatcher, product.name)}
                                >
                                    {"Rent now"}
                                </button>
                            </article>
                        }) }
                    </div>
                </section>

                <section id="features" class="section-block">
                    <h2 class="section-title"><span class="title-number"></span>{"Why rent with us"}</h2>
                    <div class="card-grid">
                        { for FEATURES.iter().map(|(title, body)| html! {
                            <article class="feature-card">
                                <h3>{*title}</h3>
                                <p>{*body}</p>
                            </article>
                        }) }
                    </div>
                </section>

                <section id="testimonials" class="section-block">
                    <h2 class="section-title"><span class="title-number"></span>{"Testimonials"}</h2>
                    <div class="card-grid">
                        { for TESTIMONIALS.iter().map(|(author, quote)| html! {
                            <blockquote class="testimonial-card">
                                <p class="highlight">{*quote}</p>
                                <cite>{*author}</cite>
                            </blockquote>
                        }) }
                    </div>
                </section>

                <section id="rent" class="section-block">
                    <h2 class="section-title"><span class="title-number"></span>{"Rent"}</h2>
                    <div class="rental-form-container">
                        <form
                            id="rentalForm"
                            class={classes!("rental-form", (*shaking).then_some("animate__animated animate__shakeX"))}
                            hidden={*success_panel}
                            novalidate=true
                            onsubmit={on_submit}
                        >
                            <label for="name">{"Full name"}</label>
                            <input id="name" type="text" autocomplete="name" value={request.name.clone()} oninput={on_field_input(&dispatcher, Field::Name)} />

                            <label for="email">{"Email"}</label>
                            <input id="email" type="email" autocomplete="email" value={request.email.clone()} oninput={on_field_input(&dispatcher, Field::Email)} />

                            <label for="phone">{"Phone"}</label>
                            <input id="phone" type="tel" autocomplete="tel" value={request.phone.clone()} oninput={on_field_input(&dispatcher, Field::Phone)} />

                            <label for="product">{"Product"}</label>
                            <select id="product" onchange={on_product}>
                                <option value="" selected={request.product.is_empty()}>{"Choose a product"}</option>
                                { for PRODUCTS.iter().map(|product| html! {
                                    <option value={product.name} selected={request.product == product.name}>{product.name}</option>
                                }) }
                            </select>

                            <label for="startDate">{"Start date"}</label>
                            <input id="startDate" type="date" min={(*today).clone()} value={request.start_date.clone()} oninput={on_start_date} />

                            <label for="endDate">{"End date"}</label>
                            <input id="endDate" type="date" min={(*end_min).clone()} value={request.end_date.clone()} oninput={on_field_input(&dispatcher, Field::EndDate)} />

                            <label for="message">{"Notes"}</label>
                            <textarea id="message" rows="3" value={request.message.clone()} oninput={on_field_input(&dispatcher, Field::Message)}></textarea>

                            <div class="form-actions">
                                <button
                                    id="submitBtn"
                                    type="submit"
                                    class={classes!("btn-custom", button.tone.class())}
                                    disabled={button.disabled}
                                    aria-busy={button.busy.to_string()}
                                >
                                    if button.busy {
                                        <span class="spinner" aria-hidden="true"></span>
                                    }
                                    {button.label.clone()}
                                </button>
                                <button id="resetBtn" type="button" class="btn-outline" onclick={on_reset}>{"Reset"}</button>
                            </div>
                        </form>

                        <div id="successMessage" class="success-message animate__animated animate__fadeIn" hidden={!*success_panel}>
                            <h3>{"Request received"}</h3>
                            <p>{"We will confirm availability shortly."}</p>
                            <button id="newRequestBtn" type="button" class="btn-custom" onclick={on_new_request}>{"New request"}</button>
                        </div>

                        <div class="confetti-layer" aria-hidden="true">
                            { for confetti.iter().map(|style| html! {
                                <span class="confetti-piece" style={style.clone()}></span>
                            }) }
                        </div>
                    </div>
                </section>
            </main>

            <button id="backToTop" class="back-to-top" type="button" aria-label="Back to top" onclick={on_back_to_top}>
                {"↑"}
            </button>
        </>
    }
}

pub fn run() {
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
    else {
        log_event(
            LogLevel::Warn,
            "mount_point_missing",
            serde_json::json!({ "id": "app" }),
        );
        return;
    };

    yew::Renderer::<App>::with_root(root).render();
}
