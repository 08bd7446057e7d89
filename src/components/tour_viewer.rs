// src/components/tour_viewer.rs
use crate::geometry::{project_hotspot, DisplayGeometry, VIEWPORT_WIDTH};
use crate::markdown::markdown_to_html;
use crate::session::{Advance, CompletionHooks, Position, TourSession};
use crate::stats::{format_duration, SessionStats};
use crate::tour_data::{Group, TourConfig, TourImage};
use gloo::events::EventListener;
use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlImageElement, KeyboardEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TourViewerProps {
    pub config: TourConfig,
    /// Show hotspot outlines from the start (also toggled at runtime with
    /// Ctrl+L).
    #[prop_or_default]
    pub debug: bool,
    #[prop_or_default]
    pub on_complete: Callback<()>,
}

pub enum TourViewerMsg {
    StartTour,
    HotspotClicked,
    JumpTo(Position),
    ArrowNext,
    ArrowPrevious,
    ToggleHotspotOutlines,
    ImageLoadedWithDimensions(u32, u32),
    ImageFailed,
    ContentClicked,
    TryAgain,
}

#[derive(Clone, Copy, PartialEq)]
enum Phase {
    Intro,
    Touring,
    Finished,
}

/// Render driver for one guided tour. All progression decisions live in
/// [`TourSession`]; this component translates DOM events into session calls
/// and redraws from the resulting state.
pub struct TourViewer {
    group: Option<Group>,
    session: Option<TourSession>,
    stats: SessionStats,
    hooks: CompletionHooks,
    phase: Phase,
    /// Display geometry for the current slide, known once its bitmap loads.
    geometry: Option<DisplayGeometry>,
    image_error: bool,
    show_boxes: bool,
    _keydown: EventListener,
}

impl Component for TourViewer {
    type Message = TourViewerMsg;
    type Properties = TourViewerProps;

    fn create(ctx: &Context<Self>) -> Self {
        let group = match ctx.props().config.first_group() {
            Some(group) => Some(group.clone()),
            None => {
                log::error!("Invalid configuration: no groups found");
                None
            }
        };

        // A session build failure leaves the widget inert, per the error
        // taxonomy: log, no partial state.
        let session = group.as_ref().and_then(|g| match TourSession::new(g) {
            Ok(session) => Some(session),
            Err(e) => {
                log::error!("Failed to start tour: {}", e);
                None
            }
        });

        let mut hooks = CompletionHooks::new();
        let on_complete = ctx.props().on_complete.clone();
        hooks.register(move || on_complete.emit(()));

        let keydown = {
            let link = ctx.link().clone();
            EventListener::new(&document(), "keydown", move |event| {
                let Some(e) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if e.ctrl_key() && e.key().eq_ignore_ascii_case("l") {
                    e.prevent_default();
                    link.send_message(TourViewerMsg::ToggleHotspotOutlines);
                    return;
                }
                match e.key().as_str() {
                    "ArrowRight" => {
                        e.prevent_default();
                        link.send_message(TourViewerMsg::ArrowNext);
                    }
                    "ArrowLeft" => {
                        e.prevent_default();
                        link.send_message(TourViewerMsg::ArrowPrevious);
                    }
                    _ => {}
                }
            })
        };

        Self {
            group,
            session,
            stats: SessionStats::start(js_sys::Date::now()),
            hooks,
            phase: Phase::Intro,
            geometry: None,
            image_error: false,
            show_boxes: ctx.props().debug,
            _keydown: keydown,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            TourViewerMsg::StartTour => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                session.begin();
                self.phase = Phase::Touring;
                self.clear_slide_state();
                true
            }
            TourViewerMsg::HotspotClicked => {
                if self.phase != Phase::Touring {
                    return false;
                }
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                let from_image = session.current().image;
                match session.advance() {
                    Advance::Moved(pos) => {
                        if pos.image != from_image {
                            self.clear_slide_state();
                        }
                        true
                    }
                    Advance::Completed => {
                        self.stats.freeze(js_sys::Date::now());
                        self.hooks.notify();
                        self.phase = Phase::Finished;
                        true
                    }
                }
            }
            TourViewerMsg::JumpTo(pos) => self.move_cursor(|session| {
                // Unreachable targets are silently rejected inside the
                // session; a stale pagination click is not an error.
                if session.jump_to(pos) {
                    Some(pos)
                } else {
                    None
                }
            }),
            TourViewerMsg::ArrowNext => self.move_cursor(|session| {
                // Arrow-forward only re-walks unlocked territory; fresh steps
                // must come from hotspot clicks.
                let target = session.next(session.current())?;
                if session.jump_to(target) {
                    Some(target)
                } else {
                    None
                }
            }),
            TourViewerMsg::ArrowPrevious => self.move_cursor(|session| {
                let target = session.previous(session.current())?;
                if session.retreat() {
                    Some(target)
                } else {
                    None
                }
            }),
            TourViewerMsg::ToggleHotspotOutlines => {
                self.show_boxes = !self.show_boxes;
                true
            }
            TourViewerMsg::ImageLoadedWithDimensions(width, height) => {
                // One-shot per slide: geometry is fixed from here until the
                // slide changes, never recomputed on resize.
                self.geometry = Some(DisplayGeometry::fit(
                    width as f64,
                    height as f64,
                    VIEWPORT_WIDTH,
                ));
                true
            }
            TourViewerMsg::ImageFailed => {
                log::warn!("Failed to load slide bitmap");
                self.image_error = true;
                true
            }
            TourViewerMsg::ContentClicked => {
                self.stats.record_click();
                false
            }
            TourViewerMsg::TryAgain => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                session.reset();
                session.begin();
                self.hooks.reset();
                self.stats = SessionStats::start(js_sys::Date::now());
                self.phase = Phase::Touring;
                self.clear_slide_state();
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old: &Self::Properties) -> bool {
        if ctx.props().config == old.config {
            return false;
        }
        *self = <Self as Component>::create(ctx);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(|_| TourViewerMsg::ContentClicked);

        let body = match (&self.group, &self.session) {
            (Some(group), Some(session)) => match self.phase {
                Phase::Intro => self.render_intro(ctx, group),
                Phase::Touring => self.render_slide(ctx, group, session),
                Phase::Finished => self.render_end_page(ctx, session),
            },
            _ => html! {
                <div class="viewer-error">{"Error: Invalid tour configuration."}</div>
            },
        };

        html! {
            <div class="tour-viewer">
                <div class="viewer-content" {onclick}>
                    { body }
                </div>
            </div>
        }
    }
}

impl TourViewer {
    /// Runs a cursor move against the session and resets per-slide state when
    /// the move lands on a different image. Returns whether a redraw is due.
    /// Moves are accepted from the end page too: a completed tour stays open
    /// for free review, with the completion latch (and so full reachability)
    /// intact.
    fn move_cursor<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&mut TourSession) -> Option<Position>,
    {
        if self.phase == Phase::Intro {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let from_image = session.current().image;
        match op(session) {
            Some(pos) => {
                if pos.image != from_image {
                    self.clear_slide_state();
                }
                self.phase = Phase::Touring;
                true
            }
            None => false,
        }
    }

    fn clear_slide_state(&mut self) {
        self.geometry = None;
        self.image_error = false;
    }

    fn render_intro(&self, ctx: &Context<Self>, group: &Group) -> Html {
        let start = ctx.link().callback(|_| TourViewerMsg::StartTour);
        html! {
            <div class="intro-page">
                <h2>{ group.title.clone() }</h2>
                { match &group.description {
                    Some(text) => markdown_block(text, "intro-description"),
                    None => html! {},
                } }
                <button class="viewer-button" onclick={start}>{"Continue"}</button>
            </div>
        }
    }

    fn render_slide(&self, ctx: &Context<Self>, group: &Group, session: &TourSession) -> Html {
        // Self-healing per the error taxonomy: an out-of-range image index
        // falls back to the first slide instead of killing the session.
        let mut image_index = session.current().image;
        if image_index >= group.images.len() {
            log::warn!("Image index {} out of bounds, showing slide 0", image_index);
            image_index = 0;
        }
        let image = &group.images[image_index];

        if image.src.is_empty() {
            return html! {
                <>
                    <div class="viewer-error">
                        { format!("Error: Invalid image data for image index {}.", image_index) }
                    </div>
                    { self.render_pagination(ctx, group, session) }
                </>
            };
        }

        let onload = {
            let link = ctx.link().clone();
            Callback::from(move |e: Event| {
                if let Some(target) = e.target() {
                    if let Ok(img) = target.dyn_into::<HtmlImageElement>() {
                        link.send_message(TourViewerMsg::ImageLoadedWithDimensions(
                            img.natural_width(),
                            img.natural_height(),
                        ));
                    }
                }
            })
        };
        let onerror = ctx.link().callback(|_: Event| TourViewerMsg::ImageFailed);

        let current_box = image.boxes.get(session.current().hotspot);
        let description = current_box.and_then(|b| b.description.as_deref());

        html! {
            <>
                { match &image.title {
                    Some(title) => markdown_block(title, "viewer-description slide-title"),
                    None => html! {},
                } }
                <div class="viewer-image-container">
                    <div class="viewer-image-wrapper" style={format!("width: {}px;", VIEWPORT_WIDTH)}>
                        { if self.image_error {
                            html! {
                                <div class="viewer-error">
                                    { format!("Error: Failed to load image at index {}.", image_index) }
                                </div>
                            }
                        } else {
                            html! {
                                <img src={image.src.clone()} {onload} {onerror}
                                    style={format!("max-width: {}px; height: auto;", VIEWPORT_WIDTH)} />
                            }
                        } }
                        { match description {
                            Some(text) => markdown_block(text, "viewer-description"),
                            None => html! {},
                        } }
                        { self.render_hotspot_overlay(ctx, image, session) }
                    </div>
                </div>
                { self.render_pagination(ctx, group, session) }
            </>
        }
    }

    /// Overlay for the hotspot at the current position only; earlier and
    /// later hotspots on the same slide are never shown simultaneously.
    fn render_hotspot_overlay(
        &self,
        ctx: &Context<Self>,
        image: &TourImage,
        session: &TourSession,
    ) -> Html {
        let Some(geometry) = self.geometry else {
            // Bitmap not loaded yet, nothing to position against.
            return html! {};
        };
        let Some(hotspot) = image.boxes.get(session.current().hotspot) else {
            return html! {};
        };
        if self.image_error {
            return html! {};
        }

        let rect = project_hotspot(hotspot, image, geometry.scale);
        // No stop_propagation here: the click also bubbles to the content
        // container and lands in the interaction counter.
        let onclick = ctx.link().callback(|_: MouseEvent| TourViewerMsg::HotspotClicked);
        let box_class = if self.show_boxes {
            "viewer-box show-box-debug"
        } else {
            "viewer-box"
        };

        html! {
            <div class="box-overlay"
                style={format!(
                    "position: absolute; top: 0; left: {}px; width: {}px; min-height: {}px;",
                    geometry.left_offset, geometry.width, geometry.height
                )}>
                <div style={format!("position: absolute; left: {}px; top: {}px;", rect.x, rect.y)}>
                    <div class={box_class} {onclick}
                        style={format!("width: {}px; height: {}px;", rect.width, rect.height)}>
                        { match (self.show_boxes, &hotspot.title) {
                            (true, Some(title)) => html! {
                                <div class="viewer-box-title">{ title.clone() }</div>
                            },
                            _ => html! {},
                        } }
                    </div>
                </div>
            </div>
        }
    }

    fn render_pagination(&self, ctx: &Context<Self>, group: &Group, session: &TourSession) -> Html {
        let current = session.current();
        let dots = group.images.iter().enumerate().flat_map(|(image_index, image)| {
            (0..image.boxes.len()).map(move |hotspot| Position::new(image_index, hotspot))
        });

        html! {
            <div class="pagination-container">
                { for dots.map(|pos| {
                    let mut class = classes!("pagination-dot");
                    if pos == current {
                        class.push("current");
                    } else if session.is_visited(pos) {
                        class.push("completed");
                    } else {
                        class.push("not-completed");
                    }
                    if session.is_reachable(pos) {
                        class.push("clickable");
                        let onclick = ctx.link().callback(move |_| TourViewerMsg::JumpTo(pos));
                        html! { <div {class} {onclick}></div> }
                    } else {
                        class.push("not-clickable");
                        html! { <div {class}></div> }
                    }
                }) }
                <div class="pagination-info">
                    <span class="pagination-progress">
                        { format!("Step {} of {}", session.step_number(current), session.total_steps()) }
                    </span>
                    <span class="pagination-remaining">
                        { format!("({} completed)", session.visited_count()) }
                    </span>
                </div>
            </div>
        }
    }

    fn render_end_page(&self, ctx: &Context<Self>, session: &TourSession) -> Html {
        let try_again = ctx.link().callback(|_| TourViewerMsg::TryAgain);
        let time_string = format_duration(self.stats.elapsed_ms(js_sys::Date::now()));

        html! {
            <div class="end-page">
                <h2>{"Congratulations! 🎉"}</h2>
                <p>{"You have successfully completed the interactive demo"}</p>
                <div class="stats-panel">
                    <h3>{"Your Results"}</h3>
                    <div class="stats-time">{ format!("Completed in {}", time_string) }</div>
                    <div class="stats-detail">
                        { format!("{} steps • {} clicks", session.total_steps(), self.stats.click_count()) }
                    </div>
                </div>
                <p>{"If you would like to practice again or review the steps, click \"Try Again\" below."}</p>
                <button class="viewer-button" onclick={try_again}>{"Try Again"}</button>
            </div>
        }
    }
}

fn markdown_block(text: &str, class: &'static str) -> Html {
    let rendered = Html::from_html_unchecked(AttrValue::from(markdown_to_html(text)));
    html! { <div class={class}>{ rendered }</div> }
}
