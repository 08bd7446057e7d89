// src/main.rs
mod components;
mod geometry;
mod markdown;
mod session;
mod stats;
mod tour_data;
mod utils;

use components::tour_viewer::TourViewer;
use gloo_net::http::Request;
use tour_data::TourConfig;
use utils::resource_url;
use yew::prelude::*;

/// A tour config paired with the id it was loaded under.
#[derive(Clone, PartialEq)]
pub struct TourEntry {
    pub id: String,
    pub config: TourConfig,
}

pub enum AppMsg {
    ChangeTour(String),
    ToursLoaded(Vec<TourEntry>),
    TourLoadFailed(String),
    TourCompleted,
}

pub struct App {
    current_tour: String,
    available_tours: Vec<TourEntry>,
    loading: bool,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        // Start loading tour configs
        ctx.link().send_future(async {
            match load_all_tours().await {
                Ok(tours) => AppMsg::ToursLoaded(tours),
                Err(e) => AppMsg::TourLoadFailed(e),
            }
        });

        Self {
            current_tour: String::new(),
            available_tours: Vec::new(),
            loading: true,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ChangeTour(id) => {
                self.current_tour = id;
                true
            }
            AppMsg::ToursLoaded(tours) => {
                self.available_tours = tours;
                self.loading = false;

                // Set the first tour as current if available
                if let Some(first) = self.available_tours.first() {
                    self.current_tour = first.id.clone();
                }
                true
            }
            AppMsg::TourLoadFailed(error) => {
                log::error!("Failed to load tours: {}", error);
                self.loading = false;
                true
            }
            AppMsg::TourCompleted => {
                log::info!("Tour completed: {}", self.current_tour);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! {
                <div class="app-container">
                    <header class="app-header">
                        <h1>{"Guided Tour Viewer"}</h1>
                    </header>
                    <main class="app-main">
                        <div class="loading">{"Loading tours..."}</div>
                    </main>
                </div>
            };
        }

        if self.available_tours.is_empty() {
            return html! {
                <div class="app-container">
                    <header class="app-header">
                        <h1>{"Guided Tour Viewer"}</h1>
                    </header>
                    <main class="app-main">
                        <div class="error">{"No tours found. Please make sure the tour JSON files are present in public/tours/"}</div>
                    </main>
                </div>
            };
        }

        let on_tour_change = ctx.link().callback(AppMsg::ChangeTour);
        let on_complete = ctx.link().callback(|_| AppMsg::TourCompleted);

        let current_entry = self
            .available_tours
            .iter()
            .find(|t| t.id == self.current_tour)
            .cloned();

        let current_title = current_entry
            .as_ref()
            .and_then(|t| t.config.first_group().map(|g| g.title.clone()))
            .unwrap_or_else(|| self.current_tour.clone());

        html! {
            <div class="app-container">
                <header class="app-header">
                    <h1>{"Guided Tour Viewer"}</h1>
                    <p class="subtitle">{format!("Interactive walkthrough - {}", current_title)}</p>
                </header>

                <main class="app-main">
                    <div class="tour-selector">
                        <label for="tour-select">{"Tour: "}</label>
                        <select
                            id="tour-select"
                            onchange={
                                let on_change = on_tour_change.clone();
                                Callback::from(move |e: Event| {
                                    let target = e.target_dyn_into::<web_sys::HtmlSelectElement>();
                                    if let Some(select) = target {
                                        on_change.emit(select.value());
                                    }
                                })
                            }
                        >
                            {for self.available_tours.iter().map(|tour| {
                                let label = tour
                                    .config
                                    .first_group()
                                    .map(|g| g.title.clone())
                                    .unwrap_or_else(|| tour.id.clone());
                                html! {
                                    <option
                                        value={tour.id.clone()}
                                        selected={&self.current_tour == &tour.id}
                                    >
                                        {label}
                                    </option>
                                }
                            })}
                        </select>
                    </div>

                    { match current_entry {
                        Some(entry) => html! {
                            <TourViewer
                                config={entry.config}
                                on_complete={on_complete}
                            />
                        },
                        None => html! {},
                    } }
                </main>

                <footer class="app-footer">
                    <p>{"Guided Tour Viewer © 2026"}</p>
                </footer>
            </div>
        }
    }
}

async fn load_all_tours() -> Result<Vec<TourEntry>, String> {
    // List of known tour ids to check. A directory listing is not available
    // from a static host, so missing ids are simply skipped.
    let tour_ids = vec!["onboarding", "editor-basics", "example"];

    let mut tours = Vec::new();

    for tour_id in tour_ids {
        let tour_url = resource_url(&format!("public/tours/{}.json", tour_id));

        match Request::get(&tour_url).send().await {
            Ok(resp) => {
                if resp.ok() {
                    match resp.json::<TourConfig>().await {
                        Ok(config) => {
                            log::info!("Loaded tour: {}", tour_id);
                            tours.push(TourEntry {
                                id: tour_id.to_string(),
                                config,
                            });
                        }
                        Err(e) => {
                            log::warn!("Failed to parse tour {}: {:?}", tour_id, e);
                        }
                    }
                } else {
                    log::warn!("Tour not found: {}", tour_id);
                }
            }
            Err(e) => {
                log::warn!("Failed to fetch tour {}: {:?}", tour_id, e);
            }
        }
    }

    if tours.is_empty() {
        Err("No tour configs could be loaded".to_string())
    } else {
        Ok(tours)
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
