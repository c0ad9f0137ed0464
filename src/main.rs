mod logger;
mod screen;
mod style;
mod widget;

use screen::PanelError;
use screen::panel::{self, ChartPanel};

use data::Config;
use data::load::{LoadGuard, LoadTicket};
use data::region::{RegionList, Selection};
use data::{RawRecord, Region};

use iced::widget::{column, container, pick_list, row, text};
use iced::{Alignment, Element, Length, Task};

fn main() -> iced::Result {
    let config = Config::load();

    let debug_log = config.as_ref().is_ok_and(|c| c.debug_log);
    if let Err(e) = logger::setup(debug_log) {
        eprintln!("Failed to initialize logger: {e}");
    }

    let config = config.unwrap_or_else(|e| {
        log::warn!("Using default config: {e}");
        Config::default().with_env()
    });
    log::info!(
        "Starting with api_url={} region={}",
        config.api_url,
        config.initial_region
    );

    iced::application(
        move || Cv19Chart::new(config.clone()),
        Cv19Chart::update,
        Cv19Chart::view,
    )
    .title(Cv19Chart::title)
    .window_size(iced::Size::new(1100.0, 900.0))
    .run()
}

#[derive(Debug, Clone)]
enum Message {
    RegionsLoaded(Result<Vec<Region>, String>),
    RegionSelected(Region),
    RegionLoaded(LoadTicket, Result<Vec<RawRecord>, String>),
    Panel(panel::Message),
}

struct Cv19Chart {
    config: Config,
    regions: RegionList,
    selection: Selection,
    guard: LoadGuard,
    panel: ChartPanel,
}

impl Cv19Chart {
    fn new(config: Config) -> (Self, Task<Message>) {
        let selection = Selection::new(config.initial_region.clone());
        let api_url = config.api_url.clone();

        let app = Self {
            config,
            regions: RegionList::default(),
            selection,
            guard: LoadGuard::default(),
            panel: ChartPanel::new(),
        };

        let fetch = Task::perform(
            async move {
                feed::fetch_regions(&api_url)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::RegionsLoaded,
        );

        (app, fetch)
    }

    fn title(&self) -> String {
        format!("cv19.report - {}", self.regions.label_of(self.selection.code()))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RegionsLoaded(result) => {
                match result {
                    Ok(regions) => self.regions = RegionList::new(regions),
                    Err(e) => log::error!("Failed to fetch region list: {e}"),
                }
                self.load_selected()
            }
            Message::RegionSelected(region) => match self.selection.select(&region.value) {
                Some(changed) => {
                    log::info!("Selected {} ({})", changed.code, changed.share_path);
                    self.load_selected()
                }
                None => Task::none(),
            },
            Message::RegionLoaded(ticket, result) => {
                if !self.guard.accept(&ticket) {
                    return Task::none();
                }

                let label = self.regions.label_of(&ticket.region).to_string();
                match result {
                    Ok(records) => self.panel.set_data(&label, &records),
                    Err(reason) => self.panel.fail(PanelError::Fetch {
                        region: label,
                        reason,
                    }),
                }
                Task::none()
            }
            Message::Panel(message) => {
                self.panel.update(message);
                Task::none()
            }
        }
    }

    fn load_selected(&mut self) -> Task<Message> {
        let code = self.selection.code().to_string();
        let ticket = self.guard.begin(&code);
        self.panel.set_loading(self.regions.label_of(&code));

        log::debug!("Fetching {code} (generation {})", ticket.generation);

        let api_url = self.config.api_url.clone();
        Task::perform(
            async move {
                feed::fetch_region(&api_url, &code)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::RegionLoaded(ticket, result),
        )
    }

    fn view(&self) -> Element<'_, Message> {
        let selected = self.regions.get(self.selection.code()).cloned();

        let header = row![
            text("Region").size(14),
            pick_list(self.regions.regions(), selected, Message::RegionSelected)
                .placeholder("Loading regions...")
                .text_size(14),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        container(
            column![header, self.panel.view().map(Message::Panel)]
                .spacing(8)
                .height(Length::Fill),
        )
        .padding(12)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}
