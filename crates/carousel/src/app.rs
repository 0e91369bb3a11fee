use crate::config::{self, Config};
use crate::engine::{CarouselController, RenderFrame, Timer};
use crate::events::AppEvent;
use crate::protocol::Command;
use async_channel::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the one controller of the daemon and applies events to it strictly in
/// the order they arrive.
pub struct AppModel<T: Timer> {
    pub controller: CarouselController<T>,
    last_shown: Option<usize>,
}

impl<T: Timer> AppModel<T> {
    pub fn new(config: &Config, timer: T) -> Self {
        let controller =
            CarouselController::new(config.items.clone(), config.carousel_options(), timer);
        let mut model = Self {
            controller,
            last_shown: None,
        };
        model.report();
        model
    }

    pub async fn run(&mut self, rx: Receiver<AppEvent>) {
        while let Ok(event) = rx.recv().await {
            if self.update(event) == Flow::Quit {
                break;
            }
        }
        self.controller.dispose();
        log::info!("Carousel stopped");
    }

    pub fn update(&mut self, event: AppEvent) -> Flow {
        let flow = match event {
            AppEvent::Command(command) => self.apply(command),
            AppEvent::Status(reply) => {
                let _ = reply.try_send(self.controller.render().to_string());
                Flow::Continue
            }
            AppEvent::Tick(tick) => {
                self.controller.on_tick(tick);
                Flow::Continue
            }
            AppEvent::ConfigReload => {
                match config::load_config() {
                    Ok(new_config) => self.reload(&new_config),
                    Err(e) => log::error!("Failed to reload config: {}", e),
                }
                Flow::Continue
            }
        };
        self.report();
        flow
    }

    pub fn reload(&mut self, config: &Config) {
        self.controller
            .reconfigure(config.items.clone(), config.carousel_options());
        log::info!("Configuration reloaded ({} items)", config.items.len());
    }

    fn apply(&mut self, command: Command) -> Flow {
        let c = &mut self.controller;
        match command {
            Command::Next => c.next(),
            Command::Prev => c.prev(),
            Command::GoTo(index) => c.go_to(index),
            Command::Resize(width) => c.on_resize(width),
            Command::DragStart => c.drag_start(),
            Command::DragMove {
                offset_x,
                velocity_x,
            } => c.drag_move(offset_x, velocity_x),
            Command::DragEnd {
                offset_x,
                velocity_x,
            } => {
                let gesture = c.drag_end(offset_x, velocity_x);
                log::debug!("Drag released: {}", gesture);
            }
            Command::Pause => c.pause(),
            Command::Resume => c.resume(),
            // answered by the server through AppEvent::Status
            Command::Status => {}
            Command::Dispose => {
                c.dispose();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    fn report(&mut self) {
        let frame = self.controller.render();
        let shown = match &frame {
            RenderFrame::Empty => None,
            RenderFrame::Cards { current, .. } => Some(*current),
        };
        if shown == self.last_shown {
            return;
        }
        self.last_shown = shown;

        match frame
            .cards()
            .iter()
            .find(|card| card.slot.position == 0)
        {
            Some(center) => log::info!(
                "Showing '{}' ({}/{})",
                center.key,
                center.slot.source_index + 1,
                self.controller.item_count()
            ),
            None => log::info!("Carousel is empty"),
        }
    }
}
