use crate::engine::Tick;
use crate::protocol::Command;
use async_channel::Sender;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    /// `status` request; the rendered frame goes back on the sender.
    Status(Sender<String>),
    Tick(Tick),
    ConfigReload,
}
