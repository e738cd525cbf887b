//! Region bots.
//!
//! A bot is an in-process client: a [`BotView`] attached to the region
//! forwards chat and teleports to the bot's own task, which ticks the
//! [`Navigator`] and answers admin commands. `!teleport` goes through
//! [`Region::teleport`] like any other move imposed by the region.

mod command;
mod navigation;

pub use command::BotCommand;
pub use navigation::{MotionState, Navigator, Transition};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::config::BotConfig;
use crate::region::{
    CapabilityError, ChatMessage, ChatScope, ClientView, Identity, Presence, Region, Vector3,
};
use crate::state::{ClientId, IdGenerator};

/// Shouted once when the bot enters the region.
pub const GREETING: &str = "Ready to serve, Master.";

/// Movement frame interval.
pub const TICK: Duration = Duration::from_millis(100);

/// Events queued for a bot; overflow is dropped.
pub const EVENT_QUEUE: usize = 64;

const PUBLIC_CHANNEL: i32 = 0;

/// What the region asked of the bot.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Chat(ChatMessage),
    Teleport(Vector3),
}

/// Region-side handle for a bot.
pub struct BotView {
    id: ClientId,
    name: String,
    events: mpsc::Sender<BotEvent>,
    closed: Arc<Notify>,
}

impl BotView {
    fn forward(&self, event: BotEvent) -> Result<(), CapabilityError> {
        match self.events.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                debug!(bot = %self.name, ?event, "Bot queue full, event dropped");
                Err(CapabilityError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(CapabilityError::Closed),
        }
    }
}

impl ClientView for BotView {
    fn id(&self) -> &ClientId {
        &self.id
    }

    fn presence(&self) -> Option<Presence> {
        Some(Presence::new(self.name.clone()))
    }

    fn send_chat(&self, chat: &ChatMessage) -> Result<(), CapabilityError> {
        self.forward(BotEvent::Chat(chat.clone()))
    }

    fn teleport(&self, to: Vector3) -> Result<(), CapabilityError> {
        self.forward(BotEvent::Teleport(to))
    }

    fn disconnect(&self) -> Result<(), CapabilityError> {
        self.closed.notify_one();
        Ok(())
    }
}

pub struct Bot {
    id: ClientId,
    name: String,
    admin: bool,
    position: Vector3,
    navigator: Navigator,
    region: Arc<dyn Region>,
    events: mpsc::Receiver<BotEvent>,
    closed: Arc<Notify>,
}

impl Bot {
    /// Build a bot and the view to attach for it.
    ///
    /// Without a configured last name the bot is called `RexBot<n>`, with
    /// `n` drawn from `ids`.
    pub fn new(
        config: &BotConfig,
        ids: &IdGenerator,
        region: Arc<dyn Region>,
    ) -> (Self, Arc<BotView>) {
        let last = config
            .last_name
            .clone()
            .unwrap_or_else(|| format!("RexBot{}", ids.next_sequence()));
        let name = format!("{} {}", config.first_name, last);
        let id = ids.next_id();
        let (tx, rx) = mpsc::channel(EVENT_QUEUE);
        let closed = Arc::new(Notify::new());
        let view = Arc::new(BotView {
            id,
            name: name.clone(),
            events: tx,
            closed: Arc::clone(&closed),
        });
        let bot = Self {
            id,
            name,
            admin: config.admin,
            position: Vector3::from(config.start),
            navigator: Navigator::new(),
            region,
            events: rx,
            closed,
        };
        (bot, view)
    }

    /// Attach a new bot to `region` and run it on its own task.
    pub fn spawn(config: &BotConfig, ids: &IdGenerator, region: Arc<dyn Region>) -> JoinHandle<()> {
        let (bot, view) = Self::new(config, ids, Arc::clone(&region));
        region.attach(view);
        tokio::spawn(bot.run())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn motion(&self) -> MotionState {
        self.navigator.state()
    }

    #[instrument(skip(self), fields(bot = %self.name()), name = "bot")]
    pub async fn run(mut self) {
        info!(position = %self.position, admin = self.admin, "Bot entered region");
        self.chat(GREETING, ChatScope::Shout);

        let mut ticker = time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(TICK),
                _ = self.closed.notified() => break,
                event = self.events.recv() => match event {
                    Some(event) => self.on_event(event),
                    None => break,
                },
            }
        }

        self.region.detach(&self.id);
        info!(position = %self.position(), "Bot left region");
    }

    fn on_event(&mut self, event: BotEvent) {
        match event {
            BotEvent::Chat(chat) => self.hear(&chat),
            BotEvent::Teleport(to) => self.teleport(to),
        }
    }

    /// Advance movement by one frame.
    pub fn tick(&mut self, dt: Duration) {
        match self.navigator.on_tick(dt, &mut self.position) {
            Some(Transition::Arrived(at)) => debug!(position = %at, "Arrived"),
            Some(Transition::Warped(at)) => info!(position = %at, "Leg timed out, warped"),
            None => {}
        }
    }

    /// React to region chat.
    pub fn hear(&mut self, chat: &ChatMessage) {
        if !self.admin || chat.sender.id == self.id || chat.channel != PUBLIC_CHANNEL {
            return;
        }
        if let Some(command) = BotCommand::parse(&chat.text) {
            debug!(from = %chat.sender.name, ?command, motion = ?self.motion(), "Bot command");
            self.execute(command);
        }
    }

    pub fn execute(&mut self, command: BotCommand) {
        match command {
            // Legs resume on their own; nothing to restart.
            BotCommand::Continue => {}
            BotCommand::Stop => self.navigator.stop(),
            BotCommand::Nudge(direction) => {
                let o = direction.offset();
                let p = self.position;
                self.position = Vector3::new(p.x + o.x, p.y + o.y, p.z + o.z);
            }
            BotCommand::WalkTo {
                destination,
                timeout,
            } => {
                if self.navigator.walk_to(self.position, destination, timeout) {
                    debug!(destination = ?self.navigator.destination(), "Walking");
                }
            }
            BotCommand::FlyTo {
                destination,
                timeout,
            } => {
                if self.navigator.fly_to(self.position, destination, timeout) {
                    debug!(destination = ?self.navigator.destination(), "Flying");
                }
            }
            BotCommand::Teleport(to) => {
                if let Err(e) = self.region.teleport(&self.id, to) {
                    warn!(position = %to, error = %e, "Teleport refused");
                }
            }
            BotCommand::InvalidTeleport(reason) => {
                self.chat(&format!("Invalid message {reason}"), ChatScope::Say)
            }
            BotCommand::Unknown(text) => self.chat(
                &format!("Sorry. Don't understand your message {text}"),
                ChatScope::Shout,
            ),
        }
    }

    fn teleport(&mut self, to: Vector3) {
        self.navigator.stop();
        self.position = to;
        debug!(position = %to, "Teleported");
    }

    fn chat(&self, text: &str, scope: ChatScope) {
        self.region.deliver_chat(ChatMessage {
            sender: Identity {
                id: self.id,
                name: self.name.clone(),
            },
            channel: PUBLIC_CHANNEL,
            text: text.to_string(),
            position: self.position,
            scope,
        });
    }
}
