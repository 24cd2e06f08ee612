//! One operator's conversation with the bot.

pub mod state;

pub use state::{Context, Effect, ReportKind, State, Transition, transition};

use std::sync::Arc;

use log::debug;

use crate::address::DeviceAddress;
use crate::chat::{ChatId, Outbox, Reply};
use crate::collector::Collector;
use crate::error::Result;

/// Runs the state machine for one chat, carrying out its effects.
pub struct Conversation<C> {
    chat: ChatId,
    collector: Arc<C>,
    state: State,
    context: Context,
}

impl<C: Collector> Conversation<C> {
    pub fn new(chat: ChatId, collector: Arc<C>) -> Self {
        Self {
            chat,
            collector,
            state: State::AwaitingAddress,
            context: Context::default(),
        }
    }

    pub fn chat(&self) -> ChatId {
        self.chat
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn is_ended(&self) -> bool {
        self.state == State::Ended
    }

    /// Greet the operator.
    pub async fn start<O: Outbox>(&self, outbox: &O) -> Result<()> {
        outbox.send(self.chat, state::greeting()).await
    }

    /// Handle one inbound text.
    ///
    /// The new state is committed only once every effect succeeded; a failed
    /// collection leaves the conversation where it was.
    pub async fn handle<O: Outbox>(&mut self, text: &str, outbox: &O) -> Result<()> {
        let Some(transition) = transition(self.state, &self.context, text) else {
            debug!("chat {}: ignoring {:?} in {:?}", self.chat, text, self.state);
            return Ok(());
        };

        for effect in transition.effects {
            match effect {
                Effect::Reply(reply) => outbox.send(self.chat, reply).await?,
                Effect::Collect { kind, address } => {
                    for reply in self.collect(kind, &address).await? {
                        outbox.send(self.chat, reply).await?;
                    }
                }
            }
        }

        debug!("chat {}: {:?} -> {:?}", self.chat, self.state, transition.next);
        self.state = transition.next;
        self.context = transition.context;
        Ok(())
    }

    async fn collect(&self, kind: ReportKind, address: &DeviceAddress) -> Result<Vec<Reply>> {
        Ok(match kind {
            ReportKind::Facts => state::facts_replies(self.collector.collect_facts(address).await?),
            ReportKind::Interfaces => {
                state::interfaces_replies(self.collector.collect_interfaces(address).await?)
            }
        })
    }
}
