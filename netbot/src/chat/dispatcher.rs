//! Routing of inbound messages to per-user conversations.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ChatId, Inbound, Outbox, UserId};
use crate::collector::Collector;
use crate::conversation::Conversation;

/// Command opening a conversation.
pub const START_COMMAND: &str = "/start";

struct Worker {
    inbox: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

/// Runs one conversation task per (chat, user).
///
/// Messages for one user are handled strictly in order by that user's task,
/// so a slow device lookup never holds up anyone else.
pub struct Dispatcher<C, O> {
    collector: Arc<C>,
    outbox: Arc<O>,
    workers: HashMap<(ChatId, UserId), Worker>,
}

impl<C, O> Dispatcher<C, O>
where
    C: Collector + 'static,
    O: Outbox + 'static,
{
    pub fn new(collector: Arc<C>, outbox: Arc<O>) -> Self {
        Self {
            collector,
            outbox,
            workers: HashMap::new(),
        }
    }

    /// Route one inbound message.
    ///
    /// Text for a running conversation is queued to it, `/start` included.
    /// Otherwise `/start` opens a new conversation and anything else is
    /// dropped.
    pub fn dispatch(&mut self, message: Inbound) {
        self.remove_finished();
        let key = (message.chat, message.user);

        let text = match self.workers.get(&key) {
            Some(worker) => match worker.inbox.send(message.text) {
                Ok(()) => return,
                // Conversation ended since the last message
                Err(mpsc::error::SendError(text)) => {
                    self.workers.remove(&key);
                    text
                }
            },
            None => message.text,
        };

        if !is_start_command(&text) {
            debug!("chat {} user {}: no conversation, ignoring", key.0, key.1);
            return;
        }

        info!("chat {} user {}: conversation started", key.0, key.1);
        let (inbox, rx) = mpsc::unbounded_channel();
        let conversation = Conversation::new(message.chat, self.collector.clone());
        let task = tokio::spawn(run_conversation(conversation, self.outbox.clone(), rx));
        self.workers.insert(key, Worker { inbox, task });
    }

    fn remove_finished(&mut self) {
        self.workers.retain(|(chat, user), worker| {
            if worker.task.is_finished() {
                debug!("chat {chat} user {user}: removing finished conversation");
                return false;
            }
            true
        });
    }

    /// Number of conversations still running.
    pub fn active(&self) -> usize {
        self.workers
            .values()
            .filter(|worker| !worker.task.is_finished())
            .count()
    }

    /// Stop accepting messages and wait for every conversation to drain its
    /// queue.
    pub async fn shutdown(self) {
        for ((chat, user), worker) in self.workers {
            drop(worker.inbox);
            if let Err(e) = worker.task.await {
                error!("chat {chat} user {user}: conversation task failed: {e}");
            }
        }
    }
}

fn is_start_command(text: &str) -> bool {
    text.split_whitespace().next().is_some_and(|command| {
        command == START_COMMAND
            || command
                .strip_prefix(START_COMMAND)
                .is_some_and(|rest| rest.starts_with('@'))
    })
}

async fn run_conversation<C: Collector, O: Outbox>(
    mut conversation: Conversation<C>,
    outbox: Arc<O>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let chat = conversation.chat();
    if let Err(e) = conversation.start(&*outbox).await {
        error!("chat {chat}: greeting failed: {e}");
        return;
    }

    while let Some(text) = rx.recv().await {
        if let Err(e) = conversation.handle(&text, &*outbox).await {
            error!("chat {chat}: {e}");
        }
        if conversation.is_ended() {
            info!("chat {chat}: conversation ended");
            break;
        }
    }
}
