//! The conversation state machine.
//!
//! [`transition`] is pure: it maps the current state, context and one
//! inbound text to the next state, the next context and the effects to carry
//! out. Inputs that do not fit the current state produce no transition.

use std::sync::LazyLock;

use regex::Regex;

use crate::address::DeviceAddress;
use crate::chat::Reply;
use crate::collector::Collected;
use crate::report::{Facts, Interfaces, render_facts, render_interfaces};

pub const GREETING: &str = "Hello, I am your network bot. You can talk to me to get information \
                            about devices in your network.\n\n\
                            Send me a \"Done\" if you want to stop this interaction at any time\n\n\
                            Please tell me the primary IP address of the device you want to get \
                            information about.";
pub const CHOOSE_REPORT: &str = "Awesome, what do you want to get for this device?";
pub const FACTS_WAIT: &str = "Please wait while I get general facts about your device...";
pub const INTERFACES_WAIT: &str =
    "Please wait while I get information about working interfaces on your device...";
pub const UNSUPPORTED: &str = "Sorry, this device type is not supported yet.";
pub const INTERFACES_HEADER: &str = "Here are facts about your device interfaces:";
pub const FAREWELL: &str = "Closing the connection to the device. Ciao!";

static DONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[dD]one$").expect("done pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingAddress,
    AwaitingReportChoice,
    AwaitingTermination,
    /// "done" was handled; no further input is accepted.
    Ended,
}

/// Per-conversation data carried between messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub address: Option<DeviceAddress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Facts,
    Interfaces,
}

impl ReportKind {
    /// The keyboard label selecting this report.
    pub fn label(self) -> &'static str {
        match self {
            Self::Facts => "Facts",
            Self::Interfaces => "Interfaces",
        }
    }

    fn from_label(text: &str) -> Option<Self> {
        match text {
            "Facts" => Some(Self::Facts),
            "Interfaces" => Some(Self::Interfaces),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message.
    Reply(Reply),
    /// Run a collector and send the rendered report.
    Collect {
        kind: ReportKind,
        address: DeviceAddress,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub context: Context,
    pub effects: Vec<Effect>,
}

/// First message of every conversation.
pub fn greeting() -> Reply {
    Reply::plain(GREETING)
}

/// Advance the conversation by one inbound text.
///
/// `None` means the input is ignored: no state change and no reply.
pub fn transition(state: State, context: &Context, input: &str) -> Option<Transition> {
    if state == State::Ended {
        return None;
    }

    if DONE.is_match(input) {
        return Some(Transition {
            next: State::Ended,
            context: Context::default(),
            effects: vec![Effect::Reply(Reply::removing_keyboard(FAREWELL))],
        });
    }

    match state {
        State::AwaitingAddress => {
            let address = DeviceAddress::parse(input)?;
            Some(Transition {
                next: State::AwaitingReportChoice,
                context: Context {
                    address: Some(address),
                },
                effects: vec![Effect::Reply(Reply::with_choice(
                    CHOOSE_REPORT,
                    [ReportKind::Facts.label(), ReportKind::Interfaces.label()],
                ))],
            })
        }
        State::AwaitingReportChoice => {
            let kind = ReportKind::from_label(input)?;
            let address = context.address.clone()?;
            let wait = match kind {
                ReportKind::Facts => FACTS_WAIT,
                ReportKind::Interfaces => INTERFACES_WAIT,
            };
            Some(Transition {
                next: State::AwaitingTermination,
                context: context.clone(),
                effects: vec![
                    Effect::Reply(Reply::plain(wait)),
                    Effect::Collect { kind, address },
                ],
            })
        }
        State::AwaitingTermination | State::Ended => None,
    }
}

/// Messages reporting a facts collection.
pub fn facts_replies(collected: Collected<Facts>) -> Vec<Reply> {
    match collected {
        Collected::Report(facts) => render_facts(&facts).into_iter().map(Reply::plain).collect(),
        Collected::Unsupported => vec![Reply::plain(UNSUPPORTED)],
    }
}

/// Messages reporting an interface collection: a header, then one message
/// per working interface.
///
/// A device that reported no interfaces at all gets the same apology as an
/// unsupported one.
pub fn interfaces_replies(collected: Collected<Interfaces>) -> Vec<Reply> {
    match collected {
        Collected::Report(interfaces) if interfaces.is_empty() => vec![Reply::plain(UNSUPPORTED)],
        Collected::Report(interfaces) => std::iter::once(INTERFACES_HEADER.to_string())
            .chain(render_interfaces(&interfaces))
            .map(Reply::plain)
            .collect(),
        Collected::Unsupported => vec![Reply::plain(UNSUPPORTED)],
    }
}
