//! # netbot
//!
//! Chat bot that looks up network devices over SSH.
//!
//! An operator sends the bot an IPv4 address and picks a report; the bot
//! logs into the device, works out what it is talking to, and answers with
//! the device's identity facts or the state of its working interfaces.
//!
//! ## Layers
//!
//! - [`conversation`]: the per-operator state machine, pure and testable
//!   without a network
//! - [`collector`] and [`session`]: detect the device dialect, map it to a
//!   driver, open a session and retrieve one report
//! - [`profile`]: the `show` commands each driver issues and their parsers
//! - [`driver`], [`channel`], [`transport`], [`platform`]: the async SSH CLI
//!   layer underneath, built on russh
//! - [`chat`]: Telegram long polling and per-user dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netbot::{Collected, Collector, DeviceAccess, DeviceAddress, DeviceCollector};
//! use netbot::transport::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netbot::Error> {
//!     let access = DeviceAccess::new(Credentials::password("netops", "secret"));
//!     let collector = DeviceCollector::ssh(access);
//!
//!     let address = DeviceAddress::parse("192.168.1.1").expect("dotted quad");
//!     match collector.collect_facts(&address).await? {
//!         Collected::Report(facts) => {
//!             for message in netbot::report::render_facts(&facts) {
//!                 println!("{message}");
//!             }
//!         }
//!         Collected::Unsupported => println!("unsupported device"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod channel;
pub mod chat;
pub mod collector;
pub mod config;
pub mod conversation;
pub mod detect;
pub mod driver;
pub mod error;
pub mod platform;
pub mod profile;
pub mod report;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use address::DeviceAddress;
pub use collector::{Collected, Collector, DeviceCollector};
pub use config::{BotConfig, DeviceAccess};
pub use conversation::Conversation;
pub use driver::{Driver, DriverBuilder, GenericDriver, Response};
pub use error::{Error, Result};
pub use platform::PlatformDefinition;
pub use report::{Facts, Interface, Interfaces};
pub use session::{DialectMap, Resolution, SessionResolver};
