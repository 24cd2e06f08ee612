//! Request profiles: what to ask a device and how to read the answer.
//!
//! A profile is selected by driver identifier (`ios`, `nxos_ssh`) once the
//! dialect of a device is known. It names the platform to open the session
//! with, the `show` commands behind each report, and the parsers that turn
//! their output into [`Facts`] and [`Interfaces`].

mod ios;
mod nxos;
pub mod parse;

pub use ios::Ios;
pub use nxos::NxosSsh;

use crate::error::{ParseError, Result};
use crate::report::{Facts, Interfaces};

/// Vendor-specific retrieval of structured reports.
pub trait RequestProfile: Send + Sync {
    /// Driver identifier this profile answers to.
    fn name(&self) -> &'static str;

    /// Platform definition used for the session.
    fn platform(&self) -> &'static str;

    /// Commands whose outputs [`parse_facts`](Self::parse_facts) expects, in order.
    fn facts_commands(&self) -> &'static [&'static str];

    /// Build the facts report from command outputs.
    fn parse_facts(&self, outputs: &[&str]) -> Result<Facts>;

    /// Commands whose outputs [`parse_interfaces`](Self::parse_interfaces) expects, in order.
    fn interfaces_commands(&self) -> &'static [&'static str];

    /// Build the interface table from command outputs.
    fn parse_interfaces(&self, outputs: &[&str]) -> Result<Interfaces>;
}

static IOS: Ios = Ios;
static NXOS_SSH: NxosSsh = NxosSsh;

/// Look up the profile for a driver identifier.
pub fn lookup(driver: &str) -> Option<&'static dyn RequestProfile> {
    match driver {
        "ios" => Some(&IOS),
        "nxos_ssh" => Some(&NXOS_SSH),
        _ => None,
    }
}

fn expect_outputs(outputs: &[&str], expected: usize) -> Result<()> {
    if outputs.len() != expected {
        return Err(ParseError::OutputCount {
            expected,
            actual: outputs.len(),
        }
        .into());
    }
    Ok(())
}
