//! Argument definitions for the `airpure` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "airpure",
    version,
    about = "Control Philips air purifiers over the local network",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device IP address or hostname.
    #[arg(long, short = 'H', env = "AIRPURE_HOST", global = true)]
    pub host: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "AIRPURE_TIMEOUT", default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current device state.
    Status {
        /// Print the raw state as JSON instead of the readable listing.
        #[arg(long)]
        json: bool,
    },

    /// Turn the device on.
    On,

    /// Turn the device off.
    Off,

    /// Set the fan speed step (silent, 1, 2, 3, turbo).
    Speed { step: String },

    /// Set the fan speed as a percentage (0 turns the device off).
    Percentage {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percentage: u8,
    },

    /// Select a preset mode (auto, allergen, sleep, manual, ...).
    Mode { mode: String },

    /// Select the device function (purification, purification_humidification).
    Function { function: String },

    /// Set the humidifier target (40, 50, 60, or 70 percent).
    Humidity { percent: u32 },

    /// Set the light ring brightness (0, 25, 50, 75, or 100 percent).
    Brightness { percent: u32 },

    /// Engage or release the child lock.
    Lock { state: Toggle },

    /// Set the off-timer in hours (0 cancels, maximum 12).
    Timer { hours: u32 },

    /// Switch the display backlight on or off.
    Display { state: Toggle },

    /// Select which air-quality index the display shows (PM2.5, IAI, ...).
    Index { index: String },

    /// Print the stable device identifier (MAC address).
    DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn percentage_rejects_values_over_100() {
        let result = Cli::try_parse_from(["airpure", "-H", "10.0.0.5", "percentage", "150"]);
        assert!(result.is_err());
    }

    #[test]
    fn host_comes_from_flag_or_env_slot() {
        let cli = Cli::try_parse_from(["airpure", "--host", "10.0.0.5", "on"]).unwrap();
        assert_eq!(cli.global.host.as_deref(), Some("10.0.0.5"));
        assert!(matches!(cli.command, Command::On));
    }
}
