//! Command dispatch: bridges CLI args to core commands and formats output.

use std::time::Duration;

use airpure_core::{Command as CoreCommand, DeviceState, Purifier, TransportConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let host = global.host.as_deref().ok_or(CliError::NoHost)?;
    let transport = TransportConfig {
        timeout: Duration::from_secs(global.timeout),
    };
    let purifier = Purifier::new(host, &transport)?;

    // Read commands finish inside the match; everything else resolves to a
    // core write command and falls through to the shared execute path.
    let core_cmd = match cmd {
        Command::Status { json } => {
            let state = purifier.refresh().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_status(&state);
            }
            return Ok(());
        }
        Command::DeviceId => {
            let id = purifier.device_id().await?;
            println!("{id}");
            return Ok(());
        }

        Command::On => CoreCommand::TurnOn,
        Command::Off => CoreCommand::TurnOff,
        Command::Speed { step } => CoreCommand::SetSpeed { speed: step },
        Command::Percentage { percentage } => CoreCommand::SetPercentage { percentage },
        Command::Mode { mode } => CoreCommand::SetPresetMode { mode },
        Command::Function { function } => CoreCommand::SetFunction { function },
        Command::Humidity { percent } => CoreCommand::SetTargetHumidity { percent },
        Command::Brightness { percent } => CoreCommand::SetLightBrightness { percent },
        Command::Lock { state } => CoreCommand::SetChildLock {
            lock: state.is_on(),
        },
        Command::Timer { hours } => CoreCommand::SetTimer { hours },
        Command::Display { state } => CoreCommand::SetDisplayLight { on: state.is_on() },
        Command::Index { index } => CoreCommand::SetUsedIndex { index },
    };

    // The model profile drives validation; resolve it first so a speed
    // write against an AC2889 does not force manual mode.
    purifier.refresh().await?;
    purifier.execute(&core_cmd).await?;
    Ok(())
}

fn print_status(state: &DeviceState) {
    let on_off = |v: bool| if v { "on" } else { "off" };

    if let Some(model) = &state.model {
        println!("Model:            {model}");
    }
    if let Some(power) = state.power {
        println!("Power:            {}", on_off(power));
    }
    if let Some(mode) = &state.preset_mode {
        println!("Mode:             {mode}");
    }
    if let Some(speed) = &state.fan_speed {
        match state.speed_percentage {
            Some(pct) => println!("Fan speed:        {speed} ({pct}%)"),
            None => println!("Fan speed:        {speed}"),
        }
    }
    if let Some(function) = &state.function {
        println!("Function:         {function}");
    }
    if let Some(pm25) = state.pm25 {
        println!("PM2.5:            {pm25}");
    }
    if let Some(iaql) = state.allergen_index {
        println!("Allergen index:   {iaql}");
    }
    if let Some(rh) = state.humidity {
        println!("Humidity:         {rh}%");
    }
    if let Some(rhset) = state.target_humidity {
        println!("Target humidity:  {rhset}%");
    }
    if let Some(temp) = state.temperature {
        println!("Temperature:      {temp}°C");
    }
    if let Some(light) = state.light_brightness {
        println!("Light brightness: {light}%");
    }
    if let Some(display) = state.display_light {
        println!("Display light:    {}", on_off(display));
    }
    if let Some(index) = &state.used_index {
        println!("Displayed index:  {index}");
    }
    if let Some(wl) = state.water_level {
        println!("Water level:      {wl}");
    }
    if let Some(lock) = state.child_lock {
        println!("Child lock:       {}", on_off(lock));
    }
    if let Some(hours) = state.timer_hours {
        println!("Timer:            {hours}h");
    }
    if let Some(minutes) = state.timer_minutes_remaining {
        println!("Timer remaining:  {minutes}min");
    }

    let filters = [
        ("Pre-filter", state.pre_filter),
        ("HEPA filter", state.hepa_filter),
        ("Carbon filter", state.carbon_filter),
        ("Wick", state.wick_filter),
    ];
    for (name, hours) in filters {
        if let Some(hours) = hours {
            println!("{name:<17} {hours}h until service");
        }
    }
}
