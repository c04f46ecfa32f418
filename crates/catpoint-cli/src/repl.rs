//! REPL – Read-Eval-Print Loop for the Catpoint shell.
//!
//! Supported slash-commands:
//!   /help                       – show this list
//!   /status                     – arming, alarm and camera state
//!   /sensors                    – list sensors
//!   /arm home | /arm away       – arm the system
//!   /disarm                     – disarm the system
//!   /add <type> <name>          – install a door / window / motion sensor
//!   /remove <name>              – uninstall a sensor
//!   /open <name> | /close <name> – activate / deactivate a sensor
//!   /scan [path]                – classify a camera image
//!   /quit | /exit               – leave the shell

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use catpoint_image::ImageService;
use catpoint_security::{SecurityRepository, SecurityService};
use catpoint_types::{ArmingStatus, CameraImage, CatpointError, Sensor, SensorType};

use crate::display::paint_alarm;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Status,
    Sensors,
    Arm(ArmingStatus),
    Disarm,
    Add { name: String, sensor_type: SensorType },
    Remove(String),
    Open(String),
    Close(String),
    Scan(Option<PathBuf>),
    Quit,
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parse one input line. Sensor names may contain spaces.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "/help" => Ok(Command::Help),
        "/status" => Ok(Command::Status),
        "/sensors" => Ok(Command::Sensors),
        "/arm" => match rest.to_ascii_lowercase().as_str() {
            "home" => Ok(Command::Arm(ArmingStatus::ArmedHome)),
            "away" => Ok(Command::Arm(ArmingStatus::ArmedAway)),
            _ => Err("usage: /arm home | /arm away".to_string()),
        },
        "/disarm" => Ok(Command::Disarm),
        "/add" => {
            let (kind, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: /add <door|window|motion> <name>".to_string())?;
            Ok(Command::Add {
                name: name.trim().to_string(),
                sensor_type: kind.parse()?,
            })
        }
        "/remove" => required_name(rest, "/remove").map(Command::Remove),
        "/open" => required_name(rest, "/open").map(Command::Open),
        "/close" => required_name(rest, "/close").map(Command::Close),
        "/scan" if rest.is_empty() => Ok(Command::Scan(None)),
        "/scan" => Ok(Command::Scan(Some(PathBuf::from(rest)))),
        "/quit" | "/exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: '{other}'")),
    }
}

fn required_name(rest: &str, cmd: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {cmd} <sensor name>"))
    } else {
        Ok(rest.to_string())
    }
}

/// Entry point for the interactive REPL. Returns on `/quit` or EOF.
pub fn run<R, I>(service: &mut SecurityService<R, I>)
where
    R: SecurityRepository,
    I: ImageService,
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", "catpoint>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!(
                    "{} Type {} for available commands.",
                    msg.red(),
                    "/help".bold()
                );
                continue;
            }
        };

        match execute(service, command) {
            Ok(Flow::Exit) => {
                println!("{}", "Goodbye.".green());
                break;
            }
            Ok(Flow::Continue) => {}
            Err(e) => println!("{}: {}", "Error".red(), e),
        }
    }
}

/// Apply `command` to `service`.
pub fn execute<R, I>(
    service: &mut SecurityService<R, I>,
    command: Command,
) -> Result<Flow, CatpointError>
where
    R: SecurityRepository,
    I: ImageService,
{
    match command {
        Command::Help => cmd_help(),
        Command::Status => {
            println!("  Arming : {}", service.arming_status()?.description().bold());
            println!("  Alarm  : {}", paint_alarm(service.alarm_status()?));
            println!(
                "  Camera : {}",
                if service.is_cat_detected() { "cat in view" } else { "clear" }
            );
        }
        Command::Sensors => {
            let sensors = service.sensors()?;
            if sensors.is_empty() {
                println!("  {}", "No sensors installed.".dimmed());
            }
            for s in sensors {
                let state = if s.active { "Active".red() } else { "Inactive".green() };
                println!(
                    "  {} {:<7} {}",
                    format!("{:<24}", s.name).bold(),
                    s.sensor_type.to_string(),
                    state
                );
            }
        }
        Command::Arm(status) => service.set_arming_status(status)?,
        Command::Disarm => service.set_arming_status(ArmingStatus::Disarmed)?,
        Command::Add { name, sensor_type } => {
            service.add_sensor(Sensor::new(name, sensor_type))?;
        }
        Command::Remove(name) => {
            let sensor = find_sensor(service, &name)?;
            service.remove_sensor(&sensor)?;
        }
        Command::Open(name) => {
            let mut sensor = find_sensor(service, &name)?;
            service.change_sensor_activation_status(&mut sensor, true)?;
        }
        Command::Close(name) => {
            let mut sensor = find_sensor(service, &name)?;
            service.change_sensor_activation_status(&mut sensor, false)?;
        }
        Command::Scan(path) => {
            let image = match path {
                Some(path) => image_from_file(&path)?,
                None => CameraImage::new(1, 1, vec![0]),
            };
            service.process_image(&image)?;
        }
        Command::Quit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn find_sensor<R, I>(
    service: &SecurityService<R, I>,
    name: &str,
) -> Result<Sensor, CatpointError>
where
    R: SecurityRepository,
    I: ImageService,
{
    service
        .sensors()?
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CatpointError::UnknownSensor(name.to_string()))
}

/// Load a file as an opaque single-row frame.
fn image_from_file(path: &Path) -> Result<CameraImage, CatpointError> {
    let data = std::fs::read(path)
        .map_err(|e| CatpointError::InvalidImage(format!("{}: {}", path.display(), e)))?;
    let width = u32::try_from(data.len())
        .map_err(|_| CatpointError::InvalidImage(format!("{} is too large", path.display())))?;
    Ok(CameraImage::new(width, 1, data))
}

fn cmd_help() {
    println!();
    println!("{}", "Catpoint Commands".bold().underline());
    println!("  {}              – arming, alarm and camera state", "/status".bold().cyan());
    println!("  {}             – list sensors", "/sensors".bold().cyan());
    println!("  {}  – arm the system", "/arm home | away".bold().cyan());
    println!("  {}              – disarm the system", "/disarm".bold().cyan());
    println!("  {}    – install a sensor (door / window / motion)", "/add <type> <name>".bold().cyan());
    println!("  {}       – uninstall a sensor", "/remove <name>".bold().cyan());
    println!("  {}         – activate a sensor", "/open <name>".bold().cyan());
    println!("  {}        – deactivate a sensor", "/close <name>".bold().cyan());
    println!("  {}         – classify a camera image", "/scan [path]".bold().cyan());
    println!("  {}        – exit the shell", "/quit  /exit".bold().cyan());
    println!();
}
