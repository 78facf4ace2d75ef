use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use tabled::{Table, Tabled};

use tado::TadoClient;

#[derive(Parser)]
#[command(name = "tado")]
#[command(about = "A CLI for inspecting your Tado home")]
#[command(version)]
struct Cli {
    /// Username for the Tado account
    #[arg(long, env = "TADO_USERNAME")]
    username: Option<String>,

    /// Password for the Tado account (prompted when omitted)
    #[arg(long, env = "TADO_PASSWORD")]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated user's profile
    Me,
    /// List the devices in the home
    Devices,
    /// List the mobile devices registered to the home
    MobileDevices,
    /// List the zones in the home
    Zones,
    /// List the zones with their current state records
    ZoneStates,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Battery")]
    battery: String,
}

#[derive(Tabled)]
struct MobileDeviceRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Model")]
    model: String,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    zone_type: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let username = cli.username.ok_or_else(|| {
        anyhow::anyhow!(
            "Username is required. Provide via --username or TADO_USERNAME environment variable."
        )
    })?;

    let password = match cli.password {
        Some(password) => password,
        None => rpassword::prompt_password("Tado password: ")?,
    };

    let mut client = TadoClient::new(&username, &password);

    info!("Authenticating with Tado...");
    client.login().await?;
    debug!("Authentication successful");

    match cli.command {
        Commands::Me => {
            let me = client.get_me().await?;
            println!("Name:     {}", me.name);
            println!("Email:    {}", me.email);
            println!("Username: {}", me.username);
            println!("Locale:   {}", me.locale);
            for home in &me.homes {
                println!("Home:     {} ({})", home.name, home.id);
            }
        }
        Commands::Devices => {
            info!("Fetching device list...");
            let devices = client.get_devices().await?;

            if devices.is_empty() {
                println!("No devices found for this home.");
                return Ok(());
            }

            let rows: Vec<DeviceRow> = devices
                .iter()
                .map(|device| DeviceRow {
                    device_type: device.device_type.clone(),
                    serial: device.serial_no.clone(),
                    firmware: device.current_fw_version.clone(),
                    connected: if device.connection_state.value {
                        "yes".to_string()
                    } else {
                        "no".to_string()
                    },
                    battery: device
                        .battery_state
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();

            println!("{}", Table::new(&rows));
        }
        Commands::MobileDevices => {
            info!("Fetching mobile device list...");
            let mobile_devices = client.get_mobile_devices().await?;

            if mobile_devices.is_empty() {
                println!("No mobile devices found for this home.");
                return Ok(());
            }

            let rows: Vec<MobileDeviceRow> = mobile_devices
                .iter()
                .map(|device| MobileDeviceRow {
                    id: device.id,
                    name: device.name.clone(),
                    platform: device.device_metadata.platform.clone(),
                    model: device.device_metadata.model.clone(),
                })
                .collect();

            println!("{}", Table::new(&rows));
        }
        Commands::Zones => {
            info!("Fetching zone list...");
            let zones = client.get_zones().await?;
            print_zones(&zones);
        }
        Commands::ZoneStates => {
            info!("Fetching zone states...");
            let zones = client.get_zone_states().await?;
            print_zones(&zones);
        }
    }

    Ok(())
}

fn print_zones(zones: &[tado::Zone]) {
    if zones.is_empty() {
        println!("No zones found for this home.");
        return;
    }

    let rows: Vec<ZoneRow> = zones
        .iter()
        .map(|zone| ZoneRow {
            id: zone.id,
            name: zone.name.clone(),
            zone_type: zone.zone_type.clone(),
            devices: zone.devices.len(),
        })
        .collect();

    println!("{}", Table::new(&rows));
}
