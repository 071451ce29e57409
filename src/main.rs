// FloodEx dashboard v0.1
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use floodex_dashboard::app::{App, Screen};
use floodex_dashboard::cli::{Command, DASHBOARD_HELP, LANDING_HELP};
use floodex_dashboard::config::AppConfig;
use floodex_dashboard::errors::AppError;
use floodex_dashboard::render;
use floodex_dashboard::screens::dashboard::DashboardServices;
use floodex_dashboard::services::geolocation::{CachedGeolocator, DeviceGeolocator, Geolocator};
use floodex_dashboard::services::open_meteo::OpenMeteoClient;
use floodex_dashboard::services::prediction::PredictionClient;

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so they do not interleave with the screen on stdout.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "floodex_dashboard=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            config
                .log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!config.log_json)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    if let Err(e) = run(config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let services = DashboardServices {
        weather: OpenMeteoClient::new(
            &config.weather_api_url,
            config.forecast_start_date,
            config.forecast_end_date,
        )?,
        prediction: PredictionClient::new(&config.prediction_url)?,
    };
    let geolocator = CachedGeolocator::new(DeviceGeolocator::new(
        config.geolocation,
        config.device_position,
    ));
    tracing::info!(
        "Weather API {}, prediction service {}, forecast window {} to {}",
        config.weather_api_url,
        config.prediction_url,
        config.forecast_start_date,
        config.forecast_end_date
    );

    let mut app = App::new(geolocator, services);
    println!("{}", render::landing(app.landing_mut()?));
    println!("{}", LANDING_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read stdin: {}", e)))?
    {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if let Flow::Quit = handle(&mut app, command).await {
            break;
        }
    }
    Ok(())
}

async fn handle<G: Geolocator + 'static>(app: &mut App<G>, command: Command) -> Flow {
    match command {
        Command::Quit => return Flow::Quit,
        Command::Show => show(app).await,
        Command::Help => match app.screen() {
            Screen::Landing(_) => println!("{}", LANDING_HELP),
            Screen::Dashboard(_) => println!("{}", DASHBOARD_HELP),
        },
        Command::Detect => {
            println!("Detecting location...");
            match app.detect_location().await {
                Ok(coords) => println!("Coordinates: {}", coords.label()),
                Err(e) => println!("! {}", e),
            }
        }
        Command::Name(value) => set_field(app, |form| form.name = value),
        Command::Password(value) => set_field(app, |form| form.password = value),
        Command::Location(value) => set_field(app, |form| form.location = value),
        Command::Submit => {
            let ready = app
                .landing_mut()
                .map(|landing| landing.form().is_complete())
                .unwrap_or(false);
            if ready {
                println!("Signing in...");
            }
            match app.submit_registration().await {
                Ok(_) => show(app).await,
                Err(e) => println!("! {}", e),
            }
        }
        Command::Alert => match app.send_alert().await {
            Ok(()) => show(app).await,
            Err(e) => println!("! {}", e),
        },
        Command::Logout => {
            if app.session().is_some() {
                app.logout();
                show(app).await;
            } else {
                println!("! Not logged in");
            }
        }
    }
    Flow::Continue
}

fn set_field<G, F>(app: &mut App<G>, update: F)
where
    G: Geolocator + 'static,
    F: FnOnce(&mut floodex_dashboard::screens::landing::RegistrationForm),
{
    match app.landing_mut() {
        Ok(landing) => {
            update(landing.form_mut());
            println!("{}", render::registration_form(landing));
        }
        Err(_) => println!("{}", DASHBOARD_HELP),
    }
}

async fn show<G: Geolocator + 'static>(app: &mut App<G>) {
    match app.dashboard_view().await {
        Some(view) => println!("{}", render::dashboard(&view)),
        None => {
            if let Ok(landing) = app.landing_mut() {
                println!("{}", render::landing(landing));
            }
        }
    }
}
