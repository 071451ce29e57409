//! Plain-text rendering of the two screens.

use std::fmt::Write;

use crate::screens::dashboard::{CoordinateSource, DashboardPhase, DashboardView};
use crate::screens::landing::{LandingScreen, FEATURES, STEPS};
use crate::services::charts::PROFILE_FULL_MARK;
use crate::services::risk::ALERT_THRESHOLD_PERCENT;

/// Width of a full profile bar, in characters.
const BAR_WIDTH: usize = 20;

pub const LOADING_MESSAGE: &str = "Loading your dashboard...";
pub const ALERT_SENT_MESSAGE: &str = "✓ Alert sent successfully!";
pub const ALERT_HINT: &str = "Alert button is enabled when flood risk ≥ 50%";

pub fn landing(screen: &LandingScreen) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Stay Safe with Real-Time Flood Detection");
    let _ = writeln!(
        out,
        "Get live flood risk predictions, rainfall updates, and instant alerts."
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Powerful Features");
    for (title, description) in FEATURES {
        let _ = writeln!(out, "  * {}: {}", title, description);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "How It Works");
    for (number, title, description) in STEPS {
        let _ = writeln!(out, "  {}  {}: {}", number, title, description);
    }
    let _ = writeln!(out);

    out.push_str(&registration_form(screen));
    out
}

pub fn registration_form(screen: &LandingScreen) -> String {
    let form = screen.form();
    let mut out = String::new();
    let _ = writeln!(out, "Login / Register");
    let _ = writeln!(out, "  Name:     {}", placeholder(&form.name, "Enter your full name"));
    let masked = "*".repeat(form.password.chars().count());
    let _ = writeln!(out, "  Password: {}", placeholder(&masked, "Enter your password"));
    let _ = writeln!(
        out,
        "  Location: {}",
        placeholder(&form.location, "Enter your city or address")
    );
    match screen.detected() {
        Some(coords) => {
            let _ = writeln!(out, "  Coordinates: {}", coords.label());
        }
        None => {
            let _ = writeln!(
                out,
                "  Type \"detect\" to use your current location or enter manually"
            );
        }
    }
    out
}

fn placeholder<'a>(value: &'a str, hint: &'a str) -> &'a str {
    if value.is_empty() {
        hint
    } else {
        value
    }
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome back, {}", view.user.name);
    let _ = writeln!(
        out,
        "{} ({})",
        view.user.location,
        view.user.coordinates().label()
    );

    if view.phase == DashboardPhase::Loading {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", LOADING_MESSAGE);
        return out;
    }

    if let (Some(coords), Some(source)) = (view.coordinates, view.source) {
        let origin = match source {
            CoordinateSource::Device => "device",
            CoordinateSource::Session => "login",
        };
        let _ = writeln!(out, "Monitoring {} ({} position)", coords.label(), origin);
    }
    if let Some(observed_at) = &view.observed_at {
        let _ = writeln!(out, "Observed at {}", observed_at);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}%  Flood Risk Probability", view.risk.probability_percent);
    let _ = writeln!(out, "[{} Risk Level]", view.band.label());
    let _ = writeln!(out);

    let _ = writeln!(out, "Risk Distribution");
    for slice in &view.share {
        let _ = writeln!(out, "  {:<16} {:>10.2}", slice.name, slice.value);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Risk Profile");
    for axis in &view.profile {
        let _ = writeln!(
            out,
            "  {:<16} {} {:.2}",
            axis.subject,
            bar(axis.display_value()),
            axis.value
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Current Readings");
    for reading in &view.readings {
        let _ = writeln!(
            out,
            "  {:<18} {} {}",
            reading.parameter, reading.value, reading.unit
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Emergency Alert System");
    if view.alert.sent {
        let _ = writeln!(out, "  {}", ALERT_SENT_MESSAGE);
    }
    let button = if view.alert.sent {
        "Alert Sent"
    } else {
        "Send Flood Alert"
    };
    let state = if view.alert.enabled {
        "type \"alert\""
    } else {
        "disabled"
    };
    let _ = writeln!(out, "  [{}] ({})", button, state);
    if view.risk.probability_percent < ALERT_THRESHOLD_PERCENT {
        let _ = writeln!(out, "  {}", ALERT_HINT);
    }
    out
}

/// A bar proportional to `value` on the profile's 0–100 domain.
fn bar(value: f64) -> String {
    let filled = ((value / PROFILE_FULL_MARK) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
