use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use gochara_config::{Settings, init_logging};
use gochara_core::{
    Body, Center, EclipseKind, EngineHandle, GeoLocation, HouseSystem, RawSample, SampleFlags,
};
use gochara_ephem::AnalyticBackend;
use gochara_search::{
    EclipseEvent, Event, EventKind, IngressEvent, Paran, ReturnEvent, SearchDirection,
    StationEvent, check_span_limit,
};
use gochara_time::{Instant, calendar_to_jd};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "gochara", about = "Astronomical event search", version)]
struct Cli {
    /// Settings file (TOML); falls back to $GOCHARA_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Ayanamsa for sidereal results, overriding the settings file
    #[arg(long, global = true, conflicts_with = "tropical")]
    ayanamsa: Option<String>,
    /// Force tropical results even if the settings name an ayanamsa
    #[arg(long, global = true)]
    tropical: bool,
    /// Search ingresses, stations and returns from the Sun's center
    #[arg(long, global = true)]
    heliocentric: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Position and speed of a body at one instant
    Position {
        /// Body name, or numeric engine code (0 = Sun, 1 = Moon, ...)
        #[arg(long)]
        body: String,
        #[arg(long)]
        date: String,
    },
    /// Next sign ingress, or all ingresses up to --until
    Ingress {
        /// Body name (Sun, Moon, Mercury, ..., "Mean Node")
        #[arg(long)]
        body: String,
        /// Start time: RFC 3339 (2024-03-20T12:00:00Z) or Julian Day
        #[arg(long)]
        date: String,
        /// End of a range scan
        #[arg(long)]
        until: Option<String>,
    },
    /// Retrograde and direct stations in a range
    Stations {
        #[arg(long)]
        body: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Next return of a body to a longitude
    Return {
        #[arg(long)]
        body: String,
        /// Target longitude in degrees [0, 360)
        #[arg(long)]
        longitude: f64,
        #[arg(long)]
        date: String,
    },
    /// Solar return for a calendar year
    SolarReturn {
        /// Natal Sun longitude in degrees
        #[arg(long)]
        longitude: f64,
        #[arg(long)]
        year: i32,
    },
    /// Horizon/meridian coincidences during one UT day
    Parans {
        #[arg(long)]
        date: String,
        /// Observer latitude; defaults to [observer] from settings
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Observer longitude, east positive
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Orb in minutes; defaults to the settings value
        #[arg(long)]
        orb: Option<f64>,
    },
    /// Next (or previous) eclipse
    Eclipse {
        #[arg(long, value_enum)]
        kind: EclipseArg,
        #[arg(long)]
        date: String,
        /// Give up after this time
        #[arg(long)]
        until: Option<String>,
        /// Search backward from --date
        #[arg(long)]
        backward: bool,
    },
    /// House cusps and angles
    Houses {
        #[arg(long)]
        date: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// P (Placidus), O (Porphyry), E (Equal), W (Whole sign)
        #[arg(long, default_value = "P")]
        system: char,
    },
    /// Ingresses and stations of several bodies, in time order
    Events {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Comma-separated body names
        #[arg(long, value_delimiter = ',', default_value = "Sun,Mercury,Venus,Mars")]
        bodies: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EclipseArg {
    Solar,
    Lunar,
}

/// Sample `body` given by name or by engine code.
fn sample_named_or_coded(
    engine: &EngineHandle,
    jd: f64,
    body: &str,
    flags: SampleFlags,
) -> anyhow::Result<(String, RawSample)> {
    if let Ok(code) = body.trim().parse::<i32>() {
        let sample = engine.sample_code(jd, code, flags)?;
        let label = Body::from_code(code).map_or_else(|| format!("body {code}"), |b| b.to_string());
        return Ok((label, sample));
    }
    let body = parse_body(body)?;
    Ok((body.to_string(), engine.sample(jd, body, flags)?))
}

fn parse_body(name: &str) -> anyhow::Result<Body> {
    Body::from_name(name).ok_or_else(|| anyhow!("unknown body {name:?}"))
}

/// Julian Day (UT) from a number or RFC 3339 text.
fn parse_jd(text: &str) -> anyhow::Result<f64> {
    if let Ok(jd) = text.trim().parse::<f64>() {
        return Ok(jd);
    }
    let instant = Instant::parse(text).with_context(|| format!("bad time {text:?}"))?;
    Ok(instant.julian_day())
}

fn parse_instant(text: &str) -> anyhow::Result<Instant> {
    if let Ok(jd) = text.trim().parse::<f64>() {
        return Ok(Instant::from_julian_day(jd)?);
    }
    Instant::parse(text).with_context(|| format!("bad time {text:?}"))
}

fn observer_from(settings: &Settings, lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<GeoLocation> {
    match (lat, lon, settings.observer()) {
        (Some(lat), Some(lon), base) => Ok(GeoLocation::new(
            lat,
            lon,
            base.map(|b| b.altitude_m).unwrap_or(0.0),
        )),
        (None, None, Some(base)) => Ok(base),
        _ => bail!("give both --lat and --lon, or an [observer] section in the settings"),
    }
}

fn format_jd(jd: f64) -> String {
    match Instant::from_julian_day(jd) {
        Ok(instant) => format!(
            "{} (JD {jd:.5})",
            instant.datetime().format("%Y-%m-%d %H:%M:%S UTC")
        ),
        Err(_) => format!("JD {jd:.5}"),
    }
}

fn print_ingress(ev: &IngressEvent) {
    println!(
        "{}: {} -> {}  {}  lon {:.4} deg",
        ev.body,
        ev.from_sign,
        ev.to_sign,
        format_jd(ev.jd),
        ev.longitude_deg
    );
}

fn print_station(ev: &StationEvent) {
    println!(
        "{}: stations {}  {}  lon {:.4} deg  speed {:+.5} -> {:+.5} deg/day",
        ev.body,
        ev.station_type.name(),
        format_jd(ev.jd),
        ev.longitude_deg,
        ev.speed_before,
        ev.speed_after
    );
}

fn print_return(ev: &ReturnEvent) {
    println!(
        "{} returns to {:.4} deg  {}  (lon {:.4}, +/- {:.2} s)",
        ev.body,
        ev.target_longitude,
        format_jd(ev.jd),
        ev.longitude_deg,
        ev.achieved_tolerance_days * 86_400.0
    );
}

fn print_paran(p: &Paran) {
    println!(
        "{} {} / {} {}  {}  orb {:.2} min",
        p.body1,
        p.event1.name(),
        p.body2,
        p.event2.name(),
        format_jd(p.jd),
        p.orb_minutes
    );
}

fn print_eclipse(ev: &EclipseEvent) {
    println!("{:?} eclipse ({:?})  peak {}", ev.kind, ev.class, format_jd(ev.peak_jd));
}

fn print_event(ev: &Event) {
    let what = match ev.kind {
        EventKind::Ingress { from_sign, to_sign } => format!("ingress {from_sign} -> {to_sign}"),
        EventKind::Station { station_type, .. } => format!("station {}", station_type.name()),
        EventKind::Return { target_longitude } => format!("return to {target_longitude:.4}"),
    };
    println!("{}  {:<8} {}  lon {:.4}", format_jd(ev.jd), ev.body.name(), what, ev.longitude_deg);
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.tropical {
        settings.engine.ayanamsa = None;
    } else if let Some(name) = &cli.ayanamsa {
        settings.engine.ayanamsa = Some(name.clone());
    }
    if cli.heliocentric {
        settings.search.heliocentric = true;
    }
    settings.validate()?;
    Ok(settings)
}

fn build_engine(settings: &Settings) -> anyhow::Result<EngineHandle> {
    let config = settings.engine_config()?;
    EngineHandle::with_initial_config(Box::new(AnalyticBackend::new()), config)
        .context("engine rejected the configured settings")
}

fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let engine = build_engine(&settings)?;
    let max_days = settings.search.max_search_days;

    match cli.command {
        Commands::Position { body, date } => {
            let jd = parse_jd(&date)?;
            let flags = if settings.engine.ayanamsa.is_some() {
                SampleFlags::SIDEREAL
            } else {
                SampleFlags::TROPICAL
            };
            let flags = if settings.search.heliocentric {
                flags.with_center(Center::Heliocentric)
            } else {
                flags
            };
            let (label, s) = sample_named_or_coded(&engine, jd, &body, flags)?;
            println!("{label} at {}", format_jd(jd));
            println!("  longitude: {:.6} deg", s.longitude_deg);
            println!("  latitude:  {:.6} deg", s.latitude_deg);
            println!("  distance:  {:.8} AU", s.distance_au);
            println!("  speed:     {:+.6} deg/day", s.speed_longitude);
        }

        Commands::Ingress { body, date, until } => {
            let body = parse_body(&body)?;
            let start = parse_jd(&date)?;
            let config = settings.event_config()?;
            match until {
                Some(until) => {
                    let end = parse_jd(&until)?;
                    check_span_limit(start, end, max_days)?;
                    let events = gochara_search::scan_ingresses(&engine, body, start, end, &config)?;
                    if events.is_empty() {
                        println!("No ingress of {body} in range");
                    }
                    events.iter().for_each(print_ingress);
                }
                None => match gochara_search::find_ingress(&engine, body, start, &config)? {
                    Some(ev) => print_ingress(&ev),
                    None => println!("No ingress of {body} in search window"),
                },
            }
        }

        Commands::Stations { body, from, to } => {
            let body = parse_body(&body)?;
            let (start, end) = (parse_jd(&from)?, parse_jd(&to)?);
            check_span_limit(start, end, max_days)?;
            let stations =
                gochara_search::find_stations(&engine, body, start, end, &settings.event_config()?)?;
            if stations.is_empty() {
                println!("No stations of {body} in range");
            }
            stations.iter().for_each(print_station);
        }

        Commands::Return {
            body,
            longitude,
            date,
        } => {
            let body = parse_body(&body)?;
            let start = parse_jd(&date)?;
            let config = settings.return_config()?;
            match gochara_search::find_return(&engine, body, longitude, start, &config)? {
                Some(ev) => print_return(&ev),
                None => println!("{body} does not return to {longitude:.4} deg in search window"),
            }
        }

        Commands::SolarReturn { longitude, year } => {
            let ayanamsa = settings.ayanamsa()?;
            match gochara_search::find_solar_return(&engine, longitude, year, ayanamsa)? {
                Some(ev) => print_return(&ev),
                None => println!(
                    "No solar return near JD {:.1}",
                    calendar_to_jd(year, 1, 1.0)
                ),
            }
        }

        Commands::Parans {
            date,
            lat,
            lon,
            orb,
        } => {
            let instant = parse_instant(&date)?;
            let location = observer_from(&settings, lat, lon)?;
            let orb = orb.unwrap_or(settings.search.paran_orb_minutes);
            let parans = gochara_search::find_parans(&engine, &instant, &location, orb)?;
            if parans.is_empty() {
                println!("No parans within {orb} min");
            }
            parans.iter().for_each(print_paran);
        }

        Commands::Eclipse {
            kind,
            date,
            until,
            backward,
        } => {
            let start = parse_jd(&date)?;
            let end = until.as_deref().map(parse_jd).transpose()?;
            if let Some(end) = end {
                check_span_limit(start, end, max_days)?;
            }
            let direction = if backward {
                SearchDirection::Backward
            } else {
                SearchDirection::Forward
            };
            let kind = match kind {
                EclipseArg::Solar => EclipseKind::Solar,
                EclipseArg::Lunar => EclipseKind::Lunar,
            };
            match gochara_search::next_eclipse(&engine, kind, start, end, direction)? {
                Some(ev) => print_eclipse(&ev),
                None => println!("No {kind:?} eclipse in range"),
            }
        }

        Commands::Houses {
            date,
            lat,
            lon,
            system,
        } => {
            let jd = parse_jd(&date)?;
            let location = observer_from(&settings, lat, lon)?;
            let system =
                HouseSystem::from_code(system).ok_or_else(|| anyhow!("unknown house system {system:?}"))?;
            let houses = engine.houses_at(jd, location.latitude_deg, location.longitude_deg, system)?;
            println!("Ascendant: {:.4} deg", houses.ascendant_deg);
            println!("MC:        {:.4} deg", houses.mc_deg);
            println!("ARMC:      {:.4} deg", houses.armc_deg);
            println!("Vertex:    {:.4} deg", houses.vertex_deg);
            for (i, cusp) in houses.cusps_deg.iter().enumerate() {
                println!("House {:>2}: {cusp:.4} deg", i + 1);
            }
        }

        Commands::Events { from, to, bodies } => {
            let (start, end) = (parse_jd(&from)?, parse_jd(&to)?);
            check_span_limit(start, end, max_days)?;
            let bodies = bodies
                .iter()
                .map(|name| parse_body(name))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let events =
                gochara_search::scan_events(&engine, start, end, &bodies, &settings.event_config()?)?;
            debug!(count = events.len(), "events found");
            events.iter().for_each(print_event);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_logging(&settings.logging)?;
    info!(
        config = ?settings.source,
        ayanamsa = ?settings.engine.ayanamsa,
        "gochara starting"
    );
    run(cli, settings)
}
