use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fittrack_core::{AppError, Config, DistanceUnit, TimeUnit, UnitSettings};
use fittrack_insights::{DayActivity, GoalField, GoalForm, RecoveryDay};
use fittrack_sessions::{format, SelectionState, SessionClient, SessionsService};
use fittrack_social::{FriendsService, JsonFileFriendStore, NewFriendRequest};

/// FitTrack - sessions, weather and friends from the command line
#[derive(Parser, Debug)]
#[command(name = "fittrack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Override the API base URL (e.g. http://localhost:5000/api)
    #[arg(long, env = "FITTRACK_API_URL")]
    api_url: Option<String>,

    /// Distance unit: m, km or mi
    #[arg(long)]
    distance_unit: Option<DistanceUnit>,

    /// Time format: min or hr:min
    #[arg(long)]
    time_unit: Option<TimeUnit>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List recorded sessions
    Sessions,

    /// Show the weather near a session's start and its weather stats
    Weather {
        /// Session id
        session_id: i64,
    },

    /// Manage friends and friend requests
    Friends {
        #[command(subcommand)]
        action: FriendsAction,
    },

    /// Weekly totals from JSON day logs
    Weekly {
        /// JSON array of days for the week to summarize
        current: PathBuf,
        /// JSON array of days for the week to compare against
        previous: PathBuf,
    },

    /// Recovery guidance from a JSON recovery log
    Recovery {
        /// JSON array of recovery days
        log: PathBuf,
    },

    /// Set goals for a date range and list people with similar goals
    Goals(GoalArgs),
}

#[derive(Args, Debug)]
struct GoalArgs {
    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start: Option<String>,
    /// End date (YYYY-MM-DD), defaults to two weeks from today
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    steps: Option<String>,
    /// Running minutes
    #[arg(long)]
    minutes: Option<String>,
    #[arg(long)]
    cycling_minutes: Option<String>,
    #[arg(long)]
    swimming_minutes: Option<String>,
    #[arg(long)]
    exercise_minutes: Option<String>,
    #[arg(long)]
    calories: Option<String>,
}

#[derive(Subcommand, Debug)]
enum FriendsAction {
    /// List friends
    List,
    /// List pending requests
    Requests,
    /// Send a friend request
    Send {
        name: String,
        #[arg(default_value = "https://i.pravatar.cc/150")]
        avatar: String,
    },
    /// Accept a pending request
    Accept { request_id: String },
    /// Decline a pending request
    Decline { request_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    fittrack_core::init()?;

    let cli = Cli::parse();

    let config = match Config::load_validated(cli.api_url.clone()) {
        Ok((config, _)) => config,
        Err(err) => {
            let err = AppError::from(err);
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    let units = config.units.updated(cli.distance_unit, cli.time_unit);

    match cli.command {
        Commands::Sessions => list_sessions(&config, &units).await,
        Commands::Weather { session_id } => show_weather(&config, session_id).await,
        Commands::Friends { action } => friends(&config, action),
        Commands::Weekly { current, previous } => weekly(&current, &previous, &units),
        Commands::Recovery { log } => recovery(&log),
        Commands::Goals(args) => goals(args),
    }
}

fn sessions_service(config: &Config) -> Result<SessionsService> {
    let client = SessionClient::with_timeout(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?;
    tracing::debug!("Using sessions API at {}", client.base_url());
    Ok(SessionsService::new(Arc::new(client)))
}

async fn list_sessions(config: &Config, units: &UnitSettings) -> Result<()> {
    let service = sessions_service(config)?;
    if let Err(err) = service.refresh().await {
        eprintln!("{}", err.user_message());
        return Err(AppError::from(err).into());
    }

    let snapshot = service.snapshot();
    if snapshot.sessions.is_empty() {
        println!("No sessions yet. POST one to the backend, then refresh.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<16}  {:<16}  {:<10}  {:>10}  {:>8}",
        "ID", "Start", "End", "Sport", "Distance", "Duration"
    );
    for session in &snapshot.sessions {
        println!("{}", format::session_row(session, units));
    }
    Ok(())
}

async fn show_weather(config: &Config, session_id: i64) -> Result<()> {
    let service = sessions_service(config)?;
    if let Err(err) = service.refresh().await {
        eprintln!("{}", err.user_message());
        return Err(AppError::from(err).into());
    }

    let handle = service
        .select_id(session_id)
        .with_context(|| format!("Session #{} not found", session_id))?;
    handle.await.context("Weather task failed")?;

    let snapshot = service.snapshot();
    let Some(session) = snapshot.selected else {
        anyhow::bail!("Session #{} is no longer selected", session_id);
    };

    println!("Session #{}", session.id);
    println!("Start: {}", format::format_timestamp(&session.start_time));
    println!("End: {}", format::format_timestamp(&session.end_time));
    println!("Coords: {}, {}", session.lat, session.lon);

    match (&snapshot.state, snapshot.weather) {
        (SelectionState::Failed { message, .. }, _) => {
            println!("Weather near start: {}", format::PLACEHOLDER);
            eprintln!("Could not load weather: {}", message);
        }
        (_, Some(weather)) => {
            println!("Weather near start: {}", format::weather_badge(weather.nearest.as_ref()));
            if let Some(stats) = weather.stats {
                println!();
                println!("Session weather stats");
                for line in format::stats_lines(&stats) {
                    println!("  {}", line);
                }
                if weather.coverage.is_sparse() {
                    println!(
                        "  (averages count missing readings as 0: {}/{} temperature, {}/{} humidity)",
                        weather.coverage.temperature,
                        weather.coverage.total,
                        weather.coverage.humidity,
                        weather.coverage.total
                    );
                }
            }
        }
        _ => println!("Weather near start: {}", format::PLACEHOLDER),
    }
    Ok(())
}

fn friends(config: &Config, action: FriendsAction) -> Result<()> {
    let store = JsonFileFriendStore::new(config.friends_store_path());
    let service = FriendsService::new(store).map_err(AppError::from)?;

    let outcome = match action {
        FriendsAction::List => {
            for friend in service.friends() {
                println!("{:<12}  {}", friend.id, friend.name);
            }
            Ok(())
        }
        FriendsAction::Requests => {
            for request in service.requests() {
                println!("{:<16}  {}", request.id, request.name);
            }
            Ok(())
        }
        FriendsAction::Send { name, avatar } => service
            .send_request(NewFriendRequest { name, avatar })
            .map(|r| println!("Sent request {} to {}", r.id, r.name)),
        FriendsAction::Accept { request_id } => service
            .accept_request(&request_id)
            .map(|f| println!("{} is now your friend", f.name)),
        FriendsAction::Decline { request_id } => service
            .decline_request(&request_id)
            .map(|r| println!("Declined request from {}", r.name)),
    };

    outcome.map_err(|err| {
        eprintln!("{}", err.user_message());
        AppError::from(err).into()
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn weekly(current: &Path, previous: &Path, units: &UnitSettings) -> Result<()> {
    let this_week: Vec<DayActivity> = read_json(current)?;
    let last_week: Vec<DayActivity> = read_json(previous)?;
    let totals = fittrack_insights::week_totals(&this_week, &last_week);

    println!(
        "Total time: {}",
        format::format_duration(totals.total_time.round() as i64, units)
    );
    println!("Total distance: {}", format::format_distance(totals.total_distance, units));
    match (totals.avg_speed, totals.best_speed) {
        (Some(avg), Some(best)) => {
            println!("Avg speed: {:.2} km/h", avg);
            println!("Best speed: {:.1} km/h", best);
        }
        _ => println!("Avg speed: {}", format::PLACEHOLDER),
    }
    println!(
        "Compared to previous week: {:+.0} min ({:+.1}%)",
        totals.time_diff, totals.time_diff_pct
    );
    Ok(())
}

fn recovery(log: &Path) -> Result<()> {
    let days: Vec<RecoveryDay> = read_json(log)?;

    for day in &days {
        let rec = fittrack_insights::recommendation(day.fatigue_level, day.sleep_hours);
        println!(
            "{:<4} sleep {:>4.1}h  fatigue {:>4.1}  {}{}",
            day.day,
            day.sleep_hours,
            day.fatigue_level,
            rec.message(),
            if day.rest_day { "  (rest day)" } else { "" }
        );
    }

    if fittrack_insights::rough_streak(&days) {
        println!();
        println!("You've had 2+ rough recovery days. Consider resting:");
        for tip in fittrack_insights::RECOVERY_TIPS {
            println!("  - {}", tip);
        }
    }
    Ok(())
}

fn goals(args: GoalArgs) -> Result<()> {
    let mut form = GoalForm::starting_today();
    if let Some(start) = args.start {
        form.start_date = start;
    }
    if let Some(end) = args.end {
        form.end_date = end;
    }
    let fields = [
        (GoalField::Steps, args.steps),
        (GoalField::Minutes, args.minutes),
        (GoalField::CyclingMinutes, args.cycling_minutes),
        (GoalField::SwimmingMinutes, args.swimming_minutes),
        (GoalField::ExerciseMinutes, args.exercise_minutes),
        (GoalField::Calories, args.calories),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            form.set_field(field, value);
        }
    }

    let plan = form.validate()?;

    println!("Goals from {} to {}", plan.start, plan.end);
    for field in GoalField::ALL {
        match plan.targets.get(field) {
            Some(target) => println!("  {:<20} {}", field.label(), target),
            None => println!("  {:<20} {}", field.label(), format::PLACEHOLDER),
        }
    }

    println!();
    println!("People with similar goals");
    for user in fittrack_insights::similar_users(&plan.targets) {
        println!("  {:>3}% match  {} ({})", user.match_score, user.name, user.highlights.join(", "));
    }
    Ok(())
}
