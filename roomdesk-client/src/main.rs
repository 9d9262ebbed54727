use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roomdesk_booking::{discount_label, format_money, resolve_price, RoomLine};
use roomdesk_client::{filter_users, AppState, Notice, RoleFilter, UsersPage};
use roomdesk_core::session::spawn_session_watcher;
use roomdesk_core::{AccessState, BookingBackend};
use roomdesk_shared::{HotelSearch, Masked};
use roomdesk_store::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roomdesk", about = "Hotel booking desk client")]
struct Cli {
    /// Overrides `api.base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Overrides `session.path`.
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// List bookings visible to the signed-in user.
    Bookings,
    /// Stage room statuses for one booking and submit them.
    Update {
        booking_id: i64,
        /// `BOOKING_ROOM_ID=STATUS`, repeatable.
        #[arg(long = "room", value_parser = parse_room_status)]
        rooms: Vec<(i64, String)>,
        #[arg(long)]
        message: Option<String>,
    },
    Hotels {
        #[command(subcommand)]
        command: HotelsCommand,
    },
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Admin user list, filtered locally.
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        role: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Print the page a path resolves to for the current session.
    Route { path: String },
    /// Keep polling the session file and report sign-in changes.
    Watch,
}

#[derive(Subcommand)]
enum HotelsCommand {
    Search {
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        persons: u32,
        #[arg(long, default_value_t = 1)]
        rooms: u32,
    },
    Show { hotel_id: i64 },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    List,
    Add { hotel_id: i64 },
    Remove { hotel_id: i64 },
}

fn parse_room_status(raw: &str) -> Result<(i64, String), String> {
    let (id, status) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected BOOKING_ROOM_ID=STATUS, got `{raw}`"))?;
    let id = id.trim().parse().map_err(|e| format!("bad room id `{id}`: {e}"))?;
    Ok((id, status.trim().to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomdesk=info,roomdesk_client=info,roomdesk_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load().context("Failed to load config")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(path) = cli.session_file {
        config.session.path = path;
    }
    tracing::debug!("Using API at {}", config.api.base_url);

    let app = AppState::init(config).await.context("Failed to restore session")?;
    if let Err(e) = run(&app, cli.command).await {
        match e.downcast_ref::<roomdesk_core::ClientError>() {
            Some(client_err) => eprintln!("{}", client_err.user_message()),
            None => eprintln!("{e:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(app: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = app.api.login(&username, Masked(password)).await?;
            println!("Signed in as {} ({})", user.display_name(), user.role);
        }
        Command::Logout => {
            app.api.logout().await?;
            println!("Signed out");
        }
        Command::Whoami => match app.api.current_user().await {
            Some(user) => println!("{} <{}> role={}", user.username, user.email, user.role),
            None if app.session.is_authenticated().await => println!("Signed in (no user record)"),
            None => println!("Not signed in"),
        },
        Command::Bookings => print_bookings(app).await?,
        Command::Update { booking_id, rooms, message } => {
            let board = app.booking_board().await;
            board.load().await?;
            for (booking_room_id, status) in &rooms {
                if !board.stage(booking_id, *booking_room_id, status).await {
                    eprintln!("Ignoring `{booking_room_id}={status}`");
                }
            }
            if let Some(message) = message {
                board.set_message(booking_id, &message).await;
            }
            board.submit(booking_id).await?;
            if let Some(Notice::Success(text)) = board.notice().await {
                println!("{text}");
            }
        }
        Command::Hotels { command } => hotels(app, command).await?,
        Command::Favorites { command } => match command {
            FavoritesCommand::List => {
                for hotel in app.api.favorites().await? {
                    println!("#{} {} ({}, {})", hotel.id, hotel.name, hotel.city, hotel.country);
                }
            }
            FavoritesCommand::Add { hotel_id } => println!("{}", app.api.add_favorite(hotel_id).await?),
            FavoritesCommand::Remove { hotel_id } => println!("{}", app.api.remove_favorite(hotel_id).await?),
        },
        Command::Users { search, role, limit, page } => {
            let page = UsersPage {
                limit: limit.unwrap_or(app.config.lookup.users_page_size),
                page,
            };
            let users = app.api.users(page).await?;
            for user in filter_users(&users, &search, &RoleFilter::parse(&role)) {
                println!("#{} {} <{}> {}", user.id, user.display_name(), user.email, user.role);
            }
        }
        Command::Route { path } => {
            let mut navigator = app.navigator();
            let page = navigator.navigate(&path, None).await.clone();
            println!("{} -> {:?} (access: {:?})", navigator.route().path(), page, navigator.access());
        }
        Command::Watch => {
            let mut events = app.session.subscribe();
            let _watcher = spawn_session_watcher(app.session.clone(), app.config.session.poll_interval());
            println!("Watching {} (Ctrl-C to stop)", app.config.session.path.display());
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Ok(event) => println!("{event:?}"),
                        Err(e) => tracing::warn!("Session event stream lagged: {}", e),
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }
    Ok(())
}

async fn print_bookings(app: &AppState) -> anyhow::Result<()> {
    let access = app.access().await;
    if access == AccessState::Anonymous {
        anyhow::bail!(roomdesk_core::ClientError::AuthRequired("not signed in".to_string()));
    }
    let board = app.booking_board().await;
    board.load().await?;

    let summaries = board.summaries().await;
    if summaries.is_empty() {
        println!("No bookings found");
    }
    for summary in summaries {
        println!("{}", summary.headline());
        println!("  {} | {} | {}", summary.hotel_name, summary.hotel_location, summary.date_range);
        if access.is_staff() {
            println!("  Guest: {} | Staff: {}", summary.guest_name, summary.staff_label);
        } else if let Some(latest) = &summary.latest_message {
            println!("  Latest message: {latest}");
        }
        for RoomLine { booking_room_id, room_id, status, charged_price, discount_label: label, .. } in &summary.rooms {
            let discount = label.as_deref().map(|d| format!(" ({d})")).unwrap_or_default();
            println!("    [{booking_room_id}] room {room_id}: {status} {charged_price}{discount}");
        }
    }
    Ok(())
}

async fn hotels(app: &AppState, command: HotelsCommand) -> anyhow::Result<()> {
    match command {
        HotelsCommand::Search { country, city, start, end, persons, rooms } => {
            let filters = HotelSearch {
                country,
                city,
                start_date: start,
                end_date: end,
                person_number: persons,
                room_number: rooms,
            };
            for hotel in app.api.search_hotels(&filters).await? {
                println!("#{} {} ({}, {})", hotel.id, hotel.name, hotel.city, hotel.country);
            }
        }
        HotelsCommand::Show { hotel_id } => {
            let hotel = app.api.fetch_hotel(hotel_id).await?;
            println!("{} - {}, {}", hotel.name, hotel.city, hotel.country);
            if !hotel.address.is_empty() {
                println!("{}", hotel.address);
            }
            for room in app.api.hotel_rooms(hotel_id).await? {
                let nightly = format_money(resolve_price(room.price_per_night.as_ref()));
                let charged = format_money(resolve_price(room.actual_price.as_ref()));
                let discount = discount_label(&room).map(|d| format!(" ({d})")).unwrap_or_default();
                println!(
                    "  room {} | sleeps {} | {} | {} -> {}{}",
                    room.id,
                    room.capacity,
                    room.bed_option.as_deref().unwrap_or("-"),
                    nightly,
                    charged,
                    discount
                );
            }
            if app.session.is_authenticated().await && app.api.is_favorite(hotel_id).await {
                println!("In your favorites");
            }
        }
    }
    Ok(())
}
