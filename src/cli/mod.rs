//! Command line surface of the `hallbook` binary

pub mod admin;
pub mod booking;
pub mod prompt;
pub mod render;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::{
    error::AppResult,
    models::{
        enums::{HallCategory, Shift},
        slot::Slot,
    },
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "hallbook", author, version, about = "Meeting hall booking client")]
pub struct Cli {
    /// Backend base URL, including the `/api` prefix
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the half-hour slots of a day
    Slots {
        #[arg(long)]
        from_hour: Option<u32>,
        #[arg(long)]
        to_hour: Option<u32>,
    },
    /// List offices
    Offices,
    /// List halls, optionally of one office or category
    Halls {
        #[arg(long)]
        office: Option<i64>,
        #[arg(long)]
        category: Option<HallCategory>,
    },
    /// Show one hall
    Hall { id: i64 },
    /// Show which slots of a hall are free on a date
    Availability {
        #[arg(long)]
        hall: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show a month of a hall's booking calendar
    Calendar {
        #[arg(long)]
        hall: i64,
        /// Month as YYYY-MM, defaults to the current one
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
    /// Book one or more slots over a date range
    Book(BookArgs),
    /// Show a booking
    Booking { id: i64 },
    /// Log in as an administrator
    Login {
        #[arg(long)]
        username: String,
        /// Asked without echo when omitted
        #[arg(long, env = "HALLBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// List your bookings (email verification required)
    History {
        /// `all` or a booking status
        #[arg(long, default_value = "all")]
        status: String,
        /// Verify a different email address
        #[arg(long)]
        email: Option<String>,
    },
    /// Cancel one of your bookings
    Cancel { id: i64 },
    /// List bookings for approval
    Approvals {
        /// `All` or a booking status
        #[arg(long, default_value = "Pending")]
        status: String,
        #[arg(long)]
        office: Option<i64>,
        #[arg(long)]
        category: Option<HallCategory>,
        #[arg(long)]
        session: Option<i64>,
    },
    /// Approve a booking
    Approve { id: i64 },
    /// Reject a booking
    Reject {
        id: i64,
        #[arg(long)]
        reason: String,
    },
    /// Change the date, time, hall, session or notes of a booking
    EditBooking(EditBookingArgs),
    /// Show the admin dashboard
    Dashboard(DashboardArgs),
    /// Block a date range for the halls in scope
    Block(RangeArgs),
    /// Reopen a date range for the halls in scope
    Unblock(RangeArgs),
    /// List blocked dates for the halls in scope
    Blocked(RangeArgs),
    /// List session masters and their preferred halls
    Sessions,
    /// Set or clear a preferred hall of a session
    SessionHall {
        #[arg(long)]
        session: i64,
        /// Preference level, 1 to 3
        #[arg(long)]
        level: u8,
        /// Omit to clear the preference
        #[arg(long)]
        hall: Option<i64>,
    },
    /// Create an office
    OfficeAdd(OfficeArgs),
    /// Delete an office
    OfficeDelete { id: i64 },
    /// Freeze or unfreeze a hall
    HallFreeze { id: i64 },
}

#[derive(Args, Debug)]
pub struct BookArgs {
    #[arg(long)]
    pub hall: i64,
    #[arg(long)]
    pub from: NaiveDate,
    /// Last day of the range, defaults to `from`
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Slot label such as "9:00 AM - 9:30 AM"; repeat for several slots
    #[arg(long = "slot", required = true)]
    pub slots: Vec<Slot>,
    #[arg(long)]
    pub session: Option<i64>,
    #[arg(long)]
    pub emp_code: String,
    #[arg(long)]
    pub emp_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub mobile: String,
    #[arg(long)]
    pub team: String,
    #[arg(long, default_value = "Day")]
    pub shift: Shift,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub it_support: bool,
    #[arg(long)]
    pub hr_support: bool,
    #[arg(long)]
    pub fin_support: bool,
    #[arg(long)]
    pub caf_support: bool,
    /// Amenities needed, e.g. `--amenity wifi,tv`; one of wifi, tv, whiteboard,
    /// speaker, mic, extension_power_box, stationaries, chairs_tables
    #[arg(long = "amenity", value_delimiter = ',')]
    pub amenities: Vec<String>,
    /// Request slots someone else is waiting on without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct EditBookingArgs {
    pub id: i64,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub slot: Option<Slot>,
    #[arg(long)]
    pub hall: Option<i64>,
    #[arg(long)]
    pub session: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    #[arg(long)]
    pub office: Option<i64>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub category: Option<HallCategory>,
    #[arg(long)]
    pub session: Option<i64>,
    /// Keep refreshing until interrupted
    #[arg(long)]
    pub watch: bool,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// `all` or an office name
    #[arg(long, default_value = "all")]
    pub scope: String,
    #[arg(long)]
    pub from: NaiveDate,
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct OfficeArgs {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub tag: String,
    #[arg(long, default_value = "")]
    pub street: String,
    #[arg(long, default_value = "")]
    pub area: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub country: String,
    #[arg(long, default_value = "")]
    pub pin_code: String,
    #[arg(long)]
    pub spoc: Option<String>,
    /// Entity ID; repeat for several
    #[arg(long = "entity")]
    pub entities: Vec<i64>,
}

fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("expected YYYY-MM, got '{}'", value);
    let (year, month) = value.split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Run one command against the shared state
pub async fn run(state: &AppState, command: Command) -> AppResult<()> {
    let mut prompt = prompt::Prompt::new();
    match command {
        Command::Slots { from_hour, to_hour } => booking::slots(state, from_hour, to_hour),
        Command::Offices => booking::offices(state).await,
        Command::Halls { office, category } => booking::halls(state, office, category).await,
        Command::Hall { id } => booking::hall(state, id).await,
        Command::Availability { hall, date } => booking::availability(state, hall, date).await,
        Command::Calendar { hall, month } => booking::calendar(state, hall, month).await,
        Command::Book(args) => booking::book(state, &mut prompt, args).await,
        Command::Booking { id } => booking::show_booking(state, id).await,
        Command::History { status, email } => booking::history(state, &mut prompt, &status, email).await,
        Command::Cancel { id } => booking::cancel(state, id).await,
        Command::Login { username, password } => admin::login(state, &mut prompt, &username, password).await,
        Command::Logout => admin::logout(state),
        Command::Whoami => admin::whoami(state),
        Command::Approvals {
            status,
            office,
            category,
            session,
        } => admin::approvals(state, &status, office, category, session).await,
        Command::Approve { id } => admin::approve(state, id).await,
        Command::Reject { id, reason } => admin::reject(state, id, &reason).await,
        Command::EditBooking(args) => admin::edit_booking(state, args).await,
        Command::Dashboard(args) => admin::dashboard(state, args).await,
        Command::Block(args) => admin::block(state, args).await,
        Command::Unblock(args) => admin::unblock(state, args).await,
        Command::Blocked(args) => admin::blocked(state, args).await,
        Command::Sessions => admin::sessions(state).await,
        Command::SessionHall { session, level, hall } => admin::session_hall(state, session, level, hall).await,
        Command::OfficeAdd(args) => admin::office_add(state, args).await,
        Command::OfficeDelete { id } => admin::office_delete(state, id).await,
        Command::HallFreeze { id } => admin::hall_freeze(state, id).await,
    }
}
