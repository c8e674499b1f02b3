//! Administrator commands: session, approvals, dashboard, blocking and masters

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::UpdateBooking,
        dashboard::DashboardFilter,
        enums::HallCategory,
        hall::CreateOffice,
    },
    services::{
        approvals::ApprovalFilter,
        blocking::{admin_range, HallScope},
        refresh::ScheduledRefresh,
        selection::SelectedRange,
    },
    AppState,
};

use super::{prompt::Prompt, render, DashboardArgs, EditBookingArgs, OfficeArgs, RangeArgs};

pub async fn login(state: &AppState, prompt: &mut Prompt, username: &str, password: Option<String>) -> AppResult<()> {
    let password = match password {
        Some(password) => password,
        None => prompt.ask_hidden("Password:").await?,
    };
    let user = state.services.auth.login(username, &password).await?;
    let role = user.role.map(|r| r.to_string()).unwrap_or_else(|| "no role".to_string());
    println!("Logged in as {} ({})", user.username, role);
    Ok(())
}

pub fn logout(state: &AppState) -> AppResult<()> {
    state.services.auth.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(state: &AppState) -> AppResult<()> {
    print!("{}", render::session_info(&state.services.auth.session_info()));
    Ok(())
}

pub async fn approvals(
    state: &AppState,
    status: &str,
    office: Option<i64>,
    category: Option<HallCategory>,
    session: Option<i64>,
) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let filter = ApprovalFilter {
        status: ApprovalFilter::parse_status(status)?,
        office,
        category,
        session,
    };
    let bookings = state.services.approvals.list(&filter).await?;
    print!("{}", render::bookings(&bookings.iter().collect::<Vec<_>>()));
    Ok(())
}

/// Show what is left in the queue after a change
async fn show_pending(state: &AppState) -> AppResult<()> {
    let pending = state.services.approvals.list(&ApprovalFilter::default()).await?;
    println!("{} booking(s) awaiting approval", pending.len());
    Ok(())
}

pub async fn approve(state: &AppState, id: i64) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let booking = state.services.approvals.approve(id).await?;
    print!("{}", render::booking(&booking));
    show_pending(state).await
}

pub async fn reject(state: &AppState, id: i64, reason: &str) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let booking = state.services.approvals.reject(id, reason).await?;
    print!("{}", render::booking(&booking));
    show_pending(state).await
}

pub async fn edit_booking(state: &AppState, args: EditBookingArgs) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let changes = UpdateBooking {
        slot_date: args.date,
        slot_time: args.slot,
        hall: args.hall,
        session: args.session,
        description: args.description,
    };
    let booking = state.services.approvals.edit(args.id, &changes).await?;
    print!("{}", render::booking(&booking));
    Ok(())
}

pub async fn dashboard(state: &AppState, args: DashboardArgs) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let filter = DashboardFilter {
        office_id: args.office,
        slot_date: args.date,
        category: args.category,
        session_id: args.session,
    };

    let reference = state.services.dashboard.reference_data().await?;
    if let Some(id) = filter.office_id.filter(|id| !reference.offices.iter().any(|o| o.id == *id)) {
        return Err(AppError::Validation(format!("Unknown office {}", id)));
    }
    if let Some(id) = filter.session_id.filter(|id| !reference.sessions.iter().any(|s| s.id == *id)) {
        return Err(AppError::Validation(format!("Unknown session {}", id)));
    }

    if !args.watch {
        let snapshot = state.services.dashboard.snapshot(&filter).await;
        print!("{}", render::dashboard(&snapshot));
        return Ok(());
    }

    let service = state.services.dashboard.clone();
    let clock = *state.services.availability.clock();
    let refresh = ScheduledRefresh::spawn(state.config.refresh_period(), move || {
        let service = service.clone();
        async move {
            let snapshot = service.snapshot(&filter).await;
            println!("--- {} ---", clock.now().format("%Y-%m-%d %H:%M"));
            print!("{}", render::dashboard(&snapshot));
        }
    });

    tokio::signal::ctrl_c().await?;
    refresh.stop().await;
    Ok(())
}

pub async fn block(state: &AppState, args: RangeArgs) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let blocking = &state.services.blocking;
    let range = admin_range(args.from, args.to, state.services.calendar.today())?;
    let halls = blocking.halls_in_scope(&HallScope::parse(&args.scope)).await?;

    let report = blocking.block(halls, &range).await?;
    print!("{}", render::report(&report));
    match report.failure {
        Some(failure) => Err(AppError::BadRequest(failure)),
        None => Ok(()),
    }
}

pub async fn unblock(state: &AppState, args: RangeArgs) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let blocking = &state.services.blocking;
    let range = admin_range(args.from, args.to, state.services.calendar.today())?;
    let halls = blocking.halls_in_scope(&HallScope::parse(&args.scope)).await?;

    let report = blocking.unblock(halls, &range).await?;
    if report.is_empty() {
        println!("Nothing to unblock");
        return Ok(());
    }
    print!("{}", render::report(&report));
    match report.failure {
        Some(failure) => Err(AppError::BadRequest(failure)),
        None => Ok(()),
    }
}

pub async fn blocked(state: &AppState, args: RangeArgs) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let blocking = &state.services.blocking;
    // listing may look back, unlike block and unblock
    let range = SelectedRange::new(args.from, args.to);
    let halls = blocking.halls_in_scope(&HallScope::parse(&args.scope)).await?;

    let listing = blocking.listing(&halls, &range).await?;
    if let Some(status) = listing.status {
        match (status.has_open, status.has_blocked) {
            (true, true) => println!("Range is partly blocked"),
            (false, true) => println!("Range is fully blocked"),
            _ => println!("Range is open"),
        }
    }
    print!("{}", render::blocked(&listing.rows));
    Ok(())
}

pub async fn sessions(state: &AppState) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let sessions = state.services.catalog.sessions().await?;
    print!("{}", render::sessions(&sessions));
    Ok(())
}

pub async fn session_hall(state: &AppState, session: i64, level: u8, hall: Option<i64>) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let updated = state.services.catalog.set_preferred_hall(session, level, hall).await?;
    print!("{}", render::sessions(std::slice::from_ref(&updated)));
    Ok(())
}

pub async fn office_add(state: &AppState, args: OfficeArgs) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let office = CreateOffice {
        office_code: args.code,
        office_name: args.name,
        office_tag: args.tag,
        office_street: args.street,
        office_area: args.area,
        office_city: args.city,
        office_state: args.state,
        office_country: args.country,
        office_pin_code: args.pin_code,
        office_spoc: args.spoc,
        entities: args.entities,
    };
    let office = state.services.catalog.create_office(&office).await?;
    print!("{}", render::offices(std::slice::from_ref(&office)));
    Ok(())
}

pub async fn office_delete(state: &AppState, id: i64) -> AppResult<()> {
    state.services.auth.require_admin()?;
    state.services.catalog.delete_office(id).await?;
    println!("Office {} deleted", id);
    Ok(())
}

pub async fn hall_freeze(state: &AppState, id: i64) -> AppResult<()> {
    state.services.auth.require_admin()?;
    let hall = state.services.catalog.toggle_freeze(id).await?;
    let verb = if hall.is_freeze { "frozen" } else { "reopened" };
    println!("{} {}", hall.hall_name, verb);
    Ok(())
}
