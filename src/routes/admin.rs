use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    auth::{self, CurrentSession},
    error::AppError,
    models::{
        session::Session,
        trip::{TripRecord, TripStatus},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/login", get(login_form).post(login_submit))
        .route("/logout", post(logout))
        .route("/settings", post(settings_submit))
        .route("/trips/clear", post(clear_trips))
        .route("/trips/:id/status", post(update_trip_status))
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
struct AdminDashboardTemplate {
    trips: Vec<TripRow>,
    pending_count: usize,
    confirmed_count: usize,
    cancelled_count: usize,
    hero_image: String,
    cars: Vec<CarRow>,
}

#[derive(Clone)]
struct TripRow {
    id: String,
    date: String,
    client_name: String,
    pickup: String,
    destination: String,
    customer: String,
    status: &'static str,
    status_label: &'static str,
    can_confirm: bool,
    can_cancel: bool,
}

impl From<TripRecord> for TripRow {
    fn from(trip: TripRecord) -> Self {
        Self {
            customer: trip
                .user_id
                .map(|id| format!("Cliente #{id}"))
                .unwrap_or_else(|| "Visitante".into()),
            id: trip.id,
            date: trip.date,
            client_name: trip.client_name,
            pickup: trip.pickup,
            destination: trip.destination,
            status: trip.status.as_str(),
            status_label: trip.status.label(),
            can_confirm: trip.status != TripStatus::Confirmed,
            can_cancel: trip.status != TripStatus::Cancelled,
        }
    }
}

#[derive(Clone)]
struct CarRow {
    index: usize,
    kind: String,
    image: String,
}

async fn dashboard(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, AppError> {
    current.require_admin()?;
    let trips = state.trips.list_all().await?;
    let count = |status: TripStatus| trips.iter().filter(|t| t.status == status).count();
    let pending_count = count(TripStatus::Pending);
    let confirmed_count = count(TripStatus::Confirmed);
    let cancelled_count = count(TripStatus::Cancelled);

    let settings = state.site.load().await?;
    let cars = settings
        .fleet
        .into_iter()
        .enumerate()
        .map(|(index, car)| CarRow {
            index,
            kind: car.kind,
            image: car.image,
        })
        .collect();

    Ok(AskamaTemplateResponse::into_response(
        AdminDashboardTemplate {
            // newest first
            trips: trips.into_iter().rev().map(TripRow::from).collect(),
            pending_count,
            confirmed_count,
            cancelled_count,
            hero_image: settings.hero_image,
            cars,
        },
    ))
}

#[derive(Template)]
#[template(path = "admin/login.html")]
struct AdminLoginTemplate {
    show_error: bool,
    error_message: String,
    username: String,
}

async fn login_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(AdminLoginTemplate {
        show_error: false,
        error_message: String::new(),
        username: String::new(),
    })
}

#[derive(Deserialize)]
struct AdminLoginForm {
    username: String,
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Result<Response, AppError> {
    if !state.credentials.verify(&form.username, &form.password) {
        warn!(username = %form.username.trim(), "admin login rejected");
        return Ok((
            StatusCode::BAD_REQUEST,
            AskamaTemplateResponse::into_response(AdminLoginTemplate {
                show_error: true,
                error_message: "Credenciais inválidas.".into(),
                username: form.username,
            }),
        )
            .into_response());
    }

    let session = Session::Admin {
        username: form.username.trim().to_string(),
    };
    info!("admin signed in");
    Ok((
        auth::apply_session_cookie(jar, &session)?,
        Redirect::to("/admin"),
    )
        .into_response())
}

async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (auth::clear_session_cookie(jar), Redirect::to("/"))
}

/// Field names are `hero_image` and `car_image_<index>`, one per fleet entry.
async fn settings_submit(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    current.require_admin()?;
    let mut hero_image = None;
    let mut car_images = Vec::new();
    for (name, value) in fields {
        if name == "hero_image" {
            hero_image = Some(value);
        } else if let Some(index) = name
            .strip_prefix("car_image_")
            .and_then(|raw| raw.parse::<usize>().ok())
        {
            car_images.push((index, value));
        }
    }

    let mut settings = state.site.load().await?;
    settings.apply_edits(hero_image.as_deref(), &car_images);
    state.site.save(&settings).await?;
    Ok(Redirect::to("/admin"))
}

#[derive(Deserialize)]
struct StatusForm {
    status: String,
}

async fn update_trip_status(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(trip_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    current.require_admin()?;
    let status: TripStatus = form
        .status
        .parse()
        .map_err(|err| AppError::BadRequest(format!("{err}")))?;
    state.trips.update_status(&trip_id, status).await?;
    Ok(Redirect::to("/admin"))
}

#[derive(Deserialize)]
struct ClearForm {
    #[serde(default)]
    confirm: String,
}

async fn clear_trips(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(form): Form<ClearForm>,
) -> Result<Redirect, AppError> {
    current.require_admin()?;
    if form.confirm != "yes" {
        return Err(AppError::BadRequest(
            "Confirme a limpeza do histórico.".into(),
        ));
    }
    state.trips.clear_all().await?;
    Ok(Redirect::to("/admin"))
}
