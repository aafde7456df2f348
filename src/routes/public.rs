use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{self, CurrentSession},
    error::AppError,
    models::{
        booking::BookingForm,
        session::Session,
        settings::{Advantage, Car, CLUB_ADVANTAGES},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/login", get(login_form).post(login_submit))
        .route("/logout", post(logout))
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    hero_image: String,
    tip: String,
    logged_in: bool,
    is_admin: bool,
    customer_name: String,
    total_trips: u64,
    current_discount: u32,
    progress_width: String,
    trips_to_next_reward: u32,
    cycle_complete: bool,
    fleet: Vec<Car>,
    advantages: &'static [Advantage],
    whatsapp_number: String,
    form: BookingForm,
    trunk_checked: bool,
    pickup_airport: bool,
    destination_airport: bool,
    show_error: bool,
    error_message: String,
}

async fn landing(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<Response, AppError> {
    let mut form = BookingForm::default();
    if let Some(user) = current.customer() {
        form.name = user.name.clone();
    }
    render_landing(&state, &current, form, None).await
}

/// Renders the landing page, optionally keeping a rejected booking form.
pub(crate) async fn render_landing(
    state: &AppState,
    current: &CurrentSession,
    form: BookingForm,
    error: Option<String>,
) -> Result<Response, AppError> {
    let settings = state.site.load().await?;
    let customer = current.customer();
    let loyalty = customer.map(|user| user.loyalty()).unwrap_or_default();

    let status = if error.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    let template = LandingTemplate {
        hero_image: settings.hero_image,
        tip: state.tips.current().await,
        logged_in: customer.is_some(),
        is_admin: current.is_admin(),
        customer_name: customer.map(|u| u.name.clone()).unwrap_or_default(),
        total_trips: loyalty.total_trips,
        current_discount: loyalty.current_discount,
        progress_width: format!("{:.0}", loyalty.progress_percentage),
        trips_to_next_reward: loyalty.trips_to_next_reward,
        cycle_complete: loyalty.is_cycle_complete(),
        fleet: settings.fleet,
        advantages: &CLUB_ADVANTAGES,
        whatsapp_number: state.config.whatsapp_number.clone(),
        trunk_checked: form.wants_trunk(),
        pickup_airport: form.pickup().is_airport(),
        destination_airport: form.destination().is_airport(),
        form,
        show_error: error.is_some(),
        error_message: error.unwrap_or_default(),
    };
    Ok((status, AskamaTemplateResponse::into_response(template)).into_response())
}

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    show_error: bool,
    error_message: String,
    identifier: String,
}

async fn login_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(LoginTemplate {
        show_error: false,
        error_message: String::new(),
        identifier: String::new(),
    })
}

#[derive(Deserialize)]
struct LoginForm {
    identifier: String,
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if state.credentials.verify(&form.identifier, &form.password) {
        let session = Session::Admin {
            username: form.identifier.trim().to_string(),
        };
        info!("admin signed in from the customer login");
        return Ok((
            auth::apply_session_cookie(jar, &session)?,
            Redirect::to("/admin"),
        )
            .into_response());
    }

    let identifier = form.identifier.trim();
    if identifier.is_empty() || form.password.trim().is_empty() {
        return Ok(render_login_error(
            form.identifier,
            "Preencha todos os campos.".into(),
        ));
    }

    let user = auth::customer_login(&state, identifier).await?;
    info!(user_id = %user.id, trips = user.trip_count, "customer signed in");
    let session = Session::Customer { user };
    Ok((
        auth::apply_session_cookie(jar, &session)?,
        Redirect::to("/"),
    )
        .into_response())
}

fn render_login_error(identifier: String, message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        AskamaTemplateResponse::into_response(LoginTemplate {
            show_error: true,
            error_message: message,
            identifier,
        }),
    )
        .into_response()
}

async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (auth::clear_session_cookie(jar), Redirect::to("/"))
}
