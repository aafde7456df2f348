use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Form, Router,
};
use tracing::{debug, info};

use crate::{
    auth::CurrentSession,
    error::AppError,
    models::{booking::BookingForm, trip::NewTripRecord},
    routes::public::render_landing,
    services::whatsapp,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/booking", post(booking_submit))
}

async fn booking_submit(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(form): Form<BookingForm>,
) -> Result<Response, AppError> {
    let booking = match form.validate() {
        Ok(booking) => booking,
        Err(err) => {
            debug!("booking rejected: {err}");
            return render_landing(&state, &current, form, Some(err.to_string())).await;
        }
    };

    let user = current.customer();
    let record = state
        .trips
        .create(NewTripRecord {
            client_name: booking.name.clone(),
            pickup: booking.pickup.street.clone(),
            destination: booking.destination.street.clone(),
            user_id: user.map(|u| u.id.clone()),
        })
        .await?;

    let message = whatsapp::compose_booking_message(&booking, user);
    let link = whatsapp::chat_link(&state.config.whatsapp_number, &message)?;
    info!(trip_id = %record.id, "booking handed off to whatsapp");

    Ok(Redirect::to(link.as_str()).into_response())
}
