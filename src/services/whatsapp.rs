use chrono::{Datelike, NaiveDateTime, Weekday};
use url::{form_urlencoded, Url};

use crate::{
    error::AppError,
    models::{
        booking::{Address, Booking},
        user::User,
    },
};

const CHAT_BASE_URL: &str = "https://wa.me";

/// Builds the hand-off message the customer sends to the driver.
pub fn compose_booking_message(booking: &Booking, user: Option<&User>) -> String {
    let club_status = match user {
        Some(user) => {
            let loyalty = user.loyalty();
            format!(
                "👑 *MEMBRO DO CLUBE* \n(Total Viagens: {} | Desconto Fidelidade: {}%)",
                user.trip_count, loyalty.current_discount
            )
        }
        None => "👤 *Cliente Visitante*".to_string(),
    };

    let trunk = if booking.needs_trunk {
        "Sim ✅"
    } else {
        "Não ❌"
    };

    format!(
        "*Nova Solicitação de Viagem - Motorista Profissional* 🚀\n\
         \n\
         {club_status}\n\
         \n\
         *Cliente:* {name}\n\
         *WhatsApp:* {whatsapp}\n\
         *Data e Hora:* {when} 📅\n\
         *Precisa de Porta-malas:* {trunk}\n\
         \n\
         *De:* \n\
         {pickup}\n\
         \n\
         *Para:*\n\
         {destination}\n\
         \n\
         _Agendamento via Site_",
        name = booking.name,
        whatsapp = booking.whatsapp,
        when = format_pickup_time(booking.time),
        pickup = describe_address("📍", &booking.pickup),
        destination = describe_address("🏁", &booking.destination),
    )
}

/// `https://wa.me/<number>?text=<message>`, with spaces sent as `%20`.
pub fn chat_link(number: &str, message: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(CHAT_BASE_URL)
        .map_err(|err| AppError::Config(format!("invalid chat base url: {err}")))?;
    url.set_path(number);
    url.set_query(Some(&format!("text={}", encode_component(message))));
    Ok(url)
}

// Form encoding turns spaces into `+`, which the chat prefill shows literally.
// A literal `+` is already escaped as `%2B` at this point.
fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub fn format_pickup_time(time: NaiveDateTime) -> String {
    format!(
        "{}, {}",
        weekday_short(time.weekday()),
        time.format("%d/%m/%Y, %H:%M")
    )
}

fn weekday_short(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "seg.",
        Weekday::Tue => "ter.",
        Weekday::Wed => "qua.",
        Weekday::Thu => "qui.",
        Weekday::Fri => "sex.",
        Weekday::Sat => "sáb.",
        Weekday::Sun => "dom.",
    }
}

fn describe_address(marker: &str, address: &Address) -> String {
    if address.is_airport() {
        format!("{marker} {}", address.street)
    } else {
        format!(
            "{marker} Rua: {}\n   Nº: {}\n   Bairro: {}",
            address.street, address.number, address.neighborhood
        )
    }
}
