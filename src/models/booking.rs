use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format produced by `<input type="datetime-local">`.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Por favor, informe seu nome.")]
    MissingName,
    #[error("O WhatsApp é obrigatório para contato.")]
    MissingWhatsapp,
    #[error("Por favor, informe a data e hora da viagem.")]
    MissingTime,
    #[error("Data e hora inválidas.")]
    InvalidTime,
    #[error("Por favor, informe a rua ou local de embarque.")]
    MissingPickupStreet,
    #[error("Por favor, preencha o Número e o Bairro do endereço de embarque.")]
    IncompletePickup,
    #[error("Por favor, informe a rua ou local de destino.")]
    MissingDestinationStreet,
    #[error("Por favor, preencha o Número e o Bairro do destino.")]
    IncompleteDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub neighborhood: String,
}

impl Address {
    /// Airports are named by place, so number and neighborhood are optional.
    pub fn is_airport(&self) -> bool {
        self.street.to_lowercase().contains("aeroporto")
    }

    fn trimmed(&self) -> Self {
        Self {
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            neighborhood: self.neighborhood.trim().to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        self.is_airport() || (!self.number.is_empty() && !self.neighborhood.is_empty())
    }
}

/// Raw booking form as posted by the landing page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BookingForm {
    pub name: String,
    pub whatsapp: String,
    pub time: String,
    pub needs_trunk: Option<String>,
    pub pickup_street: String,
    pub pickup_number: String,
    pub pickup_neighborhood: String,
    pub destination_street: String,
    pub destination_number: String,
    pub destination_neighborhood: String,
}

/// A booking that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub name: String,
    pub whatsapp: String,
    pub time: NaiveDateTime,
    pub needs_trunk: bool,
    pub pickup: Address,
    pub destination: Address,
}

impl BookingForm {
    pub fn pickup(&self) -> Address {
        Address {
            street: self.pickup_street.clone(),
            number: self.pickup_number.clone(),
            neighborhood: self.pickup_neighborhood.clone(),
        }
    }

    pub fn destination(&self) -> Address {
        Address {
            street: self.destination_street.clone(),
            number: self.destination_number.clone(),
            neighborhood: self.destination_neighborhood.clone(),
        }
    }

    pub fn wants_trunk(&self) -> bool {
        self.needs_trunk
            .as_deref()
            .map(|v| !v.is_empty() && v != "false")
            .unwrap_or(false)
    }

    /// Checks fields in form order and reports the first problem.
    pub fn validate(&self) -> Result<Booking, BookingError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BookingError::MissingName);
        }
        let whatsapp = self.whatsapp.trim();
        if whatsapp.is_empty() {
            return Err(BookingError::MissingWhatsapp);
        }
        let time = self.time.trim();
        if time.is_empty() {
            return Err(BookingError::MissingTime);
        }
        let time = NaiveDateTime::parse_from_str(time, DATETIME_LOCAL_FORMAT)
            .map_err(|_| BookingError::InvalidTime)?;

        let pickup = self.pickup().trimmed();
        if pickup.street.is_empty() {
            return Err(BookingError::MissingPickupStreet);
        }
        if !pickup.is_complete() {
            return Err(BookingError::IncompletePickup);
        }

        let destination = self.destination().trimmed();
        if destination.street.is_empty() {
            return Err(BookingError::MissingDestinationStreet);
        }
        if !destination.is_complete() {
            return Err(BookingError::IncompleteDestination);
        }

        Ok(Booking {
            name: name.to_string(),
            whatsapp: whatsapp.to_string(),
            time,
            needs_trunk: self.wants_trunk(),
            pickup,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BookingForm {
        BookingForm {
            name: "Ana".into(),
            whatsapp: "(47) 99999-0000".into(),
            time: "2026-10-21T14:30".into(),
            needs_trunk: Some("on".into()),
            pickup_street: "Rua Reinoldo Rau".into(),
            pickup_number: "100".into(),
            pickup_neighborhood: "Centro".into(),
            destination_street: "Rua Walter Marquardt".into(),
            destination_number: "5".into(),
            destination_neighborhood: "Barra do Rio Molha".into(),
        }
    }

    #[test]
    fn complete_form_validates() {
        let booking = filled().validate().expect("valid");
        assert_eq!(booking.name, "Ana");
        assert!(booking.needs_trunk);
        assert_eq!(booking.time.format("%d/%m/%Y %H:%M").to_string(), "21/10/2026 14:30");
    }

    #[test]
    fn whatsapp_is_required() {
        let form = BookingForm {
            whatsapp: "  ".into(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(BookingError::MissingWhatsapp));
    }

    #[test]
    fn time_must_be_present_and_parseable() {
        let missing = BookingForm {
            time: String::new(),
            ..filled()
        };
        assert_eq!(missing.validate(), Err(BookingError::MissingTime));

        let garbage = BookingForm {
            time: "amanhã cedo".into(),
            ..filled()
        };
        assert_eq!(garbage.validate(), Err(BookingError::InvalidTime));
    }

    #[test]
    fn street_addresses_need_number_and_neighborhood() {
        let form = BookingForm {
            pickup_neighborhood: String::new(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(BookingError::IncompletePickup));

        let form = BookingForm {
            destination_number: String::new(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(BookingError::IncompleteDestination));
    }

    #[test]
    fn airports_waive_number_and_neighborhood() {
        let form = BookingForm {
            pickup_street: "AEROPORTO de Navegantes".into(),
            pickup_number: String::new(),
            pickup_neighborhood: String::new(),
            destination_street: "Aeroporto de Joinville".into(),
            destination_number: String::new(),
            destination_neighborhood: String::new(),
            needs_trunk: None,
            ..filled()
        };
        let booking = form.validate().expect("airports are fine");
        assert!(booking.pickup.is_airport());
        assert!(booking.destination.is_airport());
        assert!(!booking.needs_trunk);
    }

    #[test]
    fn first_failure_wins() {
        let form = BookingForm {
            whatsapp: String::new(),
            pickup_number: String::new(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(BookingError::MissingWhatsapp));
    }
}
