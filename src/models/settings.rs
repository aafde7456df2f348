use serde::{Deserialize, Serialize};

pub const DEFAULT_HERO_IMAGE: &str = "https://images.unsplash.com/photo-1493238792015-faa33f3cf54b?q=80&w=2073&auto=format&fit=crop";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub image: String,
}

impl Car {
    fn new(kind: &str, description: &str, image: &str) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            image: image.into(),
        }
    }
}

pub fn default_fleet() -> Vec<Car> {
    vec![
        Car::new(
            "Elétrico",
            "Silencioso e sustentável. Tecnologia de ponta para sua viagem.",
            "https://i.postimg.cc/RFs3p1LG/Gemini-Generated-Image-q913btq913btq913.png",
        ),
        Car::new(
            "Sedan Executivo",
            "Máximo conforto e espaço para pernas. Ideal para viagens longas.",
            "https://i.postimg.cc/rpvyDhgk/Gemini-Generated-Image-32h1t532h1t532h1.png",
        ),
        Car::new(
            "Hatch Premium",
            "Agilidade e praticidade para o trânsito urbano.",
            "https://i.postimg.cc/5Nkh9Xsc/Gemini-Generated-Image-xcsc7vxcsc7vxcsc.png",
        ),
    ]
}

/// Fixed perks listed for club members next to their discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advantage {
    pub title: &'static str,
    pub description: &'static str,
}

pub const CLUB_ADVANTAGES: [Advantage; 3] = [
    Advantage {
        title: "Desconto de 10%",
        description: "Em viagens acima de 50km.",
    },
    Advantage {
        title: "Wi-Fi disponível",
        description: "Cortesia em todos os veículos da frota.",
    },
    Advantage {
        title: "Prioridade na Agenda",
        description: "Membros do clube têm preferência de agendamentos.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub hero_image: String,
    pub fleet: Vec<Car>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            hero_image: DEFAULT_HERO_IMAGE.into(),
            fleet: default_fleet(),
        }
    }
}

impl SiteSettings {
    /// Applies admin edits. Blank values keep what was there; indices past
    /// the end of the fleet are ignored.
    pub fn apply_edits(&mut self, hero_image: Option<&str>, car_images: &[(usize, String)]) {
        if let Some(hero) = hero_image.map(str::trim).filter(|v| !v.is_empty()) {
            self.hero_image = hero.to_string();
        }
        for (index, url) in car_images {
            let url = url.trim();
            if url.is_empty() {
                continue;
            }
            if let Some(car) = self.fleet.get_mut(*index) {
                car.image = url.to_string();
            }
        }
    }
}
