//! crates/achameupet_core/src/validate.rs
//!
//! Pure validation functions. Each takes a draft of untyped request fields
//! (multipart text fields and query parameters arrive as strings) and returns
//! either the fully typed fields or the complete list of violations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{GeoPoint, Sex, SizeClass, Species, UserKind};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_BREED_LEN: usize = 50;
pub const MAX_COLOR_LEN: usize = 30;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CITY_LEN: usize = 100;
pub const MAX_NEIGHBORHOOD_LEN: usize = 100;
pub const MAX_MARK_LEN: usize = 30;
pub const MAX_PHOTOS: usize = 5;

pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_LIMIT: usize = 20;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10,11}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

//=========================================================================================
// Listing fields
//=========================================================================================

/// Raw listing fields as collected from a multipart form.
#[derive(Debug, Clone, Default)]
pub struct ListingDraft {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub sex: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub marks: Vec<String>,
    pub contact_phone: Option<String>,
}

/// Listing fields after validation, fully typed.
#[derive(Debug, Clone)]
pub struct ListingFields {
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub color: String,
    pub size: SizeClass,
    pub sex: Sex,
    pub description: Option<String>,
    pub city: String,
    pub neighborhood: String,
    pub position: GeoPoint,
    pub marks: Option<Vec<String>>,
    pub contact_phone: Option<String>,
}

fn required_string(
    value: &Option<String>,
    field: &str,
    max_len: usize,
    errors: &mut Vec<String>,
) -> String {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(format!("{field} is required"));
            String::new()
        }
        Some(s) if s.chars().count() > max_len => {
            errors.push(format!("{field} must be at most {max_len} characters"));
            String::new()
        }
        Some(s) => s.to_string(),
    }
}

fn required_coordinate(
    value: &Option<String>,
    field: &str,
    range: (f64, f64),
    errors: &mut Vec<String>,
) -> f64 {
    let Some(raw) = value.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        errors.push(format!("{field} is required"));
        return 0.0;
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= range.0 && v <= range.1 => v,
        Ok(_) => {
            errors.push(format!("{field} must be between {} and {}", range.0, range.1));
            0.0
        }
        Err(_) => {
            errors.push(format!("{field} must be a number"));
            0.0
        }
    }
}

/// Validates the listing schema shared by create and update. All violations
/// are collected before returning.
pub fn validate_listing(draft: &ListingDraft) -> Result<ListingFields, Vec<String>> {
    let mut errors = Vec::new();

    let name = required_string(&draft.name, "nome", MAX_NAME_LEN, &mut errors);
    let breed = required_string(&draft.breed, "raca", MAX_BREED_LEN, &mut errors);
    let color = required_string(&draft.color, "cor", MAX_COLOR_LEN, &mut errors);
    let city = required_string(&draft.city, "cidade", MAX_CITY_LEN, &mut errors);
    let neighborhood =
        required_string(&draft.neighborhood, "bairro", MAX_NEIGHBORHOOD_LEN, &mut errors);

    let species = match draft.species.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("tipo is required".to_string());
            Species::Other
        }
        Some(s) => Species::parse(s).unwrap_or_else(|| {
            errors.push("tipo must be one of: Cachorro, Gato, Outro".to_string());
            Species::Other
        }),
    };

    let size = match draft.size.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("porte is required".to_string());
            SizeClass::Small
        }
        Some(s) => SizeClass::parse(s).unwrap_or_else(|| {
            errors.push("porte must be one of: Pequeno, Medio, Grande".to_string());
            SizeClass::Small
        }),
    };

    let sex = match draft.sex.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("sexo is required".to_string());
            Sex::Male
        }
        Some(s) => Sex::parse(s).unwrap_or_else(|| {
            errors.push("sexo must be one of: Macho, Femea".to_string());
            Sex::Male
        }),
    };

    let description = match draft.description.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if s.chars().count() > MAX_DESCRIPTION_LEN => {
            errors.push(format!(
                "descricao must be at most {MAX_DESCRIPTION_LEN} characters"
            ));
            None
        }
        Some(s) => Some(s.to_string()),
    };

    let latitude = required_coordinate(&draft.latitude, "latitude", (-90.0, 90.0), &mut errors);
    let longitude =
        required_coordinate(&draft.longitude, "longitude", (-180.0, 180.0), &mut errors);

    let marks: Vec<String> = draft
        .marks
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if marks.iter().any(|m| m.chars().count() > MAX_MARK_LEN) {
        errors.push(format!(
            "caracteristicas entries must be at most {MAX_MARK_LEN} characters"
        ));
    }

    let contact_phone = match draft.contact_phone.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if !PHONE_RE.is_match(s) => {
            errors.push("telefoneContato must be 10 or 11 digits".to_string());
            None
        }
        Some(s) => Some(s.to_string()),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ListingFields {
        name,
        species,
        breed,
        color,
        size,
        sex,
        description,
        city,
        neighborhood,
        position: GeoPoint { latitude, longitude },
        marks: if marks.is_empty() { None } else { Some(marks) },
        contact_phone,
    })
}

//=========================================================================================
// Proximity query parameters
//=========================================================================================

/// Raw proximity-search parameters as they arrive in the query string.
#[derive(Debug, Clone, Default)]
pub struct ProximityDraft {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius_km: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ProximityQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub limit: usize,
}

/// Validates proximity-search parameters. Radius and limit fall back to their
/// defaults when absent; both must be positive when given.
pub fn validate_proximity(draft: &ProximityDraft) -> Result<ProximityQuery, Vec<String>> {
    let mut errors = Vec::new();

    let latitude = required_coordinate(&draft.latitude, "latitude", (-90.0, 90.0), &mut errors);
    let longitude =
        required_coordinate(&draft.longitude, "longitude", (-180.0, 180.0), &mut errors);

    let radius_km = match draft.radius_km.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_RADIUS_KM,
        Some(s) => match s.parse::<f64>() {
            Ok(r) if r.is_finite() && r > 0.0 => r,
            _ => {
                errors.push("raio must be a positive number".to_string());
                DEFAULT_RADIUS_KM
            }
        },
    };

    let limit = match draft.limit.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_LIMIT,
        Some(s) => match s.parse::<usize>() {
            Ok(l) if l > 0 => l,
            _ => {
                errors.push("limite must be a positive integer".to_string());
                DEFAULT_LIMIT
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProximityQuery {
        center: GeoPoint { latitude, longitude },
        radius_km,
        limit,
    })
}

//=========================================================================================
// User registration
//=========================================================================================

/// Raw registration fields from the request body.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub marketing_opt_in: Option<bool>,
    pub kind: Option<String>,
}

/// Registration fields after validation and normalization.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub whatsapp: String,
    pub photo_url: String,
    pub city: String,
    pub neighborhood: String,
    pub marketing_opt_in: bool,
    pub kind: UserKind,
}

/// Validates and normalizes a registration: names are trimmed, the email is
/// lowercased, and the whatsapp number is stripped to digits before the
/// length check.
pub fn validate_registration(draft: &RegistrationDraft) -> Result<Registration, Vec<String>> {
    let mut errors = Vec::new();

    let name = match draft.name.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("nome is required".to_string());
            String::new()
        }
        Some(s) if s.chars().count() < 3 || s.chars().count() > MAX_NAME_LEN => {
            errors.push(format!("nome must be 3 to {MAX_NAME_LEN} characters"));
            String::new()
        }
        Some(s) => s.to_string(),
    };

    let email = match draft.email.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("email is required".to_string());
            String::new()
        }
        Some(s) => {
            let normalized = s.to_lowercase();
            if !EMAIL_RE.is_match(&normalized) {
                errors.push("email is not a valid address".to_string());
            }
            normalized
        }
    };

    let password = match draft.password.as_deref() {
        None | Some("") => {
            errors.push("senha is required".to_string());
            String::new()
        }
        Some(s) if s.chars().count() < 6 => {
            errors.push("senha must be at least 6 characters".to_string());
            String::new()
        }
        Some(s) => s.to_string(),
    };

    let whatsapp = match draft.whatsapp.as_deref() {
        None | Some("") => {
            errors.push("whatsapp is required".to_string());
            String::new()
        }
        Some(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            if !PHONE_RE.is_match(&digits) {
                errors.push("whatsapp must contain 10 or 11 digits".to_string());
            }
            digits
        }
    };

    let city = required_string(&draft.city, "cidade", MAX_CITY_LEN, &mut errors);
    let neighborhood =
        required_string(&draft.neighborhood, "bairro", MAX_NEIGHBORHOOD_LEN, &mut errors);

    let photo_url = match draft.photo_url.as_deref().map(str::trim) {
        None | Some("") => String::new(),
        Some(s) if s.starts_with("http://") || s.starts_with("https://") => s.to_string(),
        Some(_) => {
            errors.push("fotoPerfil must be a valid URL".to_string());
            String::new()
        }
    };

    let kind = match draft.kind.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("tipoUsuario is required".to_string());
            UserKind::Tutor
        }
        Some(s) => UserKind::parse(s).unwrap_or_else(|| {
            errors.push("tipoUsuario must be one of: Tutor, Encontrador, ONG, Lojista".to_string());
            UserKind::Tutor
        }),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Registration {
        name,
        email,
        password,
        whatsapp,
        photo_url,
        city,
        neighborhood,
        marketing_opt_in: draft.marketing_opt_in.unwrap_or(true),
        kind,
    })
}
