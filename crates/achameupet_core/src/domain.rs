//! crates/achameupet_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//!
//! The structs double as the stored document shape and the JSON payload shape,
//! so field names are mapped to the platform's established Portuguese wire
//! contract via serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position. Serialized as `{latitude, longitude}`, which is also
/// the shape the document-store adapters translate to a native geo point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "Cachorro")]
    Dog,
    #[serde(rename = "Gato")]
    Cat,
    #[serde(rename = "Outro")]
    Other,
}

impl Species {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Cachorro" => Some(Self::Dog),
            "Gato" => Some(Self::Cat),
            "Outro" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    #[serde(rename = "Pequeno")]
    Small,
    #[serde(rename = "Medio")]
    Medium,
    #[serde(rename = "Grande")]
    Large,
}

impl SizeClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pequeno" => Some(Self::Small),
            "Medio" => Some(Self::Medium),
            "Grande" => Some(Self::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "Macho")]
    Male,
    #[serde(rename = "Femea")]
    Female,
}

impl Sex {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Macho" => Some(Self::Male),
            "Femea" => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    #[serde(rename = "Perdido")]
    Lost,
    #[serde(rename = "Encontrado")]
    Found,
}

impl ListingStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Lost => "Perdido",
            Self::Found => "Encontrado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserKind {
    #[serde(rename = "Tutor")]
    Tutor,
    #[serde(rename = "Encontrador")]
    Finder,
    #[serde(rename = "ONG")]
    Organization,
    #[serde(rename = "Lojista")]
    Shop,
}

impl UserKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Tutor" => Some(Self::Tutor),
            "Encontrador" => Some(Self::Finder),
            "ONG" => Some(Self::Organization),
            "Lojista" => Some(Self::Shop),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Tutor => "Tutor",
            Self::Finder => "Encontrador",
            Self::Organization => "ONG",
            Self::Shop => "Lojista",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "Seguranca")]
    Security,
    #[serde(rename = "PossivelMatch")]
    PossibleMatch,
}

impl AlertKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Seguranca" => Some(Self::Security),
            "PossivelMatch" => Some(Self::PossibleMatch),
            _ => None,
        }
    }
}

/// Contact snippet denormalized into a listing at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerContact {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
}

/// One lost/found animal report.
///
/// `id` is assigned by the document store and is not part of the stored
/// record; it is stripped on write and re-attached on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub species: Species,
    #[serde(rename = "raca")]
    pub breed: String,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "porte")]
    pub size: SizeClass,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(
        rename = "caracteristicas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub marks: Option<Vec<String>>,
    #[serde(
        rename = "telefoneContato",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_phone: Option<String>,
    #[serde(rename = "usuarioId")]
    pub owner_id: String,
    #[serde(rename = "usuarioInfo")]
    pub owner_info: OwnerContact,
    /// Absent on legacy records; such records are skipped by proximity search.
    #[serde(rename = "localizacao", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
    #[serde(rename = "fotos")]
    pub photos: Vec<String>,
    pub status: ListingStatus,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "visualizacoes")]
    pub views: i64,
    #[serde(rename = "contatos")]
    pub contacts: i64,
    #[serde(rename = "dataPostagem")]
    pub posted_at: DateTime<Utc>,
    #[serde(rename = "dataAtualizacao")]
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// A registered user profile. The id equals the identity provider's subject
/// id, and unlike listings it is also stored inside the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    #[serde(rename = "fotoPerfil", default)]
    pub photo_url: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "receberPropaganda", default = "default_true")]
    pub marketing_opt_in: bool,
    #[serde(rename = "tipoUsuario")]
    pub kind: UserKind,
    #[serde(rename = "dataCadastro")]
    pub registered_at: DateTime<Utc>,
}

/// A community board message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardPost {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "conteudo")]
    pub body: String,
    #[serde(rename = "usuarioId")]
    pub owner_id: String,
    #[serde(rename = "dataPostagem")]
    pub posted_at: DateTime<Utc>,
    #[serde(rename = "visibilidade")]
    pub visibility: String,
}

/// A per-user notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: AlertKind,
    #[serde(rename = "mensagem")]
    pub message: String,
    #[serde(rename = "animalId", default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(rename = "usuarioId")]
    pub owner_id: String,
    #[serde(rename = "data")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lido")]
    pub read: bool,
}

/// The authenticated caller, as resolved from a verified bearer token.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl Caller {
    /// The contact snippet stored on listings this caller creates.
    pub fn contact(&self) -> OwnerContact {
        OwnerContact {
            name: self.name.clone().unwrap_or_else(|| "Anônimo".to_string()),
            phone: self.phone.clone().unwrap_or_default(),
        }
    }
}
