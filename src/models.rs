//! Domain models and request/response types.
//!
//! Wire field names are camelCase to match the storefront client; ticket
//! statuses and user roles keep their canonical uppercase labels in JSON
//! and in the database.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Image URL stored when a product is created without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300";

/// Catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub stock: i32,
    pub image_url: String,
    pub banner_url: Option<String>,
    pub is_featured: bool,
    pub discount: i32,
    pub created_at: DateTime<Utc>,
}

/// Repair ticket, keyed by a short human-shareable identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairTicket {
    pub id: String,
    pub device_model: String,
    pub issue_description: String,
    pub contact_phone: String,
    pub status: TicketStatus,
    pub estimated_cost: Option<f64>,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket status lifecycle labels.
///
/// The nominal flow is PENDIENTE through the work states to LISTO and
/// ENTREGADO, but updates are permissive: any label may overwrite any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Pendiente,
    EnDiagnostico,
    EsperandoRepuesto,
    EnReparacion,
    Listo,
    Entregado,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pendiente => "PENDIENTE",
            TicketStatus::EnDiagnostico => "EN_DIAGNOSTICO",
            TicketStatus::EsperandoRepuesto => "ESPERANDO_REPUESTO",
            TicketStatus::EnReparacion => "EN_REPARACION",
            TicketStatus::Listo => "LISTO",
            TicketStatus::Entregado => "ENTREGADO",
        }
    }

    /// Parses a stored label, falling back to PENDIENTE for anything unknown.
    pub fn parse(label: &str) -> TicketStatus {
        match label {
            "EN_DIAGNOSTICO" => TicketStatus::EnDiagnostico,
            "ESPERANDO_REPUESTO" => TicketStatus::EsperandoRepuesto,
            "EN_REPARACION" => TicketStatus::EnReparacion,
            "LISTO" => TicketStatus::Listo,
            "ENTREGADO" => TicketStatus::Entregado,
            _ => TicketStatus::Pendiente,
        }
    }
}

/// Registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Access-level tag on a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Tecnico,
    Cliente,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Tecnico => "TECNICO",
            Role::Cliente => "CLIENTE",
        }
    }

    pub fn parse(label: &str) -> Role {
        match label {
            "ADMIN" => Role::Admin,
            "TECNICO" => Role::Tecnico,
            _ => Role::Cliente,
        }
    }
}

/// User fields safe to return to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Product create/update payload.
///
/// Numeric fields accept either JSON numbers or numeric strings, matching
/// what the admin forms historically sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    pub category: String,
    #[serde(deserialize_with = "lenient_i32")]
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub discount: Option<i32>,
}

impl ProductPayload {
    /// Supplied image URL, or the placeholder when absent or blank.
    pub fn image_url_or_default(&self) -> String {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }
}

/// Ticket intake payload. Required fields are validated in the handler so a
/// missing one yields a 400 with a specific message; any `status` sent by
/// the client is ignored and creation always starts at PENDIENTE.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub device_model: Option<String>,
    #[serde(default)]
    pub issue_description: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub user_id: Option<i32>,
}

/// Ticket update payload: status and/or estimated cost.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub estimated_cost: Option<f64>,
}

/// Public tracking view of a ticket, as returned by GET /api/repairs/{id}.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusView {
    pub id: String,
    pub device_model: String,
    pub status: TicketStatus,
    pub updated_at: DateTime<Utc>,
    pub estimated_cost: Option<f64>,
    pub contact_phone: String,
}

/// Owning user summary attached to tickets in the admin listing.
#[derive(Debug, Serialize)]
pub struct TicketOwner {
    pub name: String,
    pub email: String,
}

/// Ticket plus its optional owning user, for the admin listing.
#[derive(Debug, Serialize)]
pub struct TicketWithUser {
    #[serde(flatten)]
    pub ticket: RepairTicket,
    pub user: Option<TicketOwner>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatOrString {
    Num(f64),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Num(i64),
    Str(String),
}

fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    match FloatOrString::deserialize(de)? {
        FloatOrString::Num(n) => Ok(n),
        FloatOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    match Option::<FloatOrString>::deserialize(de)? {
        None => Ok(None),
        Some(FloatOrString::Num(n)) => Ok(Some(n)),
        Some(FloatOrString::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

fn lenient_i32<'de, D: Deserializer<'de>>(de: D) -> Result<i32, D::Error> {
    match IntOrString::deserialize(de)? {
        IntOrString::Num(n) => i32::try_from(n).map_err(de::Error::custom),
        IntOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer: {s:?}"))),
    }
}

fn lenient_opt_i32<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i32>, D::Error> {
    match Option::<IntOrString>::deserialize(de)? {
        None => Ok(None),
        Some(IntOrString::Num(n)) => i32::try_from(n).map(Some).map_err(de::Error::custom),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid integer: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_labels_round_trip() {
        let all = [
            (TicketStatus::Pendiente, "PENDIENTE"),
            (TicketStatus::EnDiagnostico, "EN_DIAGNOSTICO"),
            (TicketStatus::EsperandoRepuesto, "ESPERANDO_REPUESTO"),
            (TicketStatus::EnReparacion, "EN_REPARACION"),
            (TicketStatus::Listo, "LISTO"),
            (TicketStatus::Entregado, "ENTREGADO"),
        ];
        for (status, label) in all {
            assert_eq!(status.as_str(), label);
            assert_eq!(TicketStatus::parse(label), status);
            assert_eq!(serde_json::to_value(status).unwrap(), json!(label));
            let back: TicketStatus = serde_json::from_value(json!(label)).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_status_label_rejected_on_the_wire() {
        assert!(serde_json::from_value::<TicketStatus>(json!("ROTO")).is_err());
    }

    #[test]
    fn unknown_stored_status_falls_back_to_pendiente() {
        assert_eq!(TicketStatus::parse("???"), TicketStatus::Pendiente);
    }

    #[test]
    fn role_parse_defaults_to_cliente() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("TECNICO"), Role::Tecnico);
        assert_eq!(Role::parse("whatever"), Role::Cliente);
    }

    #[test]
    fn product_payload_accepts_numeric_strings() {
        let payload: ProductPayload = serde_json::from_value(json!({
            "name": "Funda iPhone",
            "price": "19.99",
            "category": "accesorios",
            "stock": "10",
            "discount": "5"
        }))
        .unwrap();
        assert_eq!(payload.price, 19.99);
        assert_eq!(payload.stock, 10);
        assert_eq!(payload.discount, Some(5));
    }

    #[test]
    fn product_payload_accepts_plain_numbers() {
        let payload: ProductPayload = serde_json::from_value(json!({
            "name": "Cargador",
            "price": 9.5,
            "category": "accesorios",
            "stock": 3
        }))
        .unwrap();
        assert_eq!(payload.price, 9.5);
        assert_eq!(payload.stock, 3);
        assert_eq!(payload.discount, None);
        assert!(!payload.is_featured);
    }

    #[test]
    fn product_payload_rejects_garbage_numbers() {
        let result = serde_json::from_value::<ProductPayload>(json!({
            "name": "Cargador",
            "price": "mucho",
            "category": "accesorios",
            "stock": 3
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_or_blank_image_defaults_to_placeholder() {
        let mut payload: ProductPayload = serde_json::from_value(json!({
            "name": "Vidrio templado",
            "price": 5,
            "category": "accesorios",
            "stock": 20
        }))
        .unwrap();
        assert_eq!(payload.image_url_or_default(), PLACEHOLDER_IMAGE_URL);

        payload.image_url = Some("  ".to_string());
        assert_eq!(payload.image_url_or_default(), PLACEHOLDER_IMAGE_URL);

        payload.image_url = Some("https://cdn.example.com/v.jpg".to_string());
        assert_eq!(payload.image_url_or_default(), "https://cdn.example.com/v.jpg");
    }

    #[test]
    fn ticket_intake_ignores_client_supplied_status() {
        let req: CreateTicketRequest = serde_json::from_value(json!({
            "deviceModel": "iPhone 13",
            "issueDescription": "cracked screen",
            "contactPhone": "1155550000",
            "status": "LISTO"
        }))
        .unwrap();
        assert_eq!(req.device_model.as_deref(), Some("iPhone 13"));
        assert_eq!(req.user_id, None);
    }

    #[test]
    fn ticket_serializes_with_camel_case_fields() {
        let ticket = RepairTicket {
            id: "A1B2C3".to_string(),
            device_model: "iPhone 13".to_string(),
            issue_description: "cracked screen".to_string(),
            contact_phone: "1155550000".to_string(),
            status: TicketStatus::Pendiente,
            estimated_cost: None,
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["deviceModel"], json!("iPhone 13"));
        assert_eq!(value["status"], json!("PENDIENTE"));
        assert!(value.get("device_model").is_none());
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: Role::Cliente,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("passwordHash").is_none());
    }
}
