//! Typed resource records for the management REST API.
//!
//! This crate owns the JSON shapes exchanged with the backend for every
//! managed entity (articles, clients, sales, orders, maintenance records,
//! technicians). Field names follow the dashboard's payloads; where the
//! backend names a field differently a serde alias accepts both.
//!
//! Every record implements [`Resource`], which ties the type to its REST
//! collection and to the fixed demo dataset shown when the backend is
//! unreachable.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

mod demo;
pub mod options;

pub use demo::article_sales;

// =============================================================================
// RESOURCE TRAIT
// =============================================================================

/// A backend-managed entity exposed through conventional REST paths.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Collection path relative to the API base, with trailing slash
    /// (e.g. `"/articulos/"`).
    const COLLECTION: &'static str;

    /// Name of the JSON field carrying the record's numeric id.
    const ID_FIELD: &'static str;

    /// Numeric id of this record.
    fn id(&self) -> i64;

    /// Placeholder records shown when the backend cannot be reached.
    fn demo_records() -> Vec<Self>;

    /// Endpoint returning the whole collection as a bare JSON array.
    #[must_use]
    fn list_endpoint() -> String {
        format!("{}todos/", Self::COLLECTION)
    }

    /// Endpoint addressing one record (read, update, delete).
    #[must_use]
    fn item_endpoint(id: i64) -> String {
        format!("{}{id}", Self::COLLECTION)
    }

    /// Endpoint accepting a new record.
    #[must_use]
    fn create_endpoint() -> String {
        Self::COLLECTION.to_owned()
    }
}

// =============================================================================
// ARTICLE
// =============================================================================

/// An inventory article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(alias = "id", deserialize_with = "deserialize_i64_from_number")]
    pub id_articulo: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub precio: f64,
    /// Units on hand, when the backend tracks a count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    /// `"disponible"` / `"no disponible"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disponibilidad: Option<String>,
    /// Backend availability flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existencia: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<String>,
}

impl Article {
    /// Sales that include the given article.
    #[must_use]
    pub fn sales_endpoint(id_articulo: i64) -> String {
        format!("{}{id_articulo}/ventas/", Self::COLLECTION)
    }

    /// Whether the article can currently be sold.
    #[must_use]
    pub fn is_available(&self) -> bool {
        if let Some(flag) = self.existencia {
            return flag;
        }
        match self.disponibilidad.as_deref() {
            Some(value) => value == "disponible",
            None => self.stock.is_some_and(|stock| stock > 0),
        }
    }
}

impl Resource for Article {
    const COLLECTION: &'static str = "/articulos/";
    const ID_FIELD: &'static str = "id_articulo";

    fn id(&self) -> i64 {
        self.id_articulo
    }

    fn demo_records() -> Vec<Self> {
        demo::articles()
    }
}

/// One sale line as listed under an article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleSale {
    #[serde(alias = "numero_venta", deserialize_with = "deserialize_i64_from_number")]
    pub venta_numero: i64,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub cantidad: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_venta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// A customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(alias = "id", deserialize_with = "deserialize_i64_from_number")]
    pub id_cliente: i64,
    pub nombre: String,
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    /// Phone number; the backend sends it as an integer `contacto`.
    #[serde(
        default,
        alias = "contacto",
        deserialize_with = "deserialize_opt_string_from_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

impl Client {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

impl Resource for Client {
    const COLLECTION: &'static str = "/clientes/";
    const ID_FIELD: &'static str = "id_cliente";

    fn id(&self) -> i64 {
        self.id_cliente
    }

    fn demo_records() -> Vec<Self> {
        demo::clients()
    }
}

// =============================================================================
// SALE
// =============================================================================

/// A sale, optionally carrying its article lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(alias = "numero", deserialize_with = "deserialize_i64_from_number")]
    pub venta_numero: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, alias = "fecha", skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consecutivo_orden: Option<i64>,
    #[serde(default)]
    pub articulos: Vec<SaleLine>,
}

/// An article sold as part of a [`Sale`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id_articulo: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub cantidad: i64,
    #[serde(alias = "precio_registrado")]
    pub precio: f64,
}

impl Sale {
    /// Article lines of a sale; POST here attaches a new line.
    #[must_use]
    pub fn lines_endpoint(venta_numero: i64) -> String {
        format!("{}{venta_numero}/articulos/", Self::COLLECTION)
    }

    /// One article line of a sale (DELETE detaches it).
    #[must_use]
    pub fn line_endpoint(venta_numero: i64, id_articulo: i64) -> String {
        format!("{}{venta_numero}/articulos/{id_articulo}", Self::COLLECTION)
    }

    /// Sum of `cantidad * precio` over the sale's lines.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn lines_total(&self) -> f64 {
        self.articulos
            .iter()
            .map(|line| line.cantidad as f64 * line.precio)
            .sum()
    }
}

impl Resource for Sale {
    const COLLECTION: &'static str = "/ventas/";
    const ID_FIELD: &'static str = "venta_numero";

    fn id(&self) -> i64 {
        self.venta_numero
    }

    fn demo_records() -> Vec<Self> {
        demo::sales()
    }
}

// =============================================================================
// ORDER
// =============================================================================

/// A work order grouping sales and maintenance jobs for one client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub consecutivo: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_orden: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_cliente: Option<i64>,
    #[serde(default, alias = "apertura", skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<String>,
}

impl Resource for Order {
    const COLLECTION: &'static str = "/ordenes/";
    const ID_FIELD: &'static str = "consecutivo";

    fn id(&self) -> i64 {
        self.consecutivo
    }

    fn demo_records() -> Vec<Self> {
        demo::orders()
    }
}

// =============================================================================
// MAINTENANCE
// =============================================================================

/// A scheduled or completed maintenance job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(alias = "numero", deserialize_with = "deserialize_i64_from_number")]
    pub mto_numero: i64,
    pub descripcion: String,
    /// One of [`options::MAINTENANCE_KINDS`].
    #[serde(alias = "tipo")]
    pub tipo_mto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consecutivo_orden: Option<i64>,
    #[serde(default, alias = "apertura", skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<String>,
}

impl Maintenance {
    /// Assignment of a technician to a maintenance job (POST to assign).
    #[must_use]
    pub fn technician_endpoint(mto_numero: i64, id_tecnico: i64) -> String {
        format!("{}{mto_numero}/tecnicos/{id_tecnico}", Self::COLLECTION)
    }
}

impl Resource for Maintenance {
    const COLLECTION: &'static str = "/mantenimientos/";
    const ID_FIELD: &'static str = "mto_numero";

    fn id(&self) -> i64 {
        self.mto_numero
    }

    fn demo_records() -> Vec<Self> {
        demo::maintenance()
    }
}

// =============================================================================
// TECHNICIAN
// =============================================================================

/// A field technician.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    #[serde(alias = "id", deserialize_with = "deserialize_i64_from_number")]
    pub id_tecnico: i64,
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    pub especialidad: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Technician {
    /// Maintenance jobs assigned to the technician.
    #[must_use]
    pub fn maintenance_endpoint(id_tecnico: i64) -> String {
        format!("{}{id_tecnico}/mantenimientos/", Self::COLLECTION)
    }
}

impl Resource for Technician {
    const COLLECTION: &'static str = "/tecnicos/";
    const ID_FIELD: &'static str = "id_tecnico";

    fn id(&self) -> i64 {
        self.id_tecnico
    }

    fn demo_records() -> Vec<Self> {
        demo::technicians()
    }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer-compatible number"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}

fn deserialize_opt_string_from_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(D::Error::custom("expected string or number")),
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
