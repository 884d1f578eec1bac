//! Employee roster record
//!
//! The ten stored attributes are typed fields. Anything else the remote
//! returns is kept in `extra`, in remote order, so the snapshot can stage the
//! full record. A decoded record also remembers the order in which the remote
//! listed its attributes; the snapshot header follows it.

use crate::errors::{RosterError, RosterErrorKind, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Canonical stored field names, in column order
pub const EMPLOYEE_FIELDS: [&str; 10] = [
    "empNo",
    "givenName",
    "surname",
    "preferredName",
    "initial",
    "positionName",
    "positionNameFr",
    "photoRevision",
    "active",
    "email",
];

/// One roster entry
///
/// `emp_no` is the natural key. All ten keys are required when decoding;
/// textual attributes sent as `null` decode to the empty string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub emp_no: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub given_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub surname: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub preferred_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub initial: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub position_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub position_name_fr: String,
    pub photo_revision: i64,
    pub active: bool,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    /// Attributes beyond the stored ten, in the order the remote sent them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Wire attribute order; empty for records built in code
    #[serde(skip)]
    field_order: Vec<String>,
}

impl<'de> Deserialize<'de> for EmployeeRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Map::<String, Value>::deserialize(deserializer)?;
        let field_order = wire.keys().cloned().collect();
        let mut record =
            EmployeeRecord::deserialize(Value::Object(wire)).map_err(D::Error::custom)?;
        record.field_order = field_order;
        Ok(record)
    }
}

/// Borrowed view of one attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Integer(i64),
    Boolean(bool),
    Json(&'a Value),
}

/// Whether an employee key is empty once ASCII whitespace is trimmed
///
/// The table's `empNo` CHECK constraint trims the same characters.
pub fn is_blank_key(emp_no: &str) -> bool {
    emp_no.trim_matches(|c: char| c.is_ascii_whitespace()).is_empty()
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl EmployeeRecord {
    /// Create a record with the ten stored attributes and no extras
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        emp_no: impl Into<String>,
        given_name: impl Into<String>,
        surname: impl Into<String>,
        preferred_name: impl Into<String>,
        initial: impl Into<String>,
        position_name: impl Into<String>,
        position_name_fr: impl Into<String>,
        photo_revision: i64,
        active: bool,
        email: impl Into<String>,
    ) -> Self {
        Self {
            emp_no: emp_no.into(),
            given_name: given_name.into(),
            surname: surname.into(),
            preferred_name: preferred_name.into(),
            initial: initial.into(),
            position_name: position_name.into(),
            position_name_fr: position_name_fr.into(),
            photo_revision,
            active,
            email: email.into(),
            extra: Map::new(),
            field_order: Vec::new(),
        }
    }

    /// Attach an extra attribute (builder style)
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !self.field_order.is_empty() && !self.extra.contains_key(&key) {
            self.field_order.push(key.clone());
        }
        self.extra.insert(key, value);
        self
    }

    /// Check model invariants: `emp_no` must be non-blank
    pub fn validate(&self) -> Result<()> {
        if is_blank_key(&self.emp_no) {
            return Err(RosterError::new(RosterErrorKind::InvalidRecord)
                .with_op("validate_record")
                .with_message("empNo must be a non-empty string"));
        }
        Ok(())
    }

    /// Field names of this record
    ///
    /// Decoded records list their attributes in wire order. Records built in
    /// code list the stored ten, then extras in insertion order.
    pub fn field_names(&self) -> Vec<String> {
        if !self.field_order.is_empty() {
            return self.field_order.clone();
        }
        EMPLOYEE_FIELDS
            .iter()
            .map(|f| f.to_string())
            .chain(self.extra.keys().cloned())
            .collect()
    }

    /// Look up an attribute by its wire name
    pub fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        let value = match name {
            "empNo" => FieldRef::Text(&self.emp_no),
            "givenName" => FieldRef::Text(&self.given_name),
            "surname" => FieldRef::Text(&self.surname),
            "preferredName" => FieldRef::Text(&self.preferred_name),
            "initial" => FieldRef::Text(&self.initial),
            "positionName" => FieldRef::Text(&self.position_name),
            "positionNameFr" => FieldRef::Text(&self.position_name_fr),
            "photoRevision" => FieldRef::Integer(self.photo_revision),
            "active" => FieldRef::Boolean(self.active),
            "email" => FieldRef::Text(&self.email),
            other => FieldRef::Json(self.extra.get(other)?),
        };
        Some(value)
    }
}
