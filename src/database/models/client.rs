use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::field::blank_as_none;
use crate::database::query_builder::{Assignments, Bind};
use crate::database::repository::{Entity, IntoAssignments};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone",
        "address",
        "contact_person",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Client";

    type Fields = ClientFields;
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientFields {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub contact_person: Option<String>,
}

impl IntoAssignments for ClientFields {
    fn into_assignments(self) -> Assignments {
        vec![
            ("name", Bind::Text(self.name)),
            ("email", Bind::Text(self.email)),
            ("phone", Bind::Text(self.phone)),
            ("address", Bind::Text(self.address)),
            ("contact_person", Bind::Text(self.contact_person)),
        ]
    }
}
