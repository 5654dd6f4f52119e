//! Service endpoints advertise ways of communicating with the subject of an
//! identifier document.

use serde::{Deserialize, Serialize};

/// A service carried in an identifier document or a document patch.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Identifier for the service, unique within the document.
    pub id: String,
    /// The type of service.
    #[serde(rename = "type")]
    pub type_: String,
    /// Location of the service endpoint.
    pub service_endpoint: String,
}
