use serde::{Deserialize, Serialize};

/// Order assigned to a delivery partner at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderConfig {
    pub id: u64,
    /// Partner the order is assigned to
    pub partner_id: u64,
    pub pickup_address: String,
    pub drop_address: String,
    #[serde(default)]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Delivered,
}
