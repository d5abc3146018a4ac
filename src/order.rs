use serde::{Deserialize, Serialize};
use std::fmt;

/// An order record as served by `GET /order/{id}`.
///
/// Every field is optional: the viewer renders whatever it receives and
/// substitutes a placeholder for the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_uid: Option<String>,
    pub track_number: Option<String>,
    pub entry: Option<String>,
    pub locale: Option<String>,
    pub internal_signature: Option<String>,
    pub customer_id: Option<String>,
    pub delivery_service: Option<String>,
    #[serde(rename = "shardkey")]
    pub shard_key: Option<String>,
    pub sm_id: Option<i64>,
    pub date_created: Option<String>,
    pub oof_shard: Option<String>,

    pub delivery: Option<Delivery>,
    pub payment: Option<Payment>,
    pub items: Option<Vec<Item>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub transaction: Option<String>,
    pub request_id: Option<String>,
    pub currency: Option<String>,
    pub provider: Option<String>,
    pub amount: Option<f64>,
    /// Seconds since the Unix epoch.
    pub payment_dt: Option<i64>,
    pub bank: Option<String>,
    pub delivery_cost: Option<f64>,
    pub goods_total: Option<f64>,
    pub custom_fee: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub chrt_id: Option<i64>,
    pub track_number: Option<String>,
    pub price: Option<f64>,
    pub rid: Option<String>,
    pub name: Option<String>,
    pub sale: Option<f64>,
    pub size: Option<String>,
    pub total_price: Option<f64>,
    pub nm_id: Option<i64>,
    pub brand: Option<String>,
    pub quantity: Option<i64>,
    pub status: Option<ItemStatus>,
}

/// Item status: the order service sends a numeric code, older payloads a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemStatus {
    Code(i64),
    Label(String),
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Code(code) => write!(f, "{}", code),
            ItemStatus::Label(label) => f.write_str(label),
        }
    }
}

impl Order {
    /// Currency used for every amount in the order, if the payment names one.
    pub fn currency(&self) -> Option<&str> {
        self.payment
            .as_ref()
            .and_then(|p| p.currency.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn items(&self) -> &[Item] {
        self.items.as_deref().unwrap_or(&[])
    }
}
