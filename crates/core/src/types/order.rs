//! Orders sent to `POST /order/` and the API's reply.

use serde::{Deserialize, Serialize};

use super::{OrderId, PaymentMethod, Price, ProductId};

/// A fully validated order, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub payment: PaymentMethod,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: Price,
    /// One entry per cart line, duplicates included.
    pub items: Vec<ProductId>,
}

/// Reply to a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: OrderId,
    pub total: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_wire_format() {
        let order = Order {
            payment: PaymentMethod::Card,
            email: "test@test.ru".to_string(),
            phone: "+71234567890".to_string(),
            address: "Spb Vosstania 1".to_string(),
            total: Price::from_units(2200),
            items: vec![
                ProductId::from("854cef69-976d-4c2a-a18c-2aa45046c390"),
                ProductId::from("c101ab44-ed99-4a54-990d-47aa2bb4e7d9"),
            ],
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["payment"], "card");
        assert_eq!(value["total"], 2200.0);
        assert_eq!(value["items"][1], "c101ab44-ed99-4a54-990d-47aa2bb4e7d9");
    }

    #[test]
    fn test_order_result_from_api() {
        let json = r#"{"id": "28c57cb4-3002-4445-8aa1-2a06a5055ae5", "total": 2200}"#;
        let result: OrderResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.total, Price::from_units(2200));
        assert_eq!(result.id.as_str(), "28c57cb4-3002-4445-8aa1-2a06a5055ae5");
    }
}
