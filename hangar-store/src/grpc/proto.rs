//! Wire messages for the inventory and payment services.
//!
//! Field numbers match `inventory/v1/inventory.proto` and
//! `payment/v1/payment.proto`. Only the messages the order service sends or
//! reads are declared here.

pub mod inventory {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct PartsFilter {
        #[prost(string, repeated, tag = "1")]
        pub uuids: Vec<String>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ListPartsRequest {
        #[prost(message, optional, tag = "1")]
        pub filter: Option<PartsFilter>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Part {
        #[prost(string, tag = "1")]
        pub uuid: String,
        #[prost(string, tag = "2")]
        pub name: String,
        #[prost(string, tag = "3")]
        pub description: String,
        #[prost(double, tag = "4")]
        pub price: f64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ListPartsResponse {
        #[prost(message, repeated, tag = "1")]
        pub parts: Vec<Part>,
    }

    pub const LIST_PARTS_PATH: &str = "/inventory.v1.InventoryService/ListParts";
}

pub mod payment {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum PaymentMethod {
        UnknownUnspecified = 0,
        Card = 1,
        Sbp = 2,
        CreditCard = 3,
        InvestorMoney = 4,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct PayOrderRequest {
        #[prost(string, tag = "1")]
        pub order_uuid: String,
        #[prost(string, tag = "2")]
        pub user_uuid: String,
        #[prost(enumeration = "PaymentMethod", tag = "3")]
        pub payment_method: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct PayOrderResponse {
        #[prost(string, tag = "1")]
        pub transaction_uuid: String,
    }

    pub const PAY_ORDER_PATH: &str = "/payment.v1.PaymentService/PayOrder";
}
