//! Meal-bid marketplace notifications
//!
//! Rows for the `notifications` table plus the message templates used when a
//! bid changes state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BidPlaced,
    BidAccepted,
    PaymentMarked,
    BidUpdated,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BidPlaced => write!(f, "bid_placed"),
            Self::BidAccepted => write!(f, "bid_accepted"),
            Self::PaymentMarked => write!(f, "payment_marked"),
            Self::BidUpdated => write!(f, "bid_updated"),
        }
    }
}

/// Structured payload stored alongside the message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<String>,
}

/// Title and body of a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub message: String,
}

impl NotificationMessage {
    fn new(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            message,
        }
    }

    /// Seller: someone bid on their listing
    pub fn bid_placed(price: Decimal, mess: &str, meal: &str) -> Self {
        Self::new(
            "New Bid Received",
            format!("Someone placed a bid of ₹{price} on your {mess} {meal} listing."),
        )
    }

    /// Buyer: their bid was accepted
    pub fn bid_accepted(price: Decimal, mess: &str, meal: &str) -> Self {
        Self::new(
            "Bid Accepted!",
            format!(
                "Your bid of ₹{price} for {mess} {meal} has been accepted. \
                 Please contact the seller to complete the transaction."
            ),
        )
    }

    /// Buyer: the seller confirmed their payment
    pub fn payment_marked(price: Decimal, mess: &str, meal: &str) -> Self {
        Self::new(
            "Payment Confirmed",
            format!("Your payment of ₹{price} for {mess} {meal} has been confirmed by the seller."),
        )
    }

    /// Seller: acknowledgement that they confirmed receiving payment
    pub fn payment_received(price: Decimal, mess: &str, meal: &str) -> Self {
        Self::new(
            "Payment Received",
            format!("You've confirmed receiving payment of ₹{price} for your {mess} {meal} listing."),
        )
    }

    /// Seller: a bid on their listing changed
    pub fn bid_updated(price: Decimal, mess: &str, meal: &str) -> Self {
        Self::new(
            "Bid Updated",
            format!("A bid on your {mess} {meal} listing has been updated to ₹{price}."),
        )
    }
}

/// Insert payload for the `notifications` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub data: NotificationData,
}

impl NewNotification {
    pub fn new(
        user_id: impl Into<String>,
        kind: NotificationKind,
        content: NotificationMessage,
        data: NotificationData,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            title: content.title,
            message: content.message,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_placed_text() {
        let msg = NotificationMessage::bid_placed(Decimal::new(45, 0), "North Mess", "Dinner");
        assert_eq!(msg.title, "New Bid Received");
        assert_eq!(
            msg.message,
            "Someone placed a bid of ₹45 on your North Mess Dinner listing."
        );
    }

    #[test]
    fn test_bid_accepted_text() {
        let msg = NotificationMessage::bid_accepted(Decimal::new(30, 0), "South Mess", "Lunch");
        assert_eq!(
            msg.message,
            "Your bid of ₹30 for South Mess Lunch has been accepted. \
             Please contact the seller to complete the transaction."
        );
    }

    #[test]
    fn test_bid_updated_keeps_decimal_places() {
        let msg = NotificationMessage::bid_updated(Decimal::new(4250, 2), "North Mess", "Breakfast");
        assert!(msg.message.ends_with("updated to ₹42.50."));
    }

    #[test]
    fn test_insert_payload_shape() {
        let row = NewNotification::new(
            "user-1",
            NotificationKind::PaymentMarked,
            NotificationMessage::payment_marked(Decimal::new(40, 0), "North Mess", "Dinner"),
            NotificationData {
                listing_id: Some("l-1".into()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "payment_marked");
        assert_eq!(json["data"]["listingId"], "l-1");
        assert!(json["data"].get("bidId").is_none());
        assert_eq!(json["title"], "Payment Confirmed");
    }
}
