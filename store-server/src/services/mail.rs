//! Mail Service
//!
//! Order-confirmation email, delivered through an HTTP mail relay.
//! Dispatch is fire-and-forget: a slow or failing relay must never stall
//! or fail an order confirmation, so delivery runs on a spawned task and
//! failures are only logged.

use serde::Serialize;

use crate::core::Config;
use crate::db::models::Order;

#[derive(Debug, Serialize)]
struct OutboundMail {
    from: String,
    to: String,
    subject: String,
    html: String,
}

#[derive(Clone, Debug)]
pub struct MailService {
    client: reqwest::Client,
    endpoint: Option<String>,
    from: String,
}

impl MailService {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.mail_endpoint.clone(),
            from: config.mail_from.clone(),
        }
    }

    /// A service that logs instead of sending (tests, local development)
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
            from: "Grocery Store <no-reply@store.local>".into(),
        }
    }

    /// Queue the order-confirmation email for the customer
    ///
    /// Returns immediately; the actual delivery happens on a background
    /// task and is never surfaced to the caller.
    pub fn send_order_confirmation(&self, order: &Order) {
        let mail = OutboundMail {
            from: self.from.clone(),
            to: order.customer.email.clone(),
            subject: format!("Order {} confirmed", order.code),
            html: render_confirmation(order),
        };

        let Some(endpoint) = self.endpoint.clone() else {
            tracing::info!(order = %order.code, to = %mail.to, "Mail relay not configured, skipping confirmation email");
            return;
        };

        let client = self.client.clone();
        let code = order.code.clone();
        tokio::spawn(async move {
            match client.post(&endpoint).json(&mail).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(order = %code, "Confirmation email dispatched");
                }
                Ok(resp) => {
                    tracing::warn!(order = %code, status = %resp.status(), "Mail relay rejected confirmation email");
                }
                Err(e) => {
                    tracing::warn!(order = %code, error = %e, "Failed to dispatch confirmation email");
                }
            }
        });
    }
}

fn render_confirmation(order: &Order) -> String {
    let mut rows = String::new();
    for line in &order.products {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{} {}</td><td>{}</td></tr>",
            line.name, line.amount, line.unit, line.price
        ));
    }
    format!(
        "<h2>Your order {} has been confirmed</h2>\
         <p>Hi {}, we are preparing your delivery to {}.</p>\
         <table><tr><th>Product</th><th>Amount</th><th>Price</th></tr>{}</table>\
         <p>Total: {}</p>",
        order.code, order.customer.name, order.customer.address, rows, order.total_money
    )
}
