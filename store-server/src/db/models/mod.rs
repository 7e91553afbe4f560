//! Database models

pub mod association_rule;
pub mod inventory_receipt;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod transaction;
pub mod user;

pub use association_rule::{AssociationRule, AssociationRuleFull, RuleMatch};
pub use inventory_receipt::{
    InventoryReceipt, InventoryReceiptCreate, InventoryReceiptDetail, InventoryReceiptFull,
    ReceiptDetailInput, ReceiptDetailWithProduct,
};
pub use order::{
    CustomerInfo, Order, OrderCreate, OrderLine, OrderLineInput, OrderStatus, OrderUpdate,
};
pub use product::{Product, ProductCard};
pub use transaction::Transaction;
pub use user::User;
