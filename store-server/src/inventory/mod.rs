//! 库存账本
//!
//! `product.amount` 的唯一写入者。两条写路径：
//! - 入库单 (`receive_stock`): 加库存
//! - 订单确认 (`confirm_order`): 条件减库存，和状态翻转同一事务

mod ledger;

pub use ledger::InventoryLedger;
