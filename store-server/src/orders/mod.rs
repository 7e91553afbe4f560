//! 订单状态机
//!
//! 生命周期: Pending → Confirmed → Success；Pending 阶段可删除 (取消)。
//! 状态只能前进；确认时扣库存和状态翻转在同一数据库事务内完成。

mod service;

pub use crate::db::models::order::OrderStatus;
pub use service::OrderService;
