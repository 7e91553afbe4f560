//! Store Server - 杂货铺在线商店后端
//!
//! # 架构概述
//!
//! 本模块是商店后端的主入口，提供以下核心功能：
//!
//! - **订单状态机** (`orders`): 订单生命周期 Pending → Confirmed → Success
//! - **库存账本** (`inventory`): 商品库存的唯一写入者（入库加、确认减）
//! - **推荐引擎** (`recommend`): 基于关联规则的 "买了又买" 推荐
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 网关注入的请求者身份
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repositories)
//! ├── orders/        # 订单状态机
//! ├── inventory/     # 库存账本
//! ├── recommend/     # 推荐引擎
//! ├── services/      # 邮件通知
//! └── utils/         # 日志、校验等工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod recommend;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use inventory::InventoryLedger;
pub use orders::{OrderService, OrderStatus};
pub use recommend::SuggestionEngine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 环境初始化: dotenv + 日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
    "#
    );
}
