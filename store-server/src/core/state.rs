use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::services::MailService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是商店后端的核心数据结构，持有所有服务的共享引用。
/// `Surreal<Db>` 和 `MailService` 内部都是 Arc，clone 成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | mail | MailService | 订单确认邮件 (尽力而为) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 邮件通知服务
    pub mail: MailService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    pub fn new(config: Config, db: Surreal<Db>, mail: MailService) -> Self {
        Self { config, db, mail }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/store.db) 及表结构
    /// 3. 邮件服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("store.db");
        let db_service = DbService::new(&db_path)
            .await
            .expect("Failed to initialize database");

        // 2. Initialize services
        let mail = MailService::from_config(config);

        Self::new(config.clone(), db_service.db, mail)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
