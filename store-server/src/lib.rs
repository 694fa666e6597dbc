//! Store Server - 杂货店线上商城后端
//!
//! # 架构概述
//!
//! 单体 HTTP 服务，店面和后台共用一套 API：
//!
//! - **目录** (`db` + `api`): 分类、商品、代购店铺，SQLite 存储
//! - **结账** (`checkout`): 配送订单与多店代购单的下单事务
//! - **排期** (`scheduling`): 配送/自取时段的容量管理
//! - **促销** (`promo`): 优惠码校验与核销
//! - **认证** (`auth`): JWT + Argon2，店面浏览下单无需登录
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── checkout/      # 下单事务
//! ├── scheduling/    # 时段排期
//! ├── promo/         # 优惠码
//! ├── pricing/       # 金额计算
//! ├── services/      # 图片清理等后台服务
//! ├── db/            # 仓储层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod pricing;
pub mod promo;
pub mod scheduling;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env、建工作目录、起日志, 返回配置
///
/// 在任何 tracing 调用之前执行, 否则日志会落在默认订阅器上。
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
