use dashmap::DashMap;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::db::repository::{delivery_settings, user};
use crate::services::ImageCleanupService;

/// 客户端可见的同步资源类型
///
/// `/api/sync/versions` 返回这些资源的版本号，管理端轮询后按需重新拉取。
pub const SYNC_RESOURCES: &[&str] = &[
    "categories",
    "products",
    "stores",
    "time_slots",
    "promo_codes",
    "delivery_settings",
];

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// # 使用场景
///
/// 写操作成功后调用 [`ServerState::bump_sync`] 递增版本号，
/// 客户端通过版本号判断缓存的数据是否过期。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 快照所有已知资源的版本号
    pub fn snapshot(&self) -> HashMap<String, u64> {
        SYNC_RESOURCES
            .iter()
            .map(|&resource| (resource.to_string(), self.get(resource)))
            .collect()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务器状态 - 持有所有共享服务的引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | resource_versions | Arc<ResourceVersions> | 资源版本管理 |
/// | epoch | String | 本次启动的实例标识 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 资源版本管理器
    pub resource_versions: Arc<ResourceVersions>,
    /// 启动时生成的实例 UUID，客户端用它检测服务器重启
    pub epoch: String,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (database/, uploads/images/by_hash/)
    /// 2. 数据库 (work_dir/database/store.db) 并应用迁移
    /// 3. 管理员账号引导 (仅账号不存在时创建)
    /// 4. 配送设置单例 (首次启动写入配置的时区)
    /// 5. JWT 服务
    ///
    /// # Panics
    ///
    /// 任一步骤失败时 panic，服务器不应在不完整的状态下启动
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("store.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        Self::bootstrap_admin(config, &pool).await;
        Self::bootstrap_delivery_settings(config, &pool).await;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let resource_versions = Arc::new(ResourceVersions::new());

        Self {
            config: config.clone(),
            pool,
            jwt_service,
            resource_versions,
            epoch: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 引导管理员账号
    ///
    /// 账号已存在时不做任何事，密码修改只走 API。
    async fn bootstrap_admin(config: &Config, pool: &SqlitePool) {
        let existing = user::find_by_username(pool, &config.admin_username)
            .await
            .expect("Failed to query admin account");
        if existing.is_some() {
            return;
        }

        let password = match config.admin_password.as_deref() {
            Some(p) => p,
            None if config.is_production() => {
                panic!("ADMIN_PASSWORD must be set for the first boot in production!")
            }
            None => {
                tracing::warn!(
                    username = %config.admin_username,
                    "ADMIN_PASSWORD not set, creating admin account with development default"
                );
                "admin123"
            }
        };

        user::ensure_admin(pool, &config.admin_username, password)
            .await
            .expect("Failed to create admin account");
        tracing::info!(username = %config.admin_username, "Admin account created");
    }

    /// 引导配送设置单例
    ///
    /// 首次启动写入配置的时区，之后以库内存储的时区为准。
    async fn bootstrap_delivery_settings(config: &Config, pool: &SqlitePool) {
        let settings = delivery_settings::get_or_create_with_zone(pool, &config.default_timezone)
            .await
            .expect("Failed to initialize delivery settings");

        // 无效时区会让时段预订和排期全部失效，启动时就拒绝
        if crate::utils::time::parse_zone(&settings.timezone).is_err() {
            panic!(
                "Stored delivery timezone '{}' is not a valid IANA zone",
                settings.timezone
            );
        }
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取图片上传目录
    pub fn images_dir(&self) -> PathBuf {
        self.config.images_dir()
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 数据变更后递增资源版本号
    ///
    /// 管理端轮询 `/api/sync/versions`，只重新拉取版本号变化的资源。
    pub fn bump_sync(&self, resource: &str) {
        let version = self.resource_versions.increment(resource);
        tracing::debug!(resource = %resource, version = version, "Resource version bumped");
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 开始监听前调用。
    ///
    /// 启动的任务：
    /// - 孤儿图片清理 (每 6 小时)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();

        let cleanup = ImageCleanupService::new(self.pool.clone(), self.images_dir());
        tasks.spawn("image_cleanup", TaskKind::Periodic, async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(6 * 60 * 60));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        cleanup.cleanup_orphan_images().await;
                    }
                    _ = token.cancelled() => break,
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("products"), 0);
        assert_eq!(versions.increment("products"), 1);
        assert_eq!(versions.increment("products"), 2);
        assert_eq!(versions.get("products"), 2);
        assert_eq!(versions.get("categories"), 0);
    }

    #[test]
    fn test_snapshot_covers_all_resources() {
        let versions = ResourceVersions::new();
        versions.increment("stores");

        let snapshot = versions.snapshot();
        assert_eq!(snapshot.len(), SYNC_RESOURCES.len());
        assert_eq!(snapshot["stores"], 1);
        assert_eq!(snapshot["products"], 0);
    }
}
