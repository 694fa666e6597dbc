//! Permission Definitions
//!
//! Simplified RBAC for the back office.
//!
//! ## 设计原则
//! - 店面浏览、下单、订单跟踪完全公开，不经过权限系统
//! - 员工账号默认可以处理订单并查看商品目录
//! - 目录编辑、时段规划、促销码和系统设置按模块单独授权
//! - 用户管理仅 admin 角色可用

/// Catalog reads: admin views of products, categories and stores
pub const CATALOG_READ: &str = "catalog:read";
/// Catalog edits, including image deletion. Uploading needs any
/// authenticated account since bill receipts come in the same way.
pub const CATALOG_WRITE: &str = "catalog:write";
/// Order and grocery-run listings and detail views
pub const ORDERS_READ: &str = "orders:read";
/// Status, payment, messages, bills and store-entry updates
pub const ORDERS_WRITE: &str = "orders:write";
/// Time slot planning
pub const SLOTS_MANAGE: &str = "slots:manage";
/// Promo code management
pub const PROMOS_MANAGE: &str = "promos:manage";
/// Delivery settings
pub const SETTINGS_MANAGE: &str = "settings:manage";

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[
    CATALOG_READ,
    CATALOG_WRITE,
    ORDERS_READ,
    ORDERS_WRITE,
    SLOTS_MANAGE,
    PROMOS_MANAGE,
    SETTINGS_MANAGE,
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[
    "users:manage", // 用户管理
    "all",          // 超级权限
];

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_permissions_are_valid() {
        assert!(is_valid_permission(CATALOG_WRITE));
        assert!(is_valid_permission("all"));
        assert!(is_valid_permission("orders:*"));
        assert!(!is_valid_permission("reports:export"));
    }
}
