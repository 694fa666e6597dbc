//! Image Cleanup Service
//!
//! 负责清理孤儿图片文件

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::fs;

/// 新上传文件的宽限期，未落库前不会被清理
const GRACE_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// 图片清理服务
///
/// 上传的图片先写入磁盘，之后才作为 `image_url` 关联到商品、分类、
/// 门店或账单。关联被替换或删除后文件就成了孤儿，由定时清理回收。
#[derive(Clone)]
pub struct ImageCleanupService {
    pool: SqlitePool,
    /// 图片目录路径: work_dir/uploads/images/
    images_dir: PathBuf,
}

impl ImageCleanupService {
    /// 创建新的清理服务
    pub fn new(pool: SqlitePool, images_dir: PathBuf) -> Self {
        Self { pool, images_dir }
    }

    /// 收集数据库仍在引用的图片文件名
    async fn referenced_filenames(&self) -> Result<HashSet<String>, sqlx::Error> {
        let urls: Vec<String> = sqlx::query_scalar(
            "SELECT image_url FROM products WHERE image_url IS NOT NULL \
             UNION SELECT image_url FROM categories WHERE image_url IS NOT NULL \
             UNION SELECT image_url FROM stores WHERE image_url IS NOT NULL \
             UNION SELECT image_url FROM order_bills WHERE image_url IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(urls
            .iter()
            .filter_map(|url| url.rsplit('/').next())
            .map(|name| name.to_string())
            .collect())
    }

    /// 清理孤儿图片
    ///
    /// 删除数据库不再引用且超过宽限期的图片文件，随后移除指向
    /// 已删除文件的去重符号链接。返回删除的文件数量。
    pub async fn cleanup_orphan_images(&self) -> usize {
        let referenced = match self.referenced_filenames().await {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to query referenced images, skipping sweep");
                return 0;
            }
        };

        let mut entries = match fs::read_dir(&self.images_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read images directory, skipping sweep");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut deleted_count = 0;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            // by_hash/ 子目录单独处理
            if !path.is_file() {
                continue;
            }

            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if referenced.contains(filename) {
                continue;
            }

            // 宽限期内的文件可能刚上传、尚未关联
            let age = entry
                .metadata()
                .await
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|modified| now.duration_since(modified).ok());
            if age.is_none_or(|a| a < GRACE_PERIOD) {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(_) => {
                    deleted_count += 1;
                    tracing::debug!(filename = %filename, "Orphan image deleted");
                }
                Err(e) => {
                    tracing::warn!(filename = %filename, error = %e, "Failed to delete orphan image");
                }
            }
        }

        self.cleanup_dangling_symlinks().await;

        if deleted_count > 0 {
            tracing::info!(count = deleted_count, "Orphan images cleaned up");
        }

        deleted_count
    }

    /// 移除目标文件已不存在的去重符号链接
    async fn cleanup_dangling_symlinks(&self) {
        let hash_dir = self.images_dir.join("by_hash");
        let Ok(mut prefixes) = fs::read_dir(&hash_dir).await else {
            return;
        };

        while let Ok(Some(prefix)) = prefixes.next_entry().await {
            let Ok(mut links) = fs::read_dir(prefix.path()).await else {
                continue;
            };
            while let Ok(Some(link)) = links.next_entry().await {
                // metadata 会跟随符号链接，目标不存在时报 NotFound
                if fs::metadata(link.path()).await.is_err()
                    && let Err(e) = fs::remove_file(link.path()).await
                {
                    tracing::warn!(path = ?link.path(), error = %e, "Failed to remove dangling symlink");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed_product_with_image(pool: &SqlitePool, image_url: &str) {
        let now = shared::util::now_millis();
        sqlx::query(
            "INSERT INTO products (id, name, price_cents, image_url, in_stock, sort_order, created_at, updated_at) VALUES (?1, 'Apples', 450, ?2, 1, 0, ?3, ?3)",
        )
        .bind(shared::util::snowflake_id())
        .bind(image_url)
        .bind(now)
        .execute(pool)
        .await
        .expect("seed product");
    }

    #[tokio::test]
    async fn test_referenced_images_survive_sweep() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let images_dir = dir.path().join("images");
        std::fs::create_dir_all(&images_dir).expect("images dir");

        std::fs::write(images_dir.join("kept.jpg"), b"jpg").expect("write");
        seed_product_with_image(&pool, "/api/image/kept.jpg").await;

        let service = ImageCleanupService::new(pool, images_dir.clone());
        let deleted = service.cleanup_orphan_images().await;

        assert_eq!(deleted, 0);
        assert!(images_dir.join("kept.jpg").exists());
    }

    #[tokio::test]
    async fn test_fresh_orphans_survive_grace_period() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let images_dir = dir.path().join("images");
        std::fs::create_dir_all(&images_dir).expect("images dir");

        // Unreferenced but freshly written
        std::fs::write(images_dir.join("orphan.jpg"), b"jpg").expect("write");

        let service = ImageCleanupService::new(pool, images_dir.clone());
        let deleted = service.cleanup_orphan_images().await;

        assert_eq!(deleted, 0);
        assert!(images_dir.join("orphan.jpg").exists());
    }

    #[tokio::test]
    async fn test_dangling_symlinks_removed() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let images_dir = dir.path().join("images");
        let hash_subdir = images_dir.join("by_hash/ab");
        std::fs::create_dir_all(&hash_subdir).expect("hash dir");

        let link = hash_subdir.join("abcdef");
        symlink::symlink_auto("../../gone.jpg", &link).expect("symlink");
        assert!(std::fs::symlink_metadata(&link).is_ok());

        let service = ImageCleanupService::new(pool, images_dir);
        service.cleanup_orphan_images().await;

        assert!(std::fs::symlink_metadata(&link).is_err());
    }
}
