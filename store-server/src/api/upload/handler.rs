//! Image Upload Handlers
//!
//! 图片统一转成 JPEG 落盘, 按内容哈希去重。同一张图重复上传
//! 返回已有文件而不是写第二份。

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::response::IntoResponse;
use http::header;
use image::codecs::jpeg::JpegEncoder;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 接受的上传格式, 落盘前都会转成 JPEG
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG 重编码质量
const JPEG_QUALITY: u8 = 85;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
    pub url: String,
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// 在去重索引里找内容相同的已有文件
///
/// 索引是 by_hash/<前两位>/<哈希> -> ../../<文件名> 的符号链接。
/// 目标文件已被删除的悬空链接按不存在处理。
fn find_file_by_hash(images_dir: &Path, hash: &str) -> Option<String> {
    let prefix = &hash[..2];
    let hash_path = images_dir.join("by_hash").join(prefix).join(hash);

    // exists() 会跟随符号链接, 悬空链接在这里被过滤掉
    if hash_path.exists()
        && let Ok(target) = std::fs::read_link(&hash_path)
    {
        return target.file_name().map(|s| s.to_string_lossy().to_string());
    }
    None
}

/// 登记去重索引。同名链接 (悬空的旧索引) 先移除再建。
fn create_hash_symlink(images_dir: &Path, hash: &str, filename: &str) -> Result<(), AppError> {
    let prefix = &hash[..2];
    let hash_subdir = images_dir.join("by_hash").join(prefix);
    std::fs::create_dir_all(&hash_subdir).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to create hash dir: {}", e),
        )
    })?;

    let hash_path = hash_subdir.join(hash);
    if std::fs::symlink_metadata(&hash_path).is_ok() {
        let _ = std::fs::remove_file(&hash_path);
    }

    // 链接相对自身目录解析, 文件在 by_hash/<前缀>/ 的上两级
    let target = PathBuf::from("../..").join(filename);
    symlink::symlink_auto(&target, &hash_path).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to create dedup link: {}", e),
        )
    })?;
    Ok(())
}

/// 解码校验并重编码为 JPEG
fn reencode_as_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(
            ErrorCode::ImageProcessingFailed,
            format!("Failed to encode image: {}", e),
        )
    })?;
    Ok(buffer)
}

/// 从 multipart 里取出 file 字段
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::validation(format!("Invalid multipart request: {}", e))
    })? {
        let name = field.name().unwrap_or_default();
        if name == "file" || name.is_empty() {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
            let data = field.bytes().await.map_err(|e| {
                AppError::validation(format!("Failed to read upload: {}", e))
            })?;
            return Ok((filename, data));
        }
    }
    Err(AppError::new(ErrorCode::NoFileProvided))
}

/// POST /api/image/upload - 上传图片
///
/// 超限、格式、坏图各有独立错误码, 前端按码提示。
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let images_dir = state.images_dir();

    let (original_name, data) = read_file_field(&mut multipart).await?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large, maximum is {} bytes",
                state.config.max_upload_bytes
            ),
        ));
    }

    let ext = PathBuf::from(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!("No file extension on '{}'", original_name),
            )
        })?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported format '{}', accepted: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    let compressed = reencode_as_jpeg(&data)?;
    // 哈希算在重编码之后, 同一张图换容器格式上传也能去重
    let hash = content_hash(&compressed);

    if let Some(existing) = find_file_by_hash(&images_dir, &hash) {
        tracing::info!(
            original_name = %original_name,
            existing_file = %existing,
            "Duplicate image, reusing existing file"
        );
        let file_id = existing
            .strip_suffix(".jpg")
            .map(|s| s.to_string())
            .unwrap_or_else(|| existing.clone());
        return Ok(Json(UploadResponse {
            url: format!("/api/image/{}", existing),
            file_id,
            filename: existing,
            original_name,
            size: compressed.len(),
            format: "jpg".to_string(),
        }));
    }

    let file_id = Uuid::new_v4().to_string();
    let filename = format!("{}.jpg", file_id);
    let file_path = images_dir.join(&filename);
    tokio::fs::write(&file_path, &compressed).await.map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to save file: {}", e),
        )
    })?;
    create_hash_symlink(&images_dir, &hash, &filename)?;

    tracing::info!(
        original_name = %original_name,
        filename = %filename,
        size = compressed.len(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: format!("/api/image/{}", filename),
        file_id,
        filename,
        original_name,
        size: compressed.len(),
        format: "jpg".to_string(),
    }))
}

/// Serve response with the right content type
enum ImageResponse {
    Found(&'static str, Bytes),
    NotFound,
    BadName,
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ImageResponse::Found(mime, content) => {
                (http::StatusCode::OK, [(header::CONTENT_TYPE, mime)], content).into_response()
            }
            ImageResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found").into_response()
            }
            ImageResponse::BadName => {
                (http::StatusCode::BAD_REQUEST, "Invalid filename").into_response()
            }
        }
    }
}

/// 路径穿越检查: 只允许裸文件名
fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
}

/// GET /api/image/:filename - 读取图片 (公开)
pub async fn serve(
    State(state): State<ServerState>,
    UrlPath(filename): UrlPath<String>,
) -> ImageResponse {
    if !is_plain_filename(&filename) {
        return ImageResponse::BadName;
    }

    let file_path = state.images_dir().join(&filename);
    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&filename)
                .first_raw()
                .unwrap_or("application/octet-stream");
            ImageResponse::Found(mime, content.into())
        }
        Err(_) => ImageResponse::NotFound,
    }
}

/// DELETE /api/image/:filename - 删除图片
///
/// 只删主文件。指向它的去重链接变成悬空, 由定时清理回收。
pub async fn delete(
    State(state): State<ServerState>,
    UrlPath(filename): UrlPath<String>,
) -> AppResult<Json<bool>> {
    if !is_plain_filename(&filename) {
        return Err(AppError::validation("Invalid filename"));
    }

    let file_path = state.images_dir().join(&filename);
    match tokio::fs::remove_file(&file_path).await {
        Ok(()) => {
            tracing::info!(filename = %filename, "Image deleted");
            Ok(Json(true))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::not_found(format!("Image {}", filename)))
        }
        Err(e) => Err(AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to delete file: {}", e),
        )),
    }
}
