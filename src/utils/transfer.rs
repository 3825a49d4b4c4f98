//! # 归档上传
//!
//! 以 `multipart/form-data` 将打包好的归档 POST 到文件中转服务:
//! 归档放在 `files` 部分，另附 `message` 与 `email_from` 表单字段，
//! 并从 JSON 响应中读取 `download_url`。非成功状态码视为上传失败。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs`, `commands/upload.rs` 调用
//! - 使用 `ureq`（`multipart` 特性）发送请求

use crate::error::{PhotoflowError, Result};

use serde::Deserialize;
use std::fs;
use std::path::Path;
use ureq::unversioned::multipart::{Form, Part};

/// 默认上传地址
pub const DEFAULT_UPLOAD_URL: &str = "https://api.transfernow.net/v2/transfers";

/// 随归档一起提交的留言
const UPLOAD_MESSAGE: &str = "Your file is ready!";

/// 发件人地址
const UPLOAD_SENDER: &str = "noreply@photoflow.local";

#[derive(Debug, Deserialize)]
struct TransferResponse {
    download_url: Option<String>,
}

/// 上传文件，返回下载链接
pub fn upload(path: &Path, url: &str) -> Result<String> {
    if !path.is_file() {
        return Err(PhotoflowError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let bytes = fs::read(path).map_err(|e| PhotoflowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("archive.zip");

    let upload_err = |e: ureq::Error| PhotoflowError::UploadError(e.to_string());

    let archive = Part::bytes(&bytes)
        .file_name(file_name)
        .mime_str("application/zip")
        .map_err(upload_err)?;
    let form = Form::new()
        .part("files", archive)
        .text("message", UPLOAD_MESSAGE)
        .text("email_from", UPLOAD_SENDER);

    let mut response = ureq::post(url).send(form).map_err(upload_err)?;

    if !response.status().is_success() {
        return Err(PhotoflowError::UploadError(format!(
            "HTTP {}: {}",
            response.status(),
            url
        )));
    }

    let body: TransferResponse = response
        .body_mut()
        .read_json()
        .map_err(|e| PhotoflowError::UploadError(format!("invalid response: {}", e)))?;

    body.download_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| PhotoflowError::UploadError("response has no download_url".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// 服务端收到的请求
    struct Received {
        content_type: String,
        body: Vec<u8>,
    }

    impl Received {
        fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// 单次应答的本地 HTTP 服务，返回 (地址, 收到的请求)
    fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}/v2/transfers", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0usize;
            let mut content_type = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    } else if name.eq_ignore_ascii_case("content-type") {
                        content_type = value.trim().to_string();
                    }
                }
            }
            let mut received = vec![0u8; content_length];
            reader.read_exact(&mut received).unwrap();

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            Received {
                content_type,
                body: received,
            }
        });

        (addr, handle)
    }

    fn archive_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("converted_photos.zip");
        fs::write(&path, b"PK-archive").unwrap();
        path
    }

    #[test]
    fn test_upload_returns_download_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = archive_file(dir.path());
        let (url, server) =
            serve_once("201 Created", r#"{"download_url":"https://dl.example/abc"}"#);

        let link = upload(&path, &url).unwrap();
        assert_eq!(link, "https://dl.example/abc");

        let received = server.join().unwrap();
        assert!(
            received.content_type.starts_with("multipart/form-data; boundary="),
            "{}",
            received.content_type
        );
        let body = received.body_text();
        assert!(body.contains(r#"name="files"; filename="converted_photos.zip""#));
        assert!(body.contains("Content-Type: application/zip"));
        assert!(body.contains("PK-archive"));
        assert!(body.contains(r#"name="message""#));
        assert!(body.contains(r#"name="email_from""#));
        assert!(body.contains("noreply@photoflow.local"));
    }

    #[test]
    fn test_upload_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = archive_file(dir.path());
        let (url, server) = serve_once("500 Internal Server Error", "{}");

        let err = upload(&path, &url).unwrap_err();
        assert!(matches!(err, PhotoflowError::UploadError(_)));
        server.join().unwrap();
    }

    #[test]
    fn test_upload_missing_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = archive_file(dir.path());
        let (url, server) = serve_once("200 OK", r#"{"id":"x"}"#);

        let err = upload(&path, &url).unwrap_err();
        assert!(err.to_string().contains("download_url"));
        server.join().unwrap();
    }

    #[test]
    fn test_upload_missing_file() {
        let err = upload(Path::new("/nonexistent/photoflow.zip"), DEFAULT_UPLOAD_URL).unwrap_err();
        assert!(matches!(err, PhotoflowError::FileNotFound { .. }));
    }
}
