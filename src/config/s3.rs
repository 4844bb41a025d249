use crate::config::cli::LocalStorage;
use crate::config::ReportSettings;
use crate::domain::ports::Storage;
use crate::utils::error::{ReportError, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| ReportError::ProcessingError {
                message: format!("Failed to read from S3: {}", e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| ReportError::ProcessingError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type("text/html")
            .cache_control("max-age=300")
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| ReportError::ProcessingError {
                message: format!("Failed to upload file to S3: {}", e),
            })?;

        Ok(())
    }
}

/// 把已寫到本地的報表上傳到 S3（S3_BUCKET 未設定時為 no-op）
pub async fn upload_report(settings: &ReportSettings, filename: &str) -> Result<()> {
    let Some(bucket) = settings.s3_bucket.as_deref() else {
        return Ok(());
    };

    let object_name = if !settings.s3_prefix.is_empty() && !filename.starts_with(&settings.s3_prefix)
    {
        format!("{}{}", settings.s3_prefix, filename)
    } else {
        filename.to_string()
    };

    let aws_cfg = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_cfg = aws_sdk_s3::config::Builder::from(&aws_cfg)
        .region(Region::new(settings.s3_region.clone()))
        .build();
    let storage = S3Storage::new(S3Client::from_conf(s3_cfg), bucket.to_string());

    let local = LocalStorage::new(settings.output_path.clone());
    let data = local.read_file(filename).await?;
    storage.write_file(&object_name, &data).await?;

    tracing::info!("File uploaded successfully!");
    tracing::info!("S3 URI: s3://{}/{}", bucket, object_name);
    tracing::info!(
        "Public URL: https://{}.s3.{}.amazonaws.com/{}",
        bucket,
        settings.s3_region,
        object_name
    );

    Ok(())
}
