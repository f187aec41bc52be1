/// テンプレートオブジェクトの取得
///
/// S3から正規のindex.htmlテンプレートを取得する。ストリームは全量を
/// メモリに読み込んでから返す（部分読み込みは取得失敗として扱う）。
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

/// テンプレート取得のエラー型
///
/// オブジェクト不在・権限不足・通信エラーはいずれも呼び出し側で
/// 同じ失敗経路に集約されるため、分類は診断ログのためだけに持つ。
#[derive(Debug, Error)]
pub enum TemplateStoreError {
    /// GetObject呼び出しの失敗
    #[error("テンプレート取得に失敗 (s3://{bucket}/{key}): {message}")]
    GetObject {
        bucket: String,
        key: String,
        message: String,
    },
    /// ボディストリームの読み込み失敗
    #[error("テンプレートボディの読み込みに失敗: {0}")]
    ReadBody(String),
    /// レスポンスメタデータの欠落
    #[error("テンプレートオブジェクトのメタデータが欠落: {0}")]
    MissingMetadata(&'static str),
}

/// 取得済みテンプレートオブジェクト
#[derive(Debug, Clone)]
pub struct TemplateObject {
    /// UTF-8デコード済みのテンプレート本文
    pub body: String,
    /// オブジェクトの最終更新日時
    pub last_modified: DateTime<Utc>,
    /// オブジェクトのエンティティタグ（引用符を含むS3の表記のまま）
    pub etag: String,
}

/// テンプレート取得の抽象化（テスト用）
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// 指定バケットからテンプレートオブジェクトを取得する
    ///
    /// # 引数
    /// * `bucket` - バケット名
    /// * `key` - オブジェクトキー
    async fn fetch(&self, bucket: &str, key: &str) -> Result<TemplateObject, TemplateStoreError>;
}

/// AWS S3 SDKを使用したテンプレートストア実装
#[derive(Debug, Clone)]
pub struct S3TemplateStore {
    client: S3Client,
}

impl S3TemplateStore {
    /// 既存のクライアントからストアを作成
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// 指定リージョンのクライアントでストアを作成
    pub async fn from_region(region: &str) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(S3Client::new(&aws_config))
    }
}

#[async_trait]
impl TemplateStore for S3TemplateStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<TemplateObject, TemplateStoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                warn!(bucket = %bucket, key = %key, error = %err, "GetObjectエラー");
                TemplateStoreError::GetObject {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: err.to_string(),
                }
            })?;

        let last_modified = output
            .last_modified()
            .and_then(|timestamp| DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos()))
            .ok_or(TemplateStoreError::MissingMetadata("last_modified"))?;

        let etag = output
            .e_tag()
            .map(str::to_string)
            .ok_or(TemplateStoreError::MissingMetadata("etag"))?;

        // ボディを全量読み込み（途中で失敗した場合は取得失敗扱い）
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| TemplateStoreError::ReadBody(err.to_string()))?
            .into_bytes();

        debug!(bucket = %bucket, key = %key, size = bytes.len(), "テンプレート取得完了");

        // 不正なUTF-8シーケンスは置換文字に落とす（デコード自体は失敗しない）
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(TemplateObject {
            body,
            last_modified,
            etag,
        })
    }
}
