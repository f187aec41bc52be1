/// テナント情報注入Lambdaエントリポイント
///
/// CloudFrontディストリビューション（本番/HML）の"/index.html"behaviorに
/// 関連付けられるLambda@Edge関数。hostヘッダーのサブドメインから
/// テナントを特定し、白ラベル化されたindex.htmlを合成して返す。
use lambda_runtime::{Error, LambdaEvent, service_fn};
use rewriter::application::RewriteHandler;
use rewriter::infrastructure::{RewriterConfig, S3TemplateStore, init_logging};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::info;

/// S3TemplateStoreの静的インスタンス
///
/// warm start時にS3クライアントを再利用するため、一度構築したストアを
/// 静的に保持する。
static TEMPLATE_STORE: OnceCell<S3TemplateStore> = OnceCell::const_new();

/// テンプレートストアを取得（未構築なら構築）
async fn template_store(region: &str) -> &'static S3TemplateStore {
    TEMPLATE_STORE
        .get_or_init(|| async { S3TemplateStore::from_region(region).await })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("テナントHTML書き換えLambda関数を初期化");

    // Lambda関数を実行
    lambda_runtime::run(service_fn(handler)).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. デプロイ設定を読み込み
/// 2. warm start共有のテンプレートストアを取得
/// 3. RewriteHandlerでイベントを処理
/// 4. 成功時は200、失敗時は固定の500レスポンスを返却
///
/// 失敗はRewriteHandler内で捕捉されるため、このハンドラーは常に
/// 構造化されたレスポンスを返す。
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = RewriterConfig::from_env();
    let store = template_store(config.bucket_region()).await.clone();

    let rewrite_handler = RewriteHandler::new(store, config);
    let response = rewrite_handler.handle(event.payload).await;

    Ok(serde_json::to_value(&response)?)
}
